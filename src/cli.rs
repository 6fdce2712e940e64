use std::path::PathBuf;

use clap::Parser;

/// Judges a schedule of C++ submissions against their problems' test cases.
#[derive(Debug, Parser)]
#[command(name = "judge", version)]
pub struct Cli {
    /// Arrival schedule: `total_jobs worker_count` followed by
    /// `arrival_time_ms problem_id source_stem` records
    pub schedule: PathBuf,

    /// Directory containing `Submit/` and `problem/`
    #[arg(long, env = "JUDGE_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Where compiled artifacts and captured outputs are kept while judging
    #[arg(long, env = "JUDGE_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    #[arg(long, env = "GNUCPP_PATH", default_value = "g++")]
    pub compiler: PathBuf,

    #[arg(
        long = "compiler-flag",
        env = "JUDGE_COMPILER_FLAGS",
        value_delimiter = ' ',
        allow_hyphen_values = true,
        default_values = ["-std=c++17", "-O2"]
    )]
    pub compiler_flags: Vec<String>,

    /// Wall-clock limit for each test execution
    #[arg(long, env = "JUDGE_TIME_LIMIT_MS", default_value_t = 2000)]
    pub time_limit_ms: u64,

    #[arg(long, env = "JUDGE_COMPILE_TIME_LIMIT_MS", default_value_t = 10_000)]
    pub compile_time_limit_ms: u64,

    /// Overrides the worker count given by the schedule
    #[arg(long, env = "JUDGE_WORKERS")]
    pub workers: Option<usize>,
}
