use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::core::domain::{ProblemId, ProblemPaths};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("root directory {0} does not exist")]
    MissingRoot(PathBuf),
}

/// Resolves schedule records to files under the judge root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionLayout {
    root: PathBuf,
}

impl SubmissionLayout {
    pub fn new<T: AsRef<Path>>(root: T) -> Self {
        SubmissionLayout {
            root: root.as_ref().into(),
        }
    }

    pub fn source_path(&self, source_stem: &str) -> PathBuf {
        self.root.join("Submit").join(format!("{}.cpp", source_stem))
    }

    pub fn problem_paths(&self, problem_id: &ProblemId) -> ProblemPaths {
        let problem_dir = self.root.join("problem").join(&problem_id.0);
        ProblemPaths {
            tests_dir: problem_dir.join("testcases"),
            expected_dir: problem_dir.join("expected_outputs"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct JudgeConfig {
    pub schedule: PathBuf,
    pub layout: SubmissionLayout,
    pub work_dir: PathBuf,
    pub compiler: PathBuf,
    pub compiler_flags: Vec<String>,
    pub time_limit: Duration,
    pub compile_time_limit: Duration,
    pub workers: Option<usize>,
}

impl JudgeConfig {
    /// Worker count to use, preferring an explicit override.
    pub fn worker_count(&self, scheduled: usize) -> usize {
        self.workers.unwrap_or(scheduled)
    }
}

impl TryFrom<Cli> for JudgeConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.time_limit_ms == 0 {
            return Err(ConfigError::Zero("time limit"));
        }
        if cli.compile_time_limit_ms == 0 {
            return Err(ConfigError::Zero("compile time limit"));
        }
        if cli.workers == Some(0) {
            return Err(ConfigError::Zero("worker count"));
        }
        if !cli.root.is_dir() {
            return Err(ConfigError::MissingRoot(cli.root));
        }

        Ok(JudgeConfig {
            schedule: cli.schedule,
            layout: SubmissionLayout::new(&cli.root),
            work_dir: cli
                .work_dir
                .unwrap_or_else(|| std::env::temp_dir().join("judge")),
            compiler: cli.compiler,
            compiler_flags: cli.compiler_flags,
            time_limit: Duration::from_millis(cli.time_limit_ms),
            compile_time_limit: Duration::from_millis(cli.compile_time_limit_ms),
            workers: cli.workers,
        })
    }
}
