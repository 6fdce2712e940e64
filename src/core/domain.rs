use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProblemId(pub String);

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a problem's inputs and reference outputs live.
///
/// Carried by every [`Job`] so that concurrent jobs for different problems
/// never share directory state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemPaths {
    pub tests_dir: PathBuf,
    pub expected_dir: PathBuf,
}

/// One record of the arrival schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledSubmission {
    pub arrival_offset: Duration,
    pub problem_id: ProblemId,
    pub source_stem: String,
}

#[derive(Clone, Debug)]
pub struct Job {
    pub id: JobId,
    pub problem_id: ProblemId,
    pub source_path: PathBuf,
    pub problem: ProblemPaths,
    /// Offset from the start epoch at which the job became eligible to run.
    pub arrival_offset: Duration,
    pub arrival_time: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub index: u32,
    pub input_path: PathBuf,
    pub expected_output_path: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// `exit_code` is `None` when the child was ended by a signal.
    Completed { exit_code: Option<i32> },
    TimedOut,
}

#[derive(Clone, Debug)]
pub struct ExecutionResult {
    pub outcome: ExecutionOutcome,
    pub produced_output: Vec<u8>,
    pub elapsed: Duration,
}

impl ExecutionResult {
    pub fn completed(exit_code: Option<i32>, produced_output: Vec<u8>, elapsed: Duration) -> Self {
        Self {
            outcome: ExecutionOutcome::Completed { exit_code },
            produced_output,
            elapsed,
        }
    }

    pub fn timed_out(elapsed: Duration) -> Self {
        Self {
            outcome: ExecutionOutcome::TimedOut,
            produced_output: Vec::new(),
            elapsed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    CompileError,
}

impl Verdict {
    pub fn code(&self) -> &'static str {
        match self {
            Verdict::Accepted => "AC",
            Verdict::WrongAnswer => "WA",
            Verdict::TimeLimitExceeded => "TLE",
            Verdict::CompileError => "CERR",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Stages a job moves through inside the judging pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobStage {
    Queued,
    Compiling,
    Executing(usize),
    Cleanup,
    Done(Verdict),
}

/// Outcome of judging one job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Judgement {
    pub verdict: Verdict,
    /// Zero-based position of the first test that did not pass.
    pub failed_test: Option<usize>,
    pub tests_run: usize,
}

impl Judgement {
    pub fn accepted(tests_run: usize) -> Self {
        Self {
            verdict: Verdict::Accepted,
            failed_test: None,
            tests_run,
        }
    }

    pub fn compile_error() -> Self {
        Self {
            verdict: Verdict::CompileError,
            failed_test: None,
            tests_run: 0,
        }
    }

    pub fn failed_at(verdict: Verdict, test_idx: usize) -> Self {
        Self {
            verdict,
            failed_test: Some(test_idx),
            tests_run: test_idx + 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct VerdictReport {
    pub job_id: JobId,
    pub problem_id: ProblemId,
    pub verdict: Verdict,
    pub failed_test: Option<usize>,
    pub tests_run: usize,
    pub worker: usize,
    pub elapsed: Duration,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl VerdictReport {
    pub fn new(job: &Job, judgement: Judgement, worker: usize, elapsed: Duration) -> Self {
        Self {
            job_id: job.id,
            problem_id: job.problem_id.clone(),
            verdict: judgement.verdict,
            failed_test: judgement.failed_test,
            tests_run: judgement.tests_run,
            worker,
            elapsed,
            finished_at: chrono::Utc::now(),
        }
    }
}
