use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::core::{
    domain::{Job, JobId, Judgement, ProblemId, ProblemPaths},
    traits::judge::Judge,
};

/// Builds a job for problem `probA` with the given dispatch id.
pub fn job(id: u64) -> Job {
    Job {
        id: JobId(id),
        problem_id: ProblemId("probA".to_string()),
        source_path: PathBuf::from(format!("Submit/sub{}.cpp", id)),
        problem: ProblemPaths {
            tests_dir: PathBuf::from("problem/probA/testcases"),
            expected_dir: PathBuf::from("problem/probA/expected_outputs"),
        },
        arrival_offset: Duration::ZERO,
        arrival_time: chrono::Utc::now(),
    }
}

/// Accepts every job after a delay and records what it saw.
#[derive(Debug, Default)]
pub struct JudgeStub {
    delay: Duration,
    delays: HashMap<JobId, Duration>,
    panic_on: Option<JobId>,
    started: Mutex<Vec<JobId>>,
    arrivals: Mutex<Vec<(JobId, tokio::time::Instant)>>,
    running: AtomicUsize,
    max_running: AtomicUsize,
}

impl JudgeStub {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    /// Per-job delays overriding the default one.
    pub fn with_delays(mut self, delays: HashMap<JobId, Duration>) -> Self {
        self.delays = delays;
        self
    }

    pub fn panicking_on(mut self, job_id: JobId) -> Self {
        self.panic_on = Some(job_id);
        self
    }

    /// Job ids in the order judging started.
    pub fn started(&self) -> Vec<JobId> {
        self.started.lock().unwrap().clone()
    }

    /// Job ids with the tokio instant at which judging started.
    pub fn arrivals(&self) -> Vec<(JobId, tokio::time::Instant)> {
        self.arrivals.lock().unwrap().clone()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Judge for JudgeStub {
    #[tracing::instrument(skip_all, fields(job_id = %job.id))]
    async fn judge(&self, job: &Job) -> Judgement {
        if self.panic_on == Some(job.id) {
            panic!("stub judge asked to panic on job {}", job.id);
        }

        self.started.lock().unwrap().push(job.id);
        self.arrivals
            .lock()
            .unwrap()
            .push((job.id, tokio::time::Instant::now()));
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(running, Ordering::SeqCst);

        let delay = self.delays.get(&job.id).copied().unwrap_or(self.delay);
        tokio::time::sleep(delay).await;

        self.running.fetch_sub(1, Ordering::SeqCst);
        Judgement::accepted(1)
    }
}
