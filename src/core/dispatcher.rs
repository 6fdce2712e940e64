use tokio::time::{Instant, sleep_until};

use crate::config::SubmissionLayout;
use crate::core::{
    domain::{Job, JobId, ScheduledSubmission},
    pool::{PoolError, WorkerPool},
};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("pool unavailable, job {job_id} was not accepted")]
    PoolUnavailable {
        job_id: JobId,
        #[source]
        source: PoolError,
    },
}

/// Releases scheduled submissions into a [`WorkerPool`] at their arrival
/// times, measured from a shared start epoch.
#[derive(Debug)]
pub struct SubmissionDispatcher {
    layout: SubmissionLayout,
    epoch: Instant,
}

impl SubmissionDispatcher {
    pub fn new(layout: SubmissionLayout, epoch: Instant) -> Self {
        Self { layout, epoch }
    }

    fn build_job(&self, id: JobId, submission: ScheduledSubmission) -> Job {
        Job {
            id,
            source_path: self.layout.source_path(&submission.source_stem),
            problem: self.layout.problem_paths(&submission.problem_id),
            problem_id: submission.problem_id,
            arrival_offset: submission.arrival_offset,
            arrival_time: chrono::Utc::now(),
        }
    }

    /// Submits every submission in order once its arrival time has passed.
    /// Returns the number of jobs handed to the pool.
    ///
    /// Never waits for a job to be judged. Stops at the first job the pool
    /// refuses.
    #[tracing::instrument(skip_all)]
    pub async fn dispatch<I>(&self, submissions: I, pool: &WorkerPool) -> Result<usize, DispatchError>
    where
        I: IntoIterator<Item = ScheduledSubmission>,
    {
        let mut dispatched = 0;
        for (idx, submission) in submissions.into_iter().enumerate() {
            sleep_until(self.epoch + submission.arrival_offset).await;

            let job = self.build_job(JobId(idx as u64), submission);
            let job_id = job.id;
            tracing::info!(
                %job_id,
                problem = %job.problem_id,
                source = %job.source_path.display(),
                arrival_ms = job.arrival_offset.as_millis(),
                "submission arrived"
            );
            pool.submit(job)
                .map_err(|source| DispatchError::PoolUnavailable { job_id, source })?;
            dispatched += 1;
        }

        Ok(dispatched)
    }
}
