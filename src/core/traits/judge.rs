use crate::core::domain::{Job, Judgement};

/// Anything a worker can hand a job to. Implementations must turn every
/// failure into a [`Judgement`].
#[mockall::automock]
#[async_trait::async_trait]
pub trait Judge: Send + Sync {
    async fn judge(&self, job: &Job) -> Judgement;
}
