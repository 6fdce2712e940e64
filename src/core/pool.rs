use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use futures::FutureExt;
use tokio::{
    sync::{Notify, mpsc::Sender},
    task::JoinHandle,
};
use tracing::Instrument;

use crate::core::{
    domain::{Job, JobId, JobStage, Judgement, VerdictReport},
    traits::judge::Judge,
};

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The pool stopped accepting work. The rejected job is handed back.
    #[error("pool closed, job {} rejected", .0.id)]
    Closed(Box<Job>),
    #[error("a pool needs at least one worker")]
    NoWorkers,
}

#[derive(Debug)]
struct PoolState {
    queue: VecDeque<Job>,
    busy: Vec<bool>,
    closed: bool,
}

impl PoolState {
    fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.busy.iter().all(|busy| !busy)
    }
}

enum Next {
    Job(Job),
    Wait,
    Stop,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<PoolState>,
    job_available: Notify,
    drained: Notify,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        // Nothing panics while holding the lock, but stay usable if it ever does.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_for(&self, worker: usize) -> Next {
        let mut state = self.lock();
        match state.queue.pop_front() {
            Some(job) => {
                state.busy[worker] = true;
                Next::Job(job)
            }
            None if state.closed => Next::Stop,
            None => Next::Wait,
        }
    }

    fn finish(&self, worker: usize) {
        let drained = {
            let mut state = self.lock();
            state.busy[worker] = false;
            state.is_drained()
        };
        if drained {
            self.drained.notify_waiters();
        }
    }
}

/// Fixed set of long-lived workers pulling jobs from one FIFO queue.
///
/// Jobs are handed out in submission order; completion order is up to the
/// jobs themselves. Every judged job produces exactly one [`VerdictReport`]
/// on the report channel.
#[derive(Debug)]
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `worker_count` workers on the current tokio runtime.
    pub fn new(
        worker_count: usize,
        judge: Arc<dyn Judge>,
        report_tx: Sender<VerdictReport>,
    ) -> Result<Self, PoolError> {
        if worker_count == 0 {
            return Err(PoolError::NoWorkers);
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                queue: VecDeque::new(),
                busy: vec![false; worker_count],
                closed: false,
            }),
            job_available: Notify::new(),
            drained: Notify::new(),
        });

        let workers = (0..worker_count)
            .map(|worker| {
                tokio::spawn(
                    run_worker(worker, shared.clone(), judge.clone(), report_tx.clone())
                        .instrument(tracing::info_span!("worker", worker)),
                )
            })
            .collect();

        tracing::info!(worker_count, "worker pool started");
        Ok(Self { shared, workers })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Enqueues `job` without waiting for it to run.
    pub fn submit(&self, job: Job) -> Result<(), PoolError> {
        {
            let mut state = self.shared.lock();
            if state.closed {
                return Err(PoolError::Closed(Box::new(job)));
            }
            tracing::debug!(job_id = %job.id, stage = ?JobStage::Queued, queued = state.queue.len() + 1);
            state.queue.push_back(job);
        }
        self.shared.job_available.notify_one();
        Ok(())
    }

    /// Whether the queue is empty and no worker is running a job.
    pub fn is_drained(&self) -> bool {
        self.shared.lock().is_drained()
    }

    pub fn queued_jobs(&self) -> usize {
        self.shared.lock().queue.len()
    }

    pub fn busy_workers(&self) -> usize {
        self.shared.lock().busy.iter().filter(|busy| **busy).count()
    }

    /// Resolves once [`is_drained`](Self::is_drained) holds.
    pub async fn wait_drained(&self) {
        loop {
            let notified = self.shared.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_drained() {
                return;
            }
            notified.await;
        }
    }

    /// Stops accepting new jobs. Queued and running jobs are still judged.
    pub fn close(&self) {
        let was_closed = std::mem::replace(&mut self.shared.lock().closed, true);
        if !was_closed {
            tracing::info!("worker pool closing");
        }
        self.shared.job_available.notify_waiters();
    }

    /// Closes the pool and waits until every worker has drained the queue
    /// and exited.
    pub async fn shutdown(self) {
        self.close();
        for result in futures::future::join_all(self.workers).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "worker terminated abnormally");
            }
        }
        tracing::info!("worker pool stopped");
    }
}

async fn run_worker(
    worker: usize,
    shared: Arc<Shared>,
    judge: Arc<dyn Judge>,
    report_tx: Sender<VerdictReport>,
) {
    loop {
        let job = {
            let notified = shared.job_available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            match shared.next_for(worker) {
                Next::Job(job) => job,
                Next::Stop => break,
                Next::Wait => {
                    notified.await;
                    continue;
                }
            }
        };

        let started = Instant::now();
        tracing::info!(
            job_id = %job.id,
            problem = %job.problem_id,
            arrived_at = %job.arrival_time,
            queued_ms = (chrono::Utc::now() - job.arrival_time).num_milliseconds(),
            "judging"
        );
        let judging = AssertUnwindSafe(async { judge.judge(&job).await });
        let judgement = match judging.catch_unwind().await {
            Ok(judgement) => judgement,
            Err(_) => {
                tracing::error!(job_id = %job.id, "judge panicked");
                Judgement::compile_error()
            }
        };

        let report = VerdictReport::new(&job, judgement, worker, started.elapsed());
        send_report(report, &report_tx, job.id).await;
        shared.finish(worker);
    }

    tracing::debug!("worker exiting");
}

async fn send_report(report: VerdictReport, report_tx: &Sender<VerdictReport>, job_id: JobId) {
    let verdict = report.verdict;
    if report_tx.send(report).await.is_err() {
        tracing::warn!(%job_id, %verdict, "verdict receiver is gone");
    }
}
