use std::panic;
use std::sync::Arc;

use clap::Parser;
use itertools::Itertools;
use tokio::{sync::mpsc, time::Instant};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::{JudgeConfig, SubmissionLayout};
use crate::constants::{DEFAULT_LOG_FILTER, REPORT_CHANNEL_CAPACITY};
use crate::core::{
    dispatcher::SubmissionDispatcher,
    domain::ScheduledSubmission,
    pipeline::judging::JudgingPipeline,
    pool::WorkerPool,
    reporting::{VerdictSummary, collect_reports},
    traits::judge::Judge,
};
use crate::native::{catalog::FsTestCatalog, compiler::CommandCompiler, supervisor::ProcessSupervisor};
use crate::schedule::ArrivalSchedule;

mod cli;
mod config;
mod constants;
mod core;
mod native;
mod schedule;

#[cfg(test)]
mod integration_test;
#[cfg(test)]
mod stubs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();
    set_panic_hook();

    let config = JudgeConfig::try_from(Cli::parse())?;
    let schedule = ArrivalSchedule::load(&config.schedule).await?;
    let worker_count = config.worker_count(schedule.worker_count);
    tracing::info!(
        schedule = %config.schedule.display(),
        jobs = schedule.submissions.len(),
        worker_count,
        "schedule loaded"
    );

    let pipeline = JudgingPipeline::new(
        Arc::new(CommandCompiler::new(
            &config.compiler,
            &config.compiler_flags,
            config.compile_time_limit,
        )),
        Arc::new(ProcessSupervisor::new()),
        Arc::new(FsTestCatalog::new()),
        &config.work_dir,
        config.time_limit,
    )?;
    tracing::debug!(work_dir = %pipeline.work_dir().display(), "judging pipeline ready");

    let epoch = Instant::now();
    let summary = run(Arc::new(pipeline), worker_count, config.layout, schedule.submissions, epoch).await?;

    let counts = summary
        .counts()
        .into_iter()
        .map(|(verdict, count)| format!("{}={}", verdict, count))
        .join(" ");
    for report in summary.by_job() {
        tracing::debug!(
            job_id = %report.job_id,
            verdict = %report.verdict,
            finished_at = %report.finished_at,
            "judged"
        );
    }
    tracing::info!(
        jobs = summary.total(),
        verdicts = %counts,
        total_ms = epoch.elapsed().as_millis(),
        "all submissions judged"
    );

    Ok(())
}

/// Dispatches `submissions` into a fresh pool and waits for every verdict.
async fn run(
    judge: Arc<dyn Judge>,
    worker_count: usize,
    layout: SubmissionLayout,
    submissions: Vec<ScheduledSubmission>,
    epoch: Instant,
) -> Result<VerdictSummary, Box<dyn std::error::Error>> {
    let (report_tx, report_rx) = mpsc::channel(REPORT_CHANNEL_CAPACITY);
    let reporter = tokio::spawn(collect_reports(report_rx));

    let pool = WorkerPool::new(worker_count, judge, report_tx)?;
    let dispatcher = SubmissionDispatcher::new(layout, epoch);
    let dispatched = dispatcher.dispatch(submissions, &pool).await;
    tracing::debug!(
        workers = pool.worker_count(),
        busy = pool.busy_workers(),
        queued = pool.queued_jobs(),
        "dispatch finished, waiting for workers"
    );

    pool.wait_drained().await;
    pool.shutdown().await;
    // Workers own the last senders, so the reporter finishes once they exit.
    let summary = reporter.await?;

    dispatched?;
    Ok(summary)
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
