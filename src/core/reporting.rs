use std::collections::BTreeMap;

use itertools::Itertools;
use tokio::sync::mpsc::Receiver;

use crate::core::domain::{Verdict, VerdictReport};

/// What a run produced once every report has been collected.
#[derive(Debug, Default)]
pub struct VerdictSummary {
    pub reports: Vec<VerdictReport>,
}

impl VerdictSummary {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn counts(&self) -> BTreeMap<Verdict, usize> {
        self.reports
            .iter()
            .map(|report| report.verdict)
            .counts()
            .into_iter()
            .collect()
    }

    /// Reports ordered by job id rather than by completion.
    pub fn by_job(&self) -> Vec<&VerdictReport> {
        self.reports
            .iter()
            .sorted_by_key(|report| report.job_id)
            .collect_vec()
    }
}

/// Logs every report as it arrives. Resolves when all senders are gone.
pub async fn collect_reports(mut rx: Receiver<VerdictReport>) -> VerdictSummary {
    let mut summary = VerdictSummary::default();
    while let Some(report) = rx.recv().await {
        tracing::info!(
            job_id = %report.job_id,
            problem = %report.problem_id,
            verdict = %report.verdict,
            failed_test = ?report.failed_test,
            tests_run = report.tests_run,
            worker = report.worker,
            elapsed_ms = report.elapsed.as_millis(),
            "verdict"
        );
        summary.reports.push(report);
    }
    summary
}
