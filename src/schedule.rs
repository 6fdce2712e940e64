use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::domain::{ProblemId, ScheduledSubmission};

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("cannot read schedule {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("schedule ended early: missing {0}")]
    Missing(String),
    #[error("invalid {field}: {value:?}")]
    Invalid { field: String, value: String },
    #[error("schedule declares {declared} jobs but has trailing data {trailing:?}")]
    Trailing { declared: usize, trailing: String },
}

/// Arrival schedule: how many workers to run and when each submission
/// arrives, relative to the start epoch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrivalSchedule {
    pub worker_count: usize,
    pub submissions: Vec<ScheduledSubmission>,
}

impl ArrivalSchedule {
    pub async fn load<T: AsRef<Path>>(path: T) -> Result<Self, ScheduleError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ScheduleError::Io {
                path: path.into(),
                source,
            })?;
        text.parse()
    }
}

fn next_token<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    field: impl Fn() -> String,
) -> Result<&'a str, ScheduleError> {
    tokens.next().ok_or_else(|| ScheduleError::Missing(field()))
}

fn next_number<'a, N: std::str::FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    field: impl Fn() -> String,
) -> Result<N, ScheduleError> {
    let token = next_token(tokens, &field)?;
    token.parse().map_err(|_| ScheduleError::Invalid {
        field: field(),
        value: token.to_string(),
    })
}

impl std::str::FromStr for ArrivalSchedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_ascii_whitespace();

        let total_jobs: usize = next_number(&mut tokens, || "total_jobs".to_string())?;
        let worker_count: usize = next_number(&mut tokens, || "worker_count".to_string())?;

        let mut submissions = Vec::with_capacity(total_jobs);
        for record in 0..total_jobs {
            let arrival_ms: u64 = next_number(&mut tokens, || format!("arrival_time_ms of record {}", record))?;
            let problem_id = next_token(&mut tokens, || format!("problem_id of record {}", record))?;
            let source_stem = next_token(&mut tokens, || format!("source_stem of record {}", record))?;

            submissions.push(ScheduledSubmission {
                arrival_offset: Duration::from_millis(arrival_ms),
                problem_id: ProblemId(problem_id.to_string()),
                source_stem: source_stem.to_string(),
            });
        }

        if let Some(trailing) = tokens.next() {
            return Err(ScheduleError::Trailing {
                declared: total_jobs,
                trailing: trailing.to_string(),
            });
        }

        Ok(ArrivalSchedule {
            worker_count,
            submissions,
        })
    }
}
