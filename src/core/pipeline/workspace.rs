use std::path::{Path, PathBuf};

use crate::core::domain::JobId;

/// Transient files owned by a single job. Everything is removed when the
/// guard goes out of scope, whichever stage ended the pipeline.
#[derive(Debug)]
pub struct JobWorkspace {
    job_id: JobId,
    artifact: PathBuf,
    output: PathBuf,
}

impl JobWorkspace {
    pub fn new(dir: &Path, job_id: JobId) -> Self {
        Self {
            job_id,
            artifact: dir.join(format!("participant_executable{}", job_id)),
            output: dir.join(format!("output{}.txt", job_id)),
        }
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        for path in [&self.artifact, &self.output] {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    job_id = %self.job_id,
                    path = %path.display(),
                    error = %e,
                    "failed to remove job file"
                ),
            }
        }
    }
}
