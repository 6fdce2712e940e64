use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::domain::ExecutionResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub stdin: PathBuf,
    pub stdout: PathBuf,
}

impl RunCommand {
    pub fn new<P, I, O>(program: P, stdin: I, stdout: O) -> Self
    where
        P: AsRef<Path>,
        I: AsRef<Path>,
        O: AsRef<Path>,
    {
        RunCommand {
            program: program.as_ref().into(),
            args: Vec::new(),
            stdin: stdin.as_ref().into(),
            stdout: stdout.as_ref().into(),
        }
    }

    #[cfg(test)]
    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// The child could not be started at all. Distinct from both execution
/// outcomes.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("cannot open input {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create output {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot spawn {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lost track of child process: {0}")]
    Wait(#[source] std::io::Error),
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait Supervisor: std::fmt::Debug + Send + Sync {
    /// Runs `command` and forcibly ends it once `deadline` elapses.
    async fn run_with_deadline(
        &self,
        command: &RunCommand,
        deadline: Duration,
    ) -> Result<ExecutionResult, LaunchError>;
}
