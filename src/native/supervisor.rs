use std::process::Stdio;
use std::time::Duration;

use tokio::{
    process::Command,
    time::{Instant, timeout},
};

use crate::core::{
    domain::ExecutionResult,
    traits::supervisor::{LaunchError, RunCommand, Supervisor},
};
use crate::native::process::{isolate_group, terminate};

/// Runs test executions as child processes in their own process group and
/// kills the whole group when the deadline passes.
#[derive(Clone, Debug, Default)]
pub struct ProcessSupervisor;

impl ProcessSupervisor {
    pub fn new() -> Self {
        ProcessSupervisor
    }
}

#[async_trait::async_trait]
impl Supervisor for ProcessSupervisor {
    #[tracing::instrument(skip(self), fields(program = %command.program.display()))]
    async fn run_with_deadline(
        &self,
        command: &RunCommand,
        deadline: Duration,
    ) -> Result<ExecutionResult, LaunchError> {
        let stdin = tokio::fs::File::open(&command.stdin)
            .await
            .map_err(|source| LaunchError::Input {
                path: command.stdin.clone(),
                source,
            })?
            .into_std()
            .await;
        let stdout = tokio::fs::File::create(&command.stdout)
            .await
            .map_err(|source| LaunchError::Output {
                path: command.stdout.clone(),
                source,
            })?
            .into_std()
            .await;

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::null())
            .kill_on_drop(true);
        isolate_group(&mut cmd);

        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: command.program.clone(),
            source,
        })?;
        let pid = child.id();

        match timeout(deadline, child.wait()).await {
            Ok(status) => {
                let status = status.map_err(LaunchError::Wait)?;
                let elapsed = started.elapsed();
                tracing::debug!(?status, elapsed_ms = elapsed.as_millis(), "child completed");

                let produced_output =
                    tokio::fs::read(&command.stdout)
                        .await
                        .map_err(|source| LaunchError::Output {
                            path: command.stdout.clone(),
                            source,
                        })?;
                Ok(ExecutionResult::completed(status.code(), produced_output, elapsed))
            }
            Err(_) => {
                tracing::debug!(?pid, "deadline reached, terminating");
                terminate(&mut child, pid).await;
                Ok(ExecutionResult::timed_out(started.elapsed()))
            }
        }
    }
}
