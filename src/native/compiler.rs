use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::{io::AsyncReadExt, process::Command, time::timeout};

use crate::core::traits::compiler::{CompileError, Compiler};
use crate::native::process::{isolate_group, terminate};

/// Invokes an external compiler as `<program> [flags...] <source> -o <artifact>`.
#[derive(Clone, Debug)]
pub struct CommandCompiler {
    program: PathBuf,
    flags: Vec<OsString>,
    time_limit: Duration,
}

impl CommandCompiler {
    pub fn new<T, I, S>(program: T, flags: I, time_limit: Duration) -> Self
    where
        T: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        CommandCompiler {
            program: program.as_ref().into(),
            flags: flags.into_iter().map(Into::into).collect(),
            time_limit,
        }
    }
}

#[async_trait::async_trait]
impl Compiler for CommandCompiler {
    #[tracing::instrument(skip(self))]
    async fn compile(&self, source: &Path, artifact: &Path) -> Result<(), CompileError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.flags)
            .arg(source)
            .arg("-o")
            .arg(artifact)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        isolate_group(&mut cmd);

        let launch_error = |source: std::io::Error| CompileError::Launch {
            program: self.program.clone(),
            source,
        };
        let mut child = cmd.spawn().map_err(launch_error)?;
        let pid = child.id();
        let mut stderr_pipe = child.stderr.take();

        let finished = timeout(self.time_limit, async {
            let mut stderr = Vec::new();
            if let Some(pipe) = stderr_pipe.as_mut() {
                pipe.read_to_end(&mut stderr).await?;
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stderr))
        })
        .await;

        let (status, stderr) = match finished {
            Ok(finished) => finished.map_err(launch_error)?,
            Err(_) => {
                tracing::debug!(?pid, "compile time limit reached, terminating");
                terminate(&mut child, pid).await;
                return Err(CompileError::TimeLimitExceeded(self.time_limit));
            }
        };

        if !status.success() {
            return Err(CompileError::CompilationFailed {
                status: status.code(),
                stderr: String::from_utf8_lossy(&stderr).to_string(),
            });
        }

        if !tokio::fs::try_exists(artifact).await.unwrap_or(false) {
            return Err(CompileError::CompilationFailed {
                status: status.code(),
                stderr: format!("artifact was not created at {}", artifact.display()),
            });
        }

        tracing::debug!(artifact = %artifact.display(), "compiled");
        Ok(())
    }
}
