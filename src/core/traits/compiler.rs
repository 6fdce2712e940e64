use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("compiler exited with {status:?}: {stderr}")]
    CompilationFailed { status: Option<i32>, stderr: String },
    #[error("compilation did not finish within {0:?}")]
    TimeLimitExceeded(Duration),
    #[error("failed to launch compiler {program}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Turns a submission's source file into a runnable artifact.
#[mockall::automock]
#[async_trait::async_trait]
pub trait Compiler: std::fmt::Debug + Send + Sync {
    async fn compile(&self, source: &Path, artifact: &Path) -> Result<(), CompileError>;
}
