use std::path::PathBuf;

use crate::core::domain::{ProblemPaths, TestCase};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read test directory {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("input {0} does not follow the input<N>.inp naming")]
    UnpairedInput(PathBuf),
    #[error("expected output {0} is missing")]
    MissingExpected(PathBuf),
}

/// Lists the test cases of a problem in evaluation order.
#[mockall::automock]
#[async_trait::async_trait]
pub trait TestCatalog: std::fmt::Debug + Send + Sync {
    async fn test_cases(&self, problem: &ProblemPaths) -> Result<Vec<TestCase>, CatalogError>;
}
