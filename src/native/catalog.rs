use std::path::Path;

use itertools::Itertools;

use crate::core::{
    domain::{ProblemPaths, TestCase},
    traits::catalog::{CatalogError, TestCatalog},
};

const INPUT_PREFIX: &str = "input";
const INPUT_EXTENSION: &str = "inp";

/// Reads test cases from a problem directory on disk.
///
/// Every `input<N>.inp` in the tests directory is paired with
/// `output<N>.out` in the expected-outputs directory. Tests are ordered by
/// `N`, then by file name.
#[derive(Clone, Debug, Default)]
pub struct FsTestCatalog;

impl FsTestCatalog {
    pub fn new() -> Self {
        FsTestCatalog
    }
}

/// Extracts the digits `N` of `input<N>.inp` exactly as written.
fn input_suffix(path: &Path) -> Option<&str> {
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.strip_prefix(INPUT_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits)
}

/// Numeric value of the `input<N>.inp` suffix, used for ordering only.
fn input_index(path: &Path) -> Option<u32> {
    input_suffix(path)?.parse().ok()
}

#[async_trait::async_trait]
impl TestCatalog for FsTestCatalog {
    #[tracing::instrument(skip(self))]
    async fn test_cases(&self, problem: &ProblemPaths) -> Result<Vec<TestCase>, CatalogError> {
        let unreadable = |source: std::io::Error| CatalogError::Unreadable {
            path: problem.tests_dir.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&problem.tests_dir)
            .await
            .map_err(unreadable)?;
        let mut inputs = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == INPUT_EXTENSION) {
                inputs.push(path);
            }
        }

        let mut tests = Vec::with_capacity(inputs.len());
        for input_path in inputs {
            let (Some(suffix), Some(index)) = (input_suffix(&input_path), input_index(&input_path)) else {
                return Err(CatalogError::UnpairedInput(input_path.clone()));
            };
            let expected_output_path = problem.expected_dir.join(format!("output{}.out", suffix));
            if !tokio::fs::try_exists(&expected_output_path).await.unwrap_or(false) {
                return Err(CatalogError::MissingExpected(expected_output_path));
            }

            let name = input_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            tests.push(TestCase {
                name,
                index,
                input_path,
                expected_output_path,
            });
        }

        let tests = tests
            .into_iter()
            .sorted_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(&b.name)))
            .collect_vec();
        tracing::debug!(count = tests.len(), "test cases enumerated");
        Ok(tests)
    }
}
