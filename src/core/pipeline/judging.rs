use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::core::{
    domain::{ExecutionOutcome, Job, JobStage, Judgement, Verdict},
    pipeline::{
        comparing::{Comparison, compare_outputs},
        workspace::JobWorkspace,
    },
    traits::{
        catalog::TestCatalog,
        compiler::{CompileError, Compiler},
        judge::Judge,
        supervisor::{RunCommand, Supervisor},
    },
};

/// Compiles a submission and runs it against every test case of its problem,
/// stopping at the first test that does not pass.
#[derive(Debug)]
pub struct JudgingPipeline {
    compiler: Arc<dyn Compiler>,
    supervisor: Arc<dyn Supervisor>,
    catalog: Arc<dyn TestCatalog>,
    work_dir: PathBuf,
    time_limit: Duration,
}

impl JudgingPipeline {
    /// Creates a pipeline whose job files live in a fresh directory under
    /// `base_dir`, removed again when the pipeline is dropped.
    pub fn new<T: AsRef<Path>>(
        compiler: Arc<dyn Compiler>,
        supervisor: Arc<dyn Supervisor>,
        catalog: Arc<dyn TestCatalog>,
        base_dir: T,
        time_limit: Duration,
    ) -> std::io::Result<Self> {
        let work_dir = base_dir.as_ref().join(format!("judge_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&work_dir)?;

        Ok(Self {
            compiler,
            supervisor,
            catalog,
            work_dir,
            time_limit,
        })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    #[tracing::instrument(skip_all, fields(job_id = %job.id, problem = %job.problem_id))]
    pub async fn evaluate(&self, job: &Job) -> Judgement {
        let workspace = JobWorkspace::new(&self.work_dir, job.id);
        let judgement = self.run_stages(job, &workspace).await;

        tracing::debug!(stage = ?JobStage::Cleanup);
        drop(workspace);
        tracing::debug!(stage = ?JobStage::Done(judgement.verdict));

        judgement
    }

    async fn run_stages(&self, job: &Job, workspace: &JobWorkspace) -> Judgement {
        tracing::debug!(stage = ?JobStage::Compiling, source = %job.source_path.display());
        if let Err(e) = self.compiler.compile(&job.source_path, workspace.artifact()).await {
            match &e {
                CompileError::CompilationFailed { .. } | CompileError::TimeLimitExceeded(_) => {
                    tracing::info!(error = %e, "compilation failed")
                }
                CompileError::Launch { .. } => tracing::error!(error = %e, "compiler unavailable"),
            }
            return Judgement::compile_error();
        }

        let tests = match self.catalog.test_cases(&job.problem).await {
            Ok(tests) => tests,
            Err(e) => {
                tracing::error!(error = %e, "cannot enumerate test cases");
                return Judgement::compile_error();
            }
        };

        for (test_idx, test) in tests.iter().enumerate() {
            tracing::debug!(stage = ?JobStage::Executing(test_idx), test = %test.name);

            let command = RunCommand::new(workspace.artifact(), &test.input_path, workspace.output());
            let result = match self.supervisor.run_with_deadline(&command, self.time_limit).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(test = %test.name, error = %e, "launch failure");
                    return Judgement::failed_at(Verdict::CompileError, test_idx);
                }
            };

            match result.outcome {
                ExecutionOutcome::TimedOut => {
                    tracing::info!(test = %test.name, elapsed_ms = result.elapsed.as_millis(), "time limit exceeded");
                    return Judgement::failed_at(Verdict::TimeLimitExceeded, test_idx);
                }
                ExecutionOutcome::Completed { exit_code } => {
                    if exit_code != Some(0) {
                        tracing::warn!(test = %test.name, ?exit_code, "program exited abnormally");
                    }
                }
            }

            let expected = match tokio::fs::read(&test.expected_output_path).await {
                Ok(expected) => expected,
                Err(e) => {
                    tracing::error!(
                        path = %test.expected_output_path.display(),
                        error = %e,
                        "cannot read expected output"
                    );
                    return Judgement::failed_at(Verdict::CompileError, test_idx);
                }
            };

            match compare_outputs(&result.produced_output, &expected) {
                Comparison::Match => {}
                Comparison::Mismatch {
                    token_idx,
                    expected,
                    actual,
                } => {
                    tracing::info!(test = %test.name, token_idx, ?expected, ?actual, "output mismatch");
                    return Judgement::failed_at(Verdict::WrongAnswer, test_idx);
                }
            }
        }

        Judgement::accepted(tests.len())
    }
}

#[async_trait::async_trait]
impl Judge for JudgingPipeline {
    async fn judge(&self, job: &Job) -> Judgement {
        self.evaluate(job).await
    }
}

impl Drop for JudgingPipeline {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.work_dir);
    }
}
