use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::config::SubmissionLayout;
use crate::core::{domain::Verdict, pipeline::judging::JudgingPipeline};
use crate::native::{catalog::FsTestCatalog, compiler::CommandCompiler, supervisor::ProcessSupervisor};
use crate::schedule::ArrivalSchedule;
use crate::stubs::compiler::FAKE_CC;

/// A judge root with `Submit/` and `problem/` laid out on disk.
struct JudgeRoot {
    root: PathBuf,
}

impl JudgeRoot {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!("judge_e2e_{}", Uuid::new_v4()));
        std::fs::create_dir_all(root.join("Submit")).unwrap();
        JudgeRoot { root }
    }

    fn submit(&self, stem: &str, source: &str) {
        std::fs::write(self.root.join("Submit").join(format!("{}.cpp", stem)), source).unwrap();
    }

    fn problem(&self, problem_id: &str, cases: &[(&str, &str)]) {
        let problem_dir = self.root.join("problem").join(problem_id);
        std::fs::create_dir_all(problem_dir.join("testcases")).unwrap();
        std::fs::create_dir_all(problem_dir.join("expected_outputs")).unwrap();
        for (i, (input, expected)) in cases.iter().enumerate() {
            let index = i + 1;
            std::fs::write(problem_dir.join("testcases").join(format!("input{}.inp", index)), input).unwrap();
            std::fs::write(
                problem_dir.join("expected_outputs").join(format!("output{}.out", index)),
                expected,
            )
            .unwrap();
        }
    }

    fn path(&self) -> &Path {
        &self.root
    }
}

impl Drop for JudgeRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

fn sum_problem(root: &JudgeRoot) {
    root.problem("probA", &[("1 2\n", "3\n"), ("10 20\n", "30")]);
}

#[tokio::test]
async fn test_schedule_produces_ac_cerr_tle_wa() {
    let root = JudgeRoot::new();
    sum_problem(&root);
    root.submit("probA_AC", "#!/bin/sh\nread a b\necho $((a + b))\n");
    root.submit("probA_CERR", "#!/bin/sh\n# COMPILE_ERROR\nread a b\necho $((a + b))\n");
    root.submit("probA_TLE", "#!/bin/sh\nsleep 10\n");
    root.submit(
        "probA_WA",
        "#!/bin/sh\nread a b\nif [ \"$a\" = 10 ]; then echo 0; else echo $((a + b)); fi\n",
    );
    std::fs::write(root.path().join("fake_cc.sh"), FAKE_CC).unwrap();

    let schedule: ArrivalSchedule = "4 2\n0 probA probA_AC\n20 probA probA_CERR\n20 probA probA_TLE\n40 probA probA_WA\n"
        .parse()
        .unwrap();
    let pipeline = Arc::new(
        JudgingPipeline::new(
            Arc::new(CommandCompiler::new(
                "/bin/sh",
                [root.path().join("fake_cc.sh")],
                Duration::from_secs(5),
            )),
            Arc::new(ProcessSupervisor::new()),
            Arc::new(FsTestCatalog::new()),
            root.path().join("work"),
            Duration::from_millis(500),
        )
        .unwrap(),
    );
    let work_dir = pipeline.work_dir().to_path_buf();

    let summary = crate::run(
        pipeline,
        schedule.worker_count,
        SubmissionLayout::new(root.path()),
        schedule.submissions,
        Instant::now(),
    )
    .await
    .unwrap();

    let reports = summary.by_job();
    assert_eq!(reports.len(), 4);

    assert_eq!(reports[0].verdict, Verdict::Accepted);
    assert_eq!(reports[0].tests_run, 2);

    assert_eq!(reports[1].verdict, Verdict::CompileError);
    assert_eq!(reports[1].tests_run, 0);

    assert_eq!(reports[2].verdict, Verdict::TimeLimitExceeded);
    assert_eq!(reports[2].failed_test, Some(0));
    assert_eq!(reports[2].tests_run, 1);

    assert_eq!(reports[3].verdict, Verdict::WrongAnswer);
    assert_eq!(reports[3].failed_test, Some(1));

    assert!(!work_dir.exists());
}

#[tokio::test]
async fn test_missing_problem_is_reported_not_fatal() {
    let root = JudgeRoot::new();
    sum_problem(&root);
    root.submit("probA_AC", "#!/bin/sh\nread a b\necho $((a + b))\n");
    root.submit("probZ_AC", "#!/bin/sh\nread a b\necho $((a + b))\n");
    std::fs::write(root.path().join("fake_cc.sh"), FAKE_CC).unwrap();

    let schedule: ArrivalSchedule = "2 1\n0 probZ probZ_AC\n0 probA probA_AC\n".parse().unwrap();
    let pipeline = JudgingPipeline::new(
        Arc::new(CommandCompiler::new(
            "/bin/sh",
            [root.path().join("fake_cc.sh")],
            Duration::from_secs(5),
        )),
        Arc::new(ProcessSupervisor::new()),
        Arc::new(FsTestCatalog::new()),
        root.path().join("work"),
        Duration::from_secs(2),
    )
    .unwrap();

    let summary = crate::run(
        Arc::new(pipeline),
        schedule.worker_count,
        SubmissionLayout::new(root.path()),
        schedule.submissions,
        Instant::now(),
    )
    .await
    .unwrap();

    let reports = summary.by_job();
    assert_eq!(reports[0].verdict, Verdict::CompileError);
    assert_eq!(reports[1].verdict, Verdict::Accepted);
}

/// Runs only where a C++ compiler is installed.
#[tokio::test]
async fn test_real_compiler_round() {
    let compiler = std::env::var("GNUCPP_PATH").unwrap_or_else(|_| "g++".to_string());
    let available = std::process::Command::new(&compiler)
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success());
    if !available {
        eprintln!("skipping: {} not available", compiler);
        return;
    }

    let root = JudgeRoot::new();
    sum_problem(&root);
    root.submit(
        "probA_AC",
        r#"
#include <iostream>

int main() {
    long long a, b;
    std::cin >> a >> b;
    std::cout << a + b << std::endl;
    return 0;
}
"#,
    );
    root.submit(
        "probA_CERR",
        r#"
#include <iostream>

int main() {
    std::cout << "missing semicolon"
    return 0;
}
"#,
    );
    root.submit(
        "probA_TLE",
        r#"
int main() {
    volatile unsigned long long spin = 0;
    while (true) {
        ++spin;
    }
}
"#,
    );

    let schedule: ArrivalSchedule = "3 3\n0 probA probA_AC\n0 probA probA_CERR\n0 probA probA_TLE\n"
        .parse()
        .unwrap();
    let pipeline = JudgingPipeline::new(
        Arc::new(CommandCompiler::new(
            &compiler,
            ["-std=c++17", "-O2"],
            Duration::from_secs(60),
        )),
        Arc::new(ProcessSupervisor::new()),
        Arc::new(FsTestCatalog::new()),
        root.path().join("work"),
        Duration::from_millis(1000),
    )
    .unwrap();

    let summary = crate::run(
        Arc::new(pipeline),
        schedule.worker_count,
        SubmissionLayout::new(root.path()),
        schedule.submissions,
        Instant::now(),
    )
    .await
    .unwrap();

    let verdicts = summary.by_job().iter().map(|r| r.verdict).collect::<Vec<_>>();
    assert_eq!(
        verdicts,
        vec![Verdict::Accepted, Verdict::CompileError, Verdict::TimeLimitExceeded]
    );
}
