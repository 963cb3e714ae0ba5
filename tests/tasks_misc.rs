// tests/tasks_misc.rs

use devtasks::cli::TaskCommand;
use devtasks::errors::DevtasksError;
use devtasks::fs::mock::MockFileSystem;
use devtasks::manifest::find_version;
use devtasks::tasks::{planned_steps, unasync, TaskContext};
use devtasks::types::CommandOutcome;
use devtasks_test_utils::builders::ConfigFileBuilder;
use devtasks_test_utils::{init_tracing, RecordingRunner};

#[test]
fn first_version_line_wins() {
    let text = "[tool.poetry]\nversion = \"2.0.1\"\n\n[tool.other]\nversion = \"9.9.9\"\n";
    assert_eq!(find_version(text), Some("2.0.1"));
    assert_eq!(find_version("version=\"1.0\""), None);
    assert_eq!(find_version("version = \"\""), Some(""));
}

#[tokio::test]
async fn unasync_generates_then_formats() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().build();
    let runner = RecordingRunner::new();
    let fs = MockFileSystem::new();
    let ctx = TaskContext::new(&cfg, &runner, &fs, "/proj");

    unasync(&ctx).await.expect("unasync succeeds");
    assert_eq!(
        runner.commands(),
        vec!["python unasync.py", "poetry run black ."]
    );
}

#[tokio::test]
async fn unasync_stops_when_generation_fails() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().unasync("gen-sync", "fmt").build();
    let runner = RecordingRunner::new().with_exit_code("gen-sync", 3);
    let fs = MockFileSystem::new();
    let ctx = TaskContext::new(&cfg, &runner, &fs, "/proj");

    let err = unasync(&ctx).await.expect_err("generation failed");
    assert_eq!(err.exit_code(), 3);
    assert_eq!(runner.commands(), vec!["gen-sync"]);
}

#[test]
fn exit_codes_per_error_kind() {
    assert_eq!(
        DevtasksError::StagesFailed(vec!["Type check".into()]).exit_code(),
        1
    );
    assert_eq!(
        DevtasksError::CommandFailed { cmd: "pytest".into(), code: 7 }.exit_code(),
        7
    );
    // Signal deaths and spawn failures are reported as -1.
    assert_eq!(
        DevtasksError::CommandFailed { cmd: "pytest".into(), code: -1 }.exit_code(),
        1
    );
    assert_eq!(DevtasksError::ConfigError("x".into()).exit_code(), 1);
    assert_eq!(DevtasksError::Interrupted.exit_code(), 130);
}

#[test]
fn command_outcome_codes() {
    assert_eq!(CommandOutcome::from_code(0), CommandOutcome::Success);
    assert_eq!(CommandOutcome::from_code(2).code(), 2);
    assert!(!CommandOutcome::Failed(-1).is_success());
}

#[test]
fn dry_run_plans_describe_commands_without_running_them() {
    let cfg = ConfigFileBuilder::new().build();
    let runner = RecordingRunner::new();
    let fs = MockFileSystem::new();
    fs.add_file("/proj/pyproject.toml", "version = \"3.1.0\"\n");
    let ctx = TaskContext::new(&cfg, &runner, &fs, "/proj");

    assert_eq!(
        planned_steps(TaskCommand::Test, &ctx),
        vec![
            "pre-commit run --all-files".to_string(),
            "mypy firedantic".to_string(),
            "FIRESTORE_EMULATOR_HOST=127.0.0.1:8686 pytest".to_string(),
        ]
    );
    assert_eq!(
        planned_steps(TaskCommand::Release, &ctx),
        vec!["git tag 3.1.0".to_string(), "git push origin 3.1.0".to_string()]
    );
    assert_eq!(runner.call_count(), 0);
}
