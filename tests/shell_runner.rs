// tests/shell_runner.rs

#![cfg(unix)]

use devtasks::exec::{CommandRunner, ShellRunner};
use devtasks::types::{CommandOutcome, EnvOverrides};

#[tokio::test]
async fn exit_status_is_returned_not_raised() {
    let runner = ShellRunner::new();
    assert_eq!(runner.run("true", None).await, CommandOutcome::Success);
    assert_eq!(runner.run("exit 3", None).await, CommandOutcome::Failed(3));
}

#[tokio::test]
async fn unknown_command_is_just_a_failure() {
    let runner = ShellRunner::new();
    let outcome = runner
        .run("definitely-not-a-real-command-devtasks", None)
        .await;
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn env_overrides_are_merged_into_inherited_environment() {
    let runner = ShellRunner::new();
    let mut env = EnvOverrides::new();
    env.insert("DEVTASKS_TEST_VALUE".to_string(), "127.0.0.1:8686".to_string());

    let outcome = runner
        .run(
            r#"test "$DEVTASKS_TEST_VALUE" = "127.0.0.1:8686" && test -n "$PATH""#,
            Some(&env),
        )
        .await;
    assert_eq!(outcome, CommandOutcome::Success);

    // Without overrides the variable is absent.
    let outcome = runner.run(r#"test -z "$DEVTASKS_TEST_VALUE""#, None).await;
    assert_eq!(outcome, CommandOutcome::Success);
}
