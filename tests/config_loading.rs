// tests/config_loading.rs

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use devtasks::config::{load_and_validate, load_or_default, project_root, ConfigFile};
use devtasks::errors::DevtasksError;
use devtasks_test_utils::builders::ConfigFileBuilder;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn defaults_match_the_stock_workflow() {
    let cfg = ConfigFile::default();

    assert_eq!(cfg.checks().hooks, "pre-commit run --all-files");
    assert_eq!(cfg.checks().type_check, "mypy firedantic");
    assert_eq!(cfg.checks().unit_tests, "pytest");
    assert_eq!(
        cfg.env().get("FIRESTORE_EMULATOR_HOST").map(String::as_str),
        Some("127.0.0.1:8686")
    );
    assert_eq!(
        cfg.watch().ignore,
        vec![".idea", ".pytest_cache", "__pycache__", ".git"]
    );
    assert_eq!(cfg.release().manifest, "pyproject.toml");
    assert_eq!(cfg.release().remote, "origin");
    assert_eq!(cfg.changelog().path, "CHANGELOG.md");
    assert_eq!(cfg.unasync().format, "poetry run black .");
}

#[test]
fn empty_file_yields_defaults() {
    let file = write_config("");
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.checks().unit_tests, "pytest");
    assert_eq!(cfg.env().len(), 1);
}

#[test]
fn partial_sections_override_only_given_fields() {
    let file = write_config(
        r#"
[env]
DATABASE_URL = "postgres://localhost/test"

[checks]
unit_tests = "cargo test"

[watch]
ignore = ["target", ".git"]

[release]
remote = "upstream"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.checks().unit_tests, "cargo test");
    assert_eq!(cfg.checks().hooks, "pre-commit run --all-files");
    assert_eq!(cfg.env().len(), 1);
    assert!(cfg.env().contains_key("DATABASE_URL"));
    assert_eq!(cfg.watch().ignore, vec!["target", ".git"]);
    assert_eq!(cfg.release().remote, "upstream");
    assert_eq!(cfg.release().manifest, "pyproject.toml");
}

#[test]
fn empty_command_is_rejected() {
    let file = write_config("[checks]\ntype_check = \"  \"\n");

    match load_and_validate(file.path()) {
        Err(DevtasksError::ConfigError(msg)) => assert!(msg.contains("checks.type_check")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn empty_ignore_entry_is_rejected() {
    let raw = ConfigFileBuilder::new().ignore(&[".git", ""]).raw();
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(DevtasksError::ConfigError(_))
    ));
}

#[test]
fn empty_remote_and_bad_env_name_are_rejected() {
    let raw = ConfigFileBuilder::new().remote("").raw();
    assert!(matches!(ConfigFile::try_from(raw), Err(DevtasksError::ConfigError(_))));

    let raw = ConfigFileBuilder::new().with_env("A=B", "x").raw();
    assert!(matches!(ConfigFile::try_from(raw), Err(DevtasksError::ConfigError(_))));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = write_config("[checks\nunit_tests = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(DevtasksError::TomlError(_))
    ));
}

#[test]
fn unknown_value_type_is_a_toml_error() {
    let file = write_config("[watch]\nignore = \".git\"\n");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(DevtasksError::TomlError(_))
    ));
}

#[test]
fn explicit_missing_config_is_an_io_error() {
    let result = load_or_default(Some(Path::new("/definitely/not/here/Devtasks.toml")));
    assert!(matches!(result, Err(DevtasksError::IoError(_))));
}

#[test]
fn project_root_is_config_parent_or_cwd() {
    assert_eq!(
        project_root(Some(Path::new("tools/Devtasks.toml"))),
        PathBuf::from("tools")
    );

    let cwd = std::env::current_dir().unwrap();
    assert_eq!(project_root(Some(Path::new("Devtasks.toml"))), cwd);
    assert_eq!(project_root(None), cwd);
}
