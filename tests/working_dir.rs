//! Integration tests for the scoped working-directory change

mod common;

use atbuild::error::{AtbuildError, ExecutionError};
use atbuild::runner::{Context, Task, Verbosity, WorkingDirGuard};
use atbuild::tools::{ShellTool, Tool};
use common::canonical;
use serial_test::serial;
use std::env;
use tempfile::TempDir;

#[test]
#[serial]
fn test_restored_after_failing_shell_task() {
    let before = env::current_dir().unwrap();
    let temp_dir = TempDir::new().unwrap();

    let task = Task::new("broken", ShellTool::NAME)
        .with_option("script", "exit 1")
        .with_imported_path(temp_dir.path());
    let ctx = Context::new().with_verbosity(Verbosity::Silent);

    assert!(ShellTool.run(&task, &ctx).is_err());
    assert_eq!(env::current_dir().unwrap(), before);
}

#[test]
#[serial]
fn test_shell_task_runs_inside_imported_path() {
    let before = env::current_dir().unwrap();
    let temp_dir = TempDir::new().unwrap();

    let task = Task::new("pwd", ShellTool::NAME)
        .with_option("script", "pwd -P > cwd.txt")
        .with_imported_path(temp_dir.path());
    let ctx = Context::new().with_verbosity(Verbosity::Silent);

    ShellTool.run(&task, &ctx).unwrap();

    let cwd = std::fs::read_to_string(temp_dir.path().join("cwd.txt")).unwrap();
    assert_eq!(cwd.trim_end(), canonical(temp_dir.path()).to_str().unwrap());
    assert_eq!(env::current_dir().unwrap(), before);
}

#[test]
#[serial]
fn test_guard_restores_on_drop() {
    let before = env::current_dir().unwrap();
    let temp_dir = TempDir::new().unwrap();

    {
        let guard = WorkingDirGuard::enter(temp_dir.path()).unwrap();
        assert_eq!(guard.previous(), before.as_path());
        assert_eq!(
            canonical(&env::current_dir().unwrap()),
            canonical(temp_dir.path())
        );
    }

    assert_eq!(env::current_dir().unwrap(), before);
}

#[test]
#[serial]
fn test_guard_explicit_restore() {
    let before = env::current_dir().unwrap();
    let temp_dir = TempDir::new().unwrap();

    let guard = WorkingDirGuard::enter(temp_dir.path()).unwrap();
    guard.restore().unwrap();

    assert_eq!(env::current_dir().unwrap(), before);
}

#[test]
#[serial]
fn test_enter_missing_directory() {
    let before = env::current_dir().unwrap();
    let temp_dir = TempDir::new().unwrap();

    let result = WorkingDirGuard::enter(&temp_dir.path().join("missing"));

    let err = result.unwrap_err();
    assert!(matches!(err, ExecutionError::EnterWorkingDirectory { .. }));
    assert_eq!(atbuild::AtbuildError::from(err).exit_code(), 42);
    assert_eq!(env::current_dir().unwrap(), before);
}

#[test]
#[serial]
fn test_failed_restore_exits_42() {
    let before = env::current_dir().unwrap();
    let scratch = TempDir::new().unwrap();
    let invoking = scratch.path().join("gone");
    let task_dir = scratch.path().join("task");
    std::fs::create_dir(&invoking).unwrap();
    std::fs::create_dir(&task_dir).unwrap();
    env::set_current_dir(&invoking).unwrap();

    let task = Task::new("cleanup", ShellTool::NAME)
        .with_option("script", format!("rmdir '{}'", invoking.display()))
        .with_imported_path(&task_dir);
    let ctx = Context::new().with_verbosity(Verbosity::Silent);

    let result = ShellTool.run(&task, &ctx);
    env::set_current_dir(&before).unwrap();

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        AtbuildError::Execution(ExecutionError::RestoreWorkingDirectory { .. })
    ));
    assert_eq!(err.exit_code(), 42);
}

#[test]
#[serial]
fn test_shell_expands_its_own_variables() {
    let before = env::current_dir().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let saved_pwd = env::var_os("PWD");
    let saved_x = env::var_os("X");
    env::set_var("PWD", "/invoking/shell/dir");
    env::set_var("X", "outer");

    let task = Task::new("vars", ShellTool::NAME)
        .with_option("script", "echo ${PWD} > out.txt; X=inner; echo ${X} >> out.txt")
        .with_imported_path(temp_dir.path());
    let ctx = Context::new().with_verbosity(Verbosity::Silent);
    let result = ShellTool.run(&task, &ctx);

    match saved_pwd {
        Some(value) => env::set_var("PWD", value),
        None => env::remove_var("PWD"),
    }
    match saved_x {
        Some(value) => env::set_var("X", value),
        None => env::remove_var("X"),
    }
    result.unwrap();

    let out = std::fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        canonical(std::path::Path::new(lines[0])),
        canonical(temp_dir.path())
    );
    assert_eq!(lines[1], "inner");
    assert_eq!(env::current_dir().unwrap(), before);
}
