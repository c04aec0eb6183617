// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn token() -> CancellationToken {
    CancellationToken::new()
}

#[tokio::test]
async fn captures_stdout_and_exit_code() {
    let out = ShellRunner::new()
        .run("echo hello", None, &token())
        .await
        .unwrap();
    assert_eq!(out.exit_code, 0);
    assert_eq!(out.raw_stdout, "hello\n");
    assert_eq!(out.normalized_stdout, "hello");
}

#[tokio::test]
async fn non_zero_exit_is_reported_not_an_error() {
    let out = ShellRunner::new()
        .run("echo oops >&2; exit 3", None, &token())
        .await
        .unwrap();
    assert_eq!(out.exit_code, 3);
    assert_eq!(out.raw_stderr, "oops\n");
}

#[tokio::test]
async fn runs_in_the_given_workdir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
    let out = ShellRunner::new()
        .run("ls", Some(dir.path()), &token())
        .await
        .unwrap();
    assert!(out.normalized_stdout.contains("marker.txt"));
}

#[tokio::test]
async fn missing_workdir_is_a_spawn_error() {
    let err = ShellRunner::new()
        .run("echo hi", Some(Path::new("/definitely/not/a/dir")), &token())
        .await;
    assert!(matches!(err, Err(ShellError::Spawn { .. })));
}

#[tokio::test]
async fn cancellation_interrupts_the_command() {
    let cancel = token();
    cancel.cancel();
    let err = ShellRunner::new().run("sleep 30", None, &cancel).await;
    assert!(matches!(err, Err(ShellError::Cancelled { .. })));
}

#[test]
fn normalize_strips_ansi_and_folds_crlf() {
    let raw = "\x1b[32mgreen\x1b[0m line\r\nnext\r\n";
    assert_eq!(normalize(raw), "green line\nnext");
}

#[test]
fn normalize_trims_outer_whitespace() {
    assert_eq!(normalize("  padded \n\n"), "padded");
}

#[test]
fn combined_output_is_stdout_then_stderr() {
    let out = ShellOutput {
        raw_stdout: "out\n".into(),
        raw_stderr: "err\n".into(),
        ..Default::default()
    };
    assert_eq!(out.combined_output(), "out\nerr\n");
}
