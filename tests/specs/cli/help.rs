//! CLI help and version behavior

use crate::prelude::*;

#[test]
fn zero_args_shows_help_and_succeeds() {
    let fixture = fixture().build();
    let out = fixture.vex(&[]);
    assert_success(&out);
    assert!(stdout(&out).contains("Usage"), "{}", stdout(&out));
    assert!(stdout(&out).contains("vex"));
}

#[test]
fn help_flag_documents_the_arguments() {
    let fixture = fixture().build();
    let out = fixture.vex(&["--help"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("--color"));
    assert!(text.contains("--cache-ttl"));
    assert!(text.contains("ENVIRONMENT") || text.contains("environment"));
}

#[test]
fn version_flag_prints_the_version() {
    let fixture = fixture().build();
    let out = fixture.vex(&["--version"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("vex"));
}

#[test]
fn unknown_flags_fail_with_exit_code_one() {
    let fixture = fixture().build();
    let out = fixture.vex(&["--definitely-not-a-flag"]);
    assert_eq!(out.status.code(), Some(1));
}
