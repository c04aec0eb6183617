// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn output(name: &str, probe: &str) -> CommandOutput {
    CommandOutput::new(name, probe).unwrap()
}

#[test]
fn extracts_a_named_capture() {
    let vars = extract_vars(
        "deployed\nurl: myapp.example.com\ndone",
        &[output("url", r"url:\s*(\S+)")],
    )
    .unwrap();
    assert_eq!(vars.get("url").unwrap().value(), "myapp.example.com");
    assert!(!vars.get("url").unwrap().is_shared());
}

#[test]
fn extracts_multiple_outputs() {
    let stdout = "id: 42\nstate: ready";
    let vars = extract_vars(
        stdout,
        &[output("id", r"id:\s*(\d+)"), output("state", r"state:\s*(\w+)")],
    )
    .unwrap();
    assert_eq!(vars.len(), 2);
    assert_eq!(vars.get("id").unwrap().value(), "42");
    assert_eq!(vars.get("state").unwrap().value(), "ready");
}

#[test]
fn probe_only_outputs_extract_nothing() {
    let vars = extract_vars("Apply complete", &[output("", "Apply complete")]).unwrap();
    assert!(vars.is_empty());
}

#[test]
fn probe_only_outputs_do_not_require_a_match_here() {
    // the command executor enforces probe matches; the extractor does not
    let vars = extract_vars("unrelated output", &[output("", "never matches")]).unwrap();
    assert!(vars.is_empty());
}

#[test]
fn named_output_without_a_match_fails() {
    let err = extract_vars("no url here", &[output("url", r"url:\s*(\S+)")]).unwrap_err();
    assert!(matches!(err, ExtractError::NotFound { .. }));
}

#[test]
fn named_output_without_a_capture_group_fails() {
    let err = extract_vars("url: x", &[output("url", "url")]).unwrap_err();
    assert!(matches!(err, ExtractError::NotFound { .. }));
}

#[test]
fn empty_capture_fails() {
    let err = extract_vars("url: |", &[output("url", r"url: (\S*)\|")]).unwrap_err();
    assert!(matches!(err, ExtractError::EmptyCapture { .. }));
}

#[test]
fn invalid_regex_fails() {
    let err = extract_vars("whatever", &[output("x", "([unclosed")]).unwrap_err();
    assert!(matches!(err, ExtractError::InvalidProbe { .. }));
}
