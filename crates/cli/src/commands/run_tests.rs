// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use clap::Parser;
use yare::parameterized;

use super::{parse_duration, RunArgs};

#[parameterized(
    seconds = { "30s", 30 },
    minutes = { "2m", 120 },
    hours = { "1h", 3600 },
    combined = { "1h30m", 5400 },
    bare = { "45", 45 },
    mixed_tail = { "1m5", 65 },
)]
fn parses_durations(input: &str, secs: u64) {
    assert_eq!(parse_duration(input).unwrap(), Duration::from_secs(secs));
}

#[parameterized(
    empty = { "", "duration must be > 0" },
    zero = { "0s", "duration must be > 0" },
    unit_only = { "s", "invalid duration" },
    bad_unit = { "5d", "unknown duration unit 'd'" },
    overflow = { "99999999999999999999", "invalid duration" },
)]
fn rejects_bad_durations(input: &str, message: &str) {
    let err = parse_duration(input).unwrap_err().to_string();
    assert!(err.contains(message), "{err}");
}

#[derive(Parser)]
struct Harness {
    #[command(flatten)]
    args: RunArgs,
}

#[test]
fn trailing_words_form_the_command() {
    let h = Harness::try_parse_from(["sshq", "-g", "prod", "ls", "-la", "/tmp"]).unwrap();
    assert_eq!(h.args.group.as_deref(), Some("prod"));
    assert_eq!(h.args.command, vec!["ls", "-la", "/tmp"]);
    assert!(!h.args.follow);
}

#[test]
fn hosts_repeat_and_timeout_parses() {
    let h = Harness::try_parse_from([
        "sshq", "-H", "prod:web1", "--host", "prod:web2", "--timeout", "2m", "uptime",
    ])
    .unwrap();
    assert_eq!(h.args.hosts, vec!["prod:web1", "prod:web2"]);
    assert_eq!(h.args.timeout, Some(Duration::from_secs(120)));
}

#[test]
fn command_is_required() {
    assert!(Harness::try_parse_from(["sshq", "-g", "prod"]).is_err());
}

#[test]
fn zero_timeout_is_rejected() {
    assert!(Harness::try_parse_from(["sshq", "-g", "prod", "-t", "0", "true"]).is_err());
}

#[test]
fn background_flag_parses() {
    let h = Harness::try_parse_from(["sshq", "-g", "prod", "-b", "sleep", "60"]).unwrap();
    assert!(h.args.background);
    assert!(!h.args.follow);
    assert_eq!(h.args.command, vec!["sleep", "60"]);
}

#[test]
fn background_and_follow_conflict() {
    let err = Harness::try_parse_from(["sshq", "-g", "prod", "--background", "--follow", "true"])
        .err()
        .unwrap();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}
