// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use yare::parameterized;

#[test]
#[serial]
fn no_color_wins_over_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::set_var("COLOR", "1");
    assert!(!should_colorize());
    assert_eq!(format!("{:?}", styles()), format!("{:?}", Styles::plain()));
    std::env::remove_var("NO_COLOR");
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn color_forces_styles() {
    std::env::remove_var("NO_COLOR");
    std::env::set_var("COLOR", "1");
    assert!(should_colorize());
    assert_ne!(format!("{:?}", styles()), format!("{:?}", Styles::plain()));
    std::env::remove_var("COLOR");
}

#[test]
fn disabled_painter_is_plain() {
    let painter = Painter::new(false);
    assert_eq!(painter.header("== prod:web1 =="), "== prod:web1 ==");
    assert_eq!(painter.status(CommandStatus::Failed), "failed");
}

#[parameterized(
    completed = { CommandStatus::Completed, codes::OK },
    failed = { CommandStatus::Failed, codes::ERROR },
    cancelled = { CommandStatus::Cancelled, codes::WARN },
    running = { CommandStatus::Running, codes::WARN },
)]
fn status_colors(status: CommandStatus, code: u8) {
    assert_eq!(
        Painter::new(true).status(status),
        format!("\x1b[38;5;{code}m{status}\x1b[0m")
    );
}
