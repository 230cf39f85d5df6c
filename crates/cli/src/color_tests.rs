// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn force_color() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");
}

fn disable_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn styles_returns_plain_when_no_color() {
    disable_color();
    let debug = format!("{:?}", styles());
    assert_eq!(debug, format!("{:?}", Styles::plain()));
}

#[test]
#[serial]
fn styles_returns_styled_when_color_forced() {
    force_color();
    let debug = format!("{:?}", styles());
    assert_ne!(debug, format!("{:?}", Styles::plain()));
}

#[test]
#[serial]
fn header_produces_ansi_when_color_forced() {
    force_color();
    let result = header("DOWNLOAD");
    assert!(result.starts_with("\x1b[38;5;74m"));
    assert!(result.ends_with(RESET));
}

#[test]
#[serial]
fn status_colors_follow_outcome() {
    force_color();
    assert!(status(JobStatus::Completed).contains("\x1b[38;5;108m"));
    assert!(status(JobStatus::Failed).contains("\x1b[38;5;167m"));
    assert!(status(JobStatus::Dismissed).contains("\x1b[38;5;167m"));
    assert!(status(JobStatus::Progressing).contains("progressing"));
}

#[test]
#[serial]
fn no_color_leaves_text_untouched() {
    disable_color();
    assert_eq!(context("pid 42"), "pid 42");
    assert_eq!(status(JobStatus::Stopped), "stopped");
}
