// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mj_core::{JobId, JobRecord};
use std::time::{Duration, Instant};
use yare::parameterized;

const VANISHED_PID: u32 = i32::MAX as u32;

#[parameterized(
    simple = { "123 (bash) S 77 123 123 0 -1", Some(77) },
    spaces_in_name = { "9 (oc image mirror) R 4 9 9", Some(4) },
    parens_in_name = { "9 (weird) name)) S 31 9 9", Some(31) },
    truncated = { "9 (bash) S", None },
    garbage = { "no parens here", None },
)]
fn parent_pid_cases(stat: &str, expected: Option<u32>) {
    assert_eq!(parent_pid(stat), expected);
}

fn fake_proc(entries: &[(u32, &str, &str)]) -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    for (pid, stat, cmdline) in entries {
        let dir = root.path().join(pid.to_string());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("stat"), stat).unwrap();
        std::fs::write(dir.join("cmdline"), cmdline.replace(' ', "\0")).unwrap();
    }
    std::fs::create_dir_all(root.path().join("self")).unwrap();
    root
}

#[test]
fn child_pids_falls_back_to_stat_scan() {
    let root = fake_proc(&[
        (10, "10 (bash) S 1 10 10", "bash mirror.sh"),
        (11, "11 (oc) S 10 10 10", "oc image mirror"),
        (12, "12 (sleep) S 10 10 10", "sleep 5"),
        (13, "13 (other) S 99 13 13", "other"),
    ]);
    let mut children = child_pids(root.path(), 10);
    children.sort_unstable();
    assert_eq!(children, vec![11, 12]);
}

#[test]
fn child_pids_prefers_children_file() {
    let root = fake_proc(&[(10, "10 (bash) S 1 10 10", "bash")]);
    let task = root.path().join("10/task/10");
    std::fs::create_dir_all(&task).unwrap();
    std::fs::write(task.join("children"), "21 22 ").unwrap();
    assert_eq!(child_pids(root.path(), 10), vec![21, 22]);
}

#[test]
fn stray_pids_need_signature_before_name() {
    let root = fake_proc(&[
        (30, "30 (oc) S 1 30 30", "oc image mirror --from=a --to=file://mq/images"),
        (31, "31 (oc) S 1 31 31", "oc image mirror --to=file://nav"),
        (32, "32 (vi) S 1 32 32", "vi mq oc image mirror"),
    ]);
    assert_eq!(stray_pids(root.path(), "oc image mirror", "mq"), vec![30]);
    assert!(stray_pids(root.path(), "", "mq").is_empty());
}

#[test]
fn stray_pids_match_whole_names_only() {
    let root = fake_proc(&[
        (40, "40 (oc) S 1 40 40", "oc image mirror --to=file://mq-prod/images"),
        (41, "41 (oc) S 1 41 41", "oc image mirror --dir mqx"),
        (42, "42 (oc) S 1 42 42", "oc image mirror --dir=mq"),
        (43, "43 (oc) S 1 43 43", "oc image mirror --from=a mq"),
    ]);
    let mut matched = stray_pids(root.path(), "oc image mirror", "mq");
    matched.sort_unstable();
    assert_eq!(matched, vec![42, 43]);
    assert_eq!(stray_pids(root.path(), "oc image mirror", "mq-prod"), vec![40]);
}

#[test]
fn vanished_pid_is_not_found() {
    assert_eq!(send_signal(VANISHED_PID, Signal::SIGKILL), Ok(false));
}

#[test]
fn protected_pids_are_never_signalled() {
    assert_eq!(send_signal(0, Signal::SIGTERM), Ok(false));
    assert_eq!(send_signal(1, Signal::SIGTERM), Ok(false));
    assert_eq!(send_signal(std::process::id(), Signal::SIGTERM), Ok(false));
}

#[test]
fn kill_job_tree_on_vanished_processes() {
    let record = JobRecord::builder()
        .id(JobId::from("gone-1"))
        .main_pid(VANISHED_PID)
        .mirror_pid(VANISHED_PID - 1)
        .build();
    let attempts = kill_job_tree(&record, "mj-test-signature-that-never-matches");
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].target, KillTarget::Mirror);
    assert_eq!(attempts[1].target, KillTarget::Main);
    assert!(attempts.iter().all(|a| a.result == KillResult::NotFound));
}

#[test]
fn kill_job_tree_kills_main_and_children() {
    let mut main = std::process::Command::new("sh")
        .arg("-c")
        .arg("sleep 30 & sleep 30 & wait")
        .spawn()
        .unwrap();
    let main_pid = main.id();

    let deadline = Instant::now() + Duration::from_secs(10);
    while child_pids(Path::new("/proc"), main_pid).len() < 2 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }

    let record = JobRecord::builder().main_pid(main_pid).build();
    let attempts = kill_job_tree(&record, "mj-test-signature-that-never-matches");

    let killed_children = attempts
        .iter()
        .filter(|a| a.target == KillTarget::Child && a.result == KillResult::Killed)
        .count();
    assert_eq!(killed_children, 2);
    assert!(attempts
        .iter()
        .any(|a| a.target == KillTarget::Main && a.result == KillResult::Killed));

    main.wait().unwrap();
}
