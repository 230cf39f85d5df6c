// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

#[test]
fn launch_and_retry_ids_follow_name_and_time() {
    assert_eq!(JobId::for_launch("mq-935", 1_700_000_000), "mq-935-1700000000");
    assert_eq!(JobId::for_retry("mq-935", 1_700_000_000), "mq-935-retry-1700000000");
}

#[test]
fn suffix_disambiguates() {
    let id = JobId::for_launch("nav", 42);
    assert_eq!(id.with_suffix(2).as_str(), "nav-42-2");
    assert_ne!(id.with_suffix(2), id);
}

#[test]
fn serde_is_transparent() {
    let id = JobId::from_string("job-1");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"job-1\"");
    let parsed: JobId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn borrow_allows_str_lookup() {
    let mut map = HashMap::new();
    map.insert(JobId::from("abc"), 1);
    assert_eq!(map.get("abc"), Some(&1));
}
