// SPDX-License-Identifier: MIT

use super::*;
use serde_json::json;
use tether_core::{LogEntry, LogKind};

#[test]
fn status_response_uses_lowercase_names() {
    let json = serde_json::to_value(&Response::Status { status: ProcessStatus::Running }).unwrap();
    assert_eq!(json, json!({"type": "Status", "status": "running"}));
}

#[test]
fn log_entries_carry_timestamp_kind_and_content() {
    let response = Response::Logs {
        entries: vec![LogEntry::new(1234, LogKind::Stdout, "chunk")],
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json,
        json!({
            "type": "Logs",
            "entries": [{"at_ms": 1234, "kind": "stdout", "content": "chunk"}]
        })
    );
}

#[test]
fn error_response_roundtrips() {
    let response = Response::Error { message: "unknown key: f13".to_string() };
    let json = serde_json::to_string(&response).unwrap();
    let back: Response = serde_json::from_str(&json).unwrap();
    assert_eq!(back, response);
}
