//! JSON-lines bridge driven from an in-memory input.

mod common;

use std::sync::Arc;

use codescribe::SlotId;
use codescribe::bridge::Bridge;
use common::{CountingGenerator, FixedDiffs, RecordingClipboard, SharedBuf};

fn input(lines: &[String]) -> Vec<u8> {
    let mut bytes = lines.join("\n").into_bytes();
    bytes.push(b'\n');
    bytes
}

#[tokio::test]
async fn test_session_renders_generates_and_copies() {
    let out = SharedBuf::default();
    let clipboard = RecordingClipboard::default();
    let bridge = Bridge::new(
        Arc::new(FixedDiffs::with_diff("diff --git a/x.js b/x.js")),
        Arc::new(CountingGenerator::default()),
        Box::new(clipboard.clone()),
        None,
        out.clone(),
    )
    .unwrap();

    let lines = vec![
        r#"{"command": "generateCommitMessage"}"#.to_string(),
        serde_json::json!({"command": "copy", "text": SlotId::Commit.placeholder()}).to_string(),
        "this is not json".to_string(),
        String::new(),
        r#"{"command": "repoEvent", "event": "stateChanged"}"#.to_string(),
    ];
    let bytes = input(&lines);
    bridge.run(bytes.as_slice()).await.unwrap();

    let events = out.events();
    assert_eq!(events[0]["type"], "render");
    assert!(events[0]["html"].as_str().unwrap().contains("<!DOCTYPE html>"));
    assert_eq!(events[0]["state"]["commit"]["isPlaceholder"], true);

    let staged = events
        .iter()
        .find(|e| e["type"] == "stagedChanges")
        .unwrap();
    assert_eq!(staged["nodes"][0]["kind"], "file");
    assert_eq!(staged["nodes"][0]["path"], "x.js");

    let warning = events
        .iter()
        .find(|e| e["type"] == "notice")
        .unwrap();
    assert_eq!(warning["level"], "warning");
    assert_eq!(warning["message"], "Nothing to copy yet.");
    assert!(clipboard.writes.lock().unwrap().is_empty());

    let last_render = events
        .iter()
        .rev()
        .find(|e| e["type"] == "render")
        .unwrap();
    let commit = &last_render["state"]["commit"];
    assert_eq!(commit["isLoading"], false);
    assert!(
        commit["content"]
            .as_str()
            .unwrap()
            .starts_with("generated from")
    );
}

#[tokio::test]
async fn test_generation_error_notice_over_the_wire() {
    let out = SharedBuf::default();
    let bridge = Bridge::new(
        Arc::new(FixedDiffs::empty()),
        Arc::new(CountingGenerator::default()),
        Box::new(RecordingClipboard::default()),
        None,
        out.clone(),
    )
    .unwrap();

    let lines = vec![
        r#"{"command": "generatePrDescription"}"#.to_string(),
        r#"{"command": "generateIssueName", "text": "   "}"#.to_string(),
    ];
    let bytes = input(&lines);
    bridge.run(bytes.as_slice()).await.unwrap();

    let notices: Vec<(String, String)> = out
        .events()
        .iter()
        .filter(|e| e["type"] == "notice")
        .map(|e| {
            (
                e["level"].as_str().unwrap().to_string(),
                e["message"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        notices,
        vec![
            (
                "info".to_string(),
                "No staged changes found or not a Git repository.".to_string()
            ),
            (
                "warning".to_string(),
                "Please describe the issue you want to name.".to_string()
            ),
        ]
    );

    let renders = out
        .events()
        .iter()
        .filter(|e| e["type"] == "render")
        .count();
    assert_eq!(renders, 1);
}
