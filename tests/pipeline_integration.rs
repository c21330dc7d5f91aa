//! Integration tests for full pipeline runs
//!
//! Tests the path: directory tree → sources → records → augmentation → JSONL

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use persona_corpus::core::{write_jsonl, Pipeline};
use persona_corpus::types::{
    CorpusError, DropReason, ExtractionMode, PipelineConfig, Stage, StageMode,
};

fn write_conversation(dir: &Path, name: &str, messages: &[(&str, &str)]) {
    fs::create_dir_all(dir).unwrap();
    let messages: Vec<serde_json::Value> = messages
        .iter()
        .enumerate()
        .map(|(i, (sender, content))| {
            serde_json::json!({
                "sender_name": sender,
                "content": content,
                "timestamp_ms": 1_700_000_000_000i64 + i as i64 * 1000,
            })
        })
        .collect();
    let body = serde_json::json!({ "participants": [], "messages": messages });
    fs::write(dir.join(name), body.to_string()).unwrap();
}

fn sample_tree(root: &Path) {
    write_conversation(
        &root.join("inbox/sam_1"),
        "message_1.json",
        &[
            ("Sam", "Hey there"),
            ("Luke Davis", "gm bro, how's it going"),
            ("Sam", "good"),
            ("Luke Davis", "What's your portfolio size?"),
        ],
    );
    write_conversation(
        &root.join("inbox/kim_2"),
        "message_1.json",
        &[("Kim", "yo"), ("Luke Davis", "Where are you based?")],
    );
}

#[test]
fn test_full_run_pairs_mode() {
    let tmp = tempfile::tempdir().unwrap();
    sample_tree(tmp.path());

    let mut pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let output = pipeline.run(tmp.path()).unwrap();

    assert_eq!(output.summary.files_found, 2);
    assert_eq!(output.summary.files_skipped, 0);
    assert_eq!(output.summary.conversations, 2);
    assert_eq!(output.records.len(), 3);

    // kim_2 sorts before sam_1
    let stages: Vec<_> = output.records.iter().map(|r| r.stage()).collect();
    assert_eq!(
        stages,
        vec![
            Some(Stage::RapportBuilding),
            Some(Stage::RapportBuilding),
            Some(Stage::AnsweringQ3),
        ]
    );
}

#[test]
fn test_malformed_file_skipped_run_continues() {
    let tmp = tempfile::tempdir().unwrap();
    sample_tree(tmp.path());
    let bad = tmp.path().join("inbox/broken");
    fs::create_dir_all(&bad).unwrap();
    fs::write(bad.join("message_1.json"), "{\"messages\": [").unwrap();
    fs::write(bad.join("message_2.json"), "{\"threads\": []}").unwrap();

    let mut pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let output = pipeline.run(tmp.path()).unwrap();

    assert_eq!(output.summary.files_found, 4);
    assert_eq!(output.summary.files_skipped, 2);
    assert_eq!(output.summary.dropped.count(DropReason::D004_SOURCE_SKIPPED), 2);
    assert_eq!(output.records.len(), 3);
}

#[test]
fn test_unreadable_root_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let mut pipeline = Pipeline::new(PipelineConfig::default()).unwrap();

    let err = pipeline.run(&tmp.path().join("missing")).unwrap_err();
    assert!(matches!(err, CorpusError::RootUnreadable { .. }));
}

#[test]
fn test_augmentation_appends_after_originals() {
    let tmp = tempfile::tempdir().unwrap();
    sample_tree(tmp.path());

    let config = PipelineConfig { augment: true, ..Default::default() };
    let mut pipeline = Pipeline::new(config).unwrap();
    let output = pipeline.run(tmp.path()).unwrap();

    // "gm bro, ..." is already styled; the other two get one variant each
    assert_eq!(output.summary.records, 3);
    assert_eq!(output.summary.augmented, 2);
    assert_eq!(output.records.len(), 5);

    let originals = &output.records[..3];
    let variants = &output.records[3..];
    assert_eq!(variants[0].prompt(), originals[0].prompt());
    assert_eq!(variants[0].stage(), originals[0].stage());
    assert_ne!(variants[0].response(), originals[0].response());
}

#[test]
fn test_lines_mode_run() {
    let tmp = tempfile::tempdir().unwrap();
    sample_tree(tmp.path());
    write_conversation(
        &tmp.path().join("inbox/zed_3"),
        "message_1.json",
        &[("Zed", "hi"), ("Luke Davis", "Where are you based?")],
    );

    let config = PipelineConfig { mode: ExtractionMode::Lines, ..Default::default() };
    let mut pipeline = Pipeline::new(config).unwrap();
    let output = pipeline.run(tmp.path()).unwrap();

    let responses: Vec<_> = output.records.iter().map(|r| r.response()).collect();
    assert_eq!(
        responses,
        vec!["Where are you based?", "gm bro, how's it going", "What's your portfolio size?"]
    );
    assert_eq!(output.summary.dropped.count(DropReason::D003_DUPLICATE), 1);
}

#[test]
fn test_jsonl_output_shape() {
    let tmp = tempfile::tempdir().unwrap();
    sample_tree(tmp.path());

    let config = PipelineConfig {
        stage_mode: StageMode::Pattern,
        include_metadata: true,
        ..Default::default()
    };
    let mut pipeline = Pipeline::new(config).unwrap();
    let output = pipeline.run(tmp.path()).unwrap();

    let mut buf = Vec::new();
    let written = write_jsonl(&output.records, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();

    assert_eq!(written, 3);
    assert_eq!(first["messages"][0]["role"], "system");
    assert_eq!(
        first["messages"][0]["content"],
        "You are Luke Davis, responding in your own conversational style."
    );
    assert_eq!(first["messages"][1]["role"], "user");
    assert_eq!(first["messages"][1]["content"], "yo");
    assert_eq!(first["messages"][2]["role"], "assistant");
    assert_eq!(first["metadata"]["stage"], "rapport_building");
    assert_eq!(first["metadata"]["source"], "message_1.json");
    assert!(first["metadata"]["responded_at"].is_string());
}

#[test]
fn test_custom_speaker() {
    let tmp = tempfile::tempdir().unwrap();
    write_conversation(
        tmp.path(),
        "message_1.json",
        &[("Luke Davis", "hey"), ("Sam", "what's up")],
    );

    let mut pipeline = Pipeline::new(PipelineConfig::for_speaker("Sam")).unwrap();
    let output = pipeline.run(tmp.path()).unwrap();

    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].prompt(), Some("hey"));
    assert_eq!(
        output.records[0].segments()[0].content,
        "You are Sam, responding in your own conversational style."
    );
}
