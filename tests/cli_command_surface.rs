use kommentar::app::command_handlers::run_cli;
use kommentar::document::{write_document, Document, MatchRow, Segment};
use std::fs;
use tempfile::tempdir;

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|arg| arg.to_string()).collect()
}

fn seed_document(path: &std::path::Path, texts: &[&str]) {
    let row: MatchRow = serde_json::from_value(serde_json::json!({
        "Saison": "23/24", "Spieltag": 1, "Gegner": "Werder Bremen"
    }))
    .expect("row");
    let segments = texts
        .iter()
        .enumerate()
        .map(|(index, text)| Segment::new(index as u32, *text))
        .collect();
    write_document(path, &Document::from_row(&row, segments)).expect("write");
}

#[test]
fn help_lists_every_command() {
    let help = run_cli(args(&["help"])).expect("help");
    for command in ["segment", "classify", "run", "verify"] {
        assert!(help.contains(command), "missing {command}");
    }
    assert_eq!(run_cli(Vec::new()).expect("bare"), help);
}

#[test]
fn unknown_command_is_rejected() {
    assert_eq!(
        run_cli(args(&["segmentieren"])).expect_err("unknown"),
        "unknown command `segmentieren`"
    );
}

#[test]
fn verify_accepts_a_faithful_split() {
    let dir = tempdir().expect("tempdir");
    let document = dir.path().join("doc.json");
    let transcript = dir.path().join("transcript.txt");
    fs::write(
        &transcript,
        "Sané traf zum 1:0 für Bayern. Ein sehenswerter Abschluss.",
    )
    .expect("write");
    seed_document(
        &document,
        &["Sané traf zum 1:0 für Bayern.", "Ein sehenswerter Abschluss."],
    );

    let output = run_cli(args(&[
        "verify",
        document.to_str().expect("utf8"),
        transcript.to_str().expect("utf8"),
    ]))
    .expect("verified");
    assert!(output.starts_with("verified statements=2 fingerprint="));
}

#[test]
fn verify_reports_lost_content() {
    let dir = tempdir().expect("tempdir");
    let document = dir.path().join("doc.json");
    let transcript = dir.path().join("transcript.txt");
    fs::write(&transcript, "Ein Tor.").expect("write");
    seed_document(&document, &["Ein To."]);

    let err = run_cli(args(&[
        "verify",
        document.to_str().expect("utf8"),
        transcript.to_str().expect("utf8"),
    ]))
    .expect_err("mismatch");
    assert!(err.contains("content lost"), "{err}");
}

#[test]
fn verify_requires_two_paths() {
    assert_eq!(
        run_cli(args(&["verify", "only.json"])).expect_err("usage"),
        "usage: verify <document.json> <transcript.txt>"
    );
}

#[test]
fn pipeline_commands_need_an_api_key() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("kommentar.yaml");
    fs::write(
        &config,
        "oracle:\n  api_key_env: KOMMENTAR_CLI_TEST_KEY_NEVER_SET\n",
    )
    .expect("write");

    let err = run_cli(args(&[
        "segment",
        "--quiet",
        "--config",
        config.to_str().expect("utf8"),
    ]))
    .expect_err("no key");
    assert!(err.contains("KOMMENTAR_CLI_TEST_KEY_NEVER_SET"), "{err}");
}

#[test]
fn invalid_settings_are_reported_before_any_work() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("kommentar.yaml");
    fs::write(&config, "segmentation:\n  max_attempts: 0\n").expect("write");

    let err = run_cli(args(&["run", "--config", config.to_str().expect("utf8")]))
        .expect_err("invalid");
    assert!(err.contains("segmentation.max_attempts"), "{err}");
}

#[test]
fn segment_honors_prefix_filter() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    fs::write(
        root.join("spiele.json"),
        r#"[{"Saison": "23/24", "Spieltag": 1, "Gegner": "Werder Bremen", "Transkript": "Anpfiff."}]"#,
    )
    .expect("rows");
    let config = root.join("kommentar.yaml");
    fs::write(
        &config,
        format!(
            "oracle:\n  endpoint: http://127.0.0.1:9/v1/chat/completions\n  api_key_env: KOMMENTAR_CLI_PREFIX_TEST_KEY\n\
             segmentation:\n  max_attempts: 1\n  backoff_base_ms: 0\n\
             paths:\n  rows: {rows}\n  segmented_dir: {segmented}\n  labeled_dir: {labeled}\n  log_file: {log}\n",
            rows = root.join("spiele.json").display(),
            segmented = root.join("einzelne_spiele").display(),
            labeled = root.join("mit_zuordnung").display(),
            log = root.join("pipeline.log").display(),
        ),
    )
    .expect("config");
    std::env::set_var("KOMMENTAR_CLI_PREFIX_TEST_KEY", "sk-test");

    let output = run_cli(args(&[
        "segment",
        "--quiet",
        "--config",
        config.to_str().expect("utf8"),
        "--prefix",
        "24-25",
    ]))
    .expect("segment");
    assert_eq!(
        output,
        "segment finished\nwritten=0 skipped_existing=0 failed=0"
    );
    assert!(!root.join("einzelne_spiele").exists());
}
