use crate::app::command_support::parse_options;
use crate::document::read_document;
use crate::integrity::verify_round_trip;
use std::fs;
use std::path::Path;

/// Offline round-trip check of a segmented document against its transcript.
pub fn cmd_verify(args: &[String]) -> Result<String, String> {
    let options = parse_options(args)?;
    let [document_path, transcript_path] = options.positional.as_slice() else {
        return Err("usage: verify <document.json> <transcript.txt>".to_string());
    };

    let document = read_document(Path::new(document_path)).map_err(|e| e.to_string())?;
    let transcript = fs::read_to_string(transcript_path)
        .map_err(|e| format!("failed to read {transcript_path}: {e}"))?;

    let texts: Vec<&str> = document
        .segments()
        .iter()
        .map(|segment| segment.text.as_str())
        .collect();
    let fingerprint = verify_round_trip(&transcript, &texts).map_err(|e| e.to_string())?;

    Ok(format!(
        "verified statements={} fingerprint={fingerprint}",
        texts.len()
    ))
}
