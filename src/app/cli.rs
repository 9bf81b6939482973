#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Segment,
    Classify,
    Run,
    Verify,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "segment" => CliVerb::Segment,
        "classify" => CliVerb::Classify,
        "run" => CliVerb::Run,
        "verify" => CliVerb::Verify,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  segment [--config <path>] [--prefix <p>]    Split spreadsheet transcripts into verified statements"
            .to_string(),
        "  classify [--config <path>] [--prefix <p>]   Label segmented documents".to_string(),
        "  run [--config <path>] [--prefix <p>]        Segment and label each document in one pass"
            .to_string(),
        "  verify <document.json> <transcript.txt>     Check a segmented document against its transcript"
            .to_string(),
        "  help                                        Show this help".to_string(),
        String::new(),
        "Flags:".to_string(),
        "  --quiet                                     Do not echo progress events to stderr"
            .to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}
