use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod pipeline;
pub mod verify;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Segment => pipeline::cmd_segment(&args[1..]),
        CliVerb::Classify => pipeline::cmd_classify(&args[1..]),
        CliVerb::Run => pipeline::cmd_run(&args[1..]),
        CliVerb::Verify => verify::cmd_verify(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
