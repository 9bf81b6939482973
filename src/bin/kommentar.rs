use kommentar::app::command_handlers;

fn output_header() -> &'static str {
    "kommentar\nVerified segmentation and team labeling of football commentary transcripts."
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        println!("{}\n", output_header());
    }
    let output = command_handlers::run_cli(args)?;
    println!("{output}");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
