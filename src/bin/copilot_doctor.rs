use clap::Parser;
use health_copilot::core::doctor;
use health_copilot::utils::logger;

#[derive(Parser)]
#[command(name = "copilot-doctor")]
#[command(about = "Check API key, model directory, training data and API connectivity")]
struct Args {
    /// Path to TOML configuration file (default: ./copilot.toml when present)
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let report = doctor::run_checks(args.config.as_deref()).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }

    if !report.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
