#![warn(clippy::uninlined_format_args)]

mod bootstrap;

use bootstrap::AppConfig;
use clap::{Parser, ValueEnum};
use std::{borrow::Cow, fs, path::PathBuf, process};
use tripsplit_application::SettlementService;
use tripsplit_domain::{CustomSplitPolicy, UnknownMemberPolicy};
use tripsplit_infrastructure::JsonTravelParser;
use tripsplit_presentation::{SettlementPresenter, format_processing_error};

type CliResult<T> = Result<T, Cow<'static, str>>;

/// Settles a group travel: who owes whom, in as few transfers as practical
#[derive(Parser)]
#[command(name = "tripsplit", version)]
struct Cli {
    /// Travel document (JSON)
    travel: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Payers or participants missing from `members`: reject or register
    #[arg(long)]
    unknown_members: Option<UnknownMemberPolicy>,

    /// Custom split amounts: strict (must total the expense) or lenient
    #[arg(long)]
    custom_splits: Option<CustomSplitPolicy>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = AppConfig::from_env()?.with_overrides(cli.unknown_members, cli.custom_splits);
    bootstrap::init_logging(&config.log_filter);
    tracing::debug!(?config, "Loaded configuration");

    let content = fs::read_to_string(&cli.travel)
        .map_err(|err| format!("Failed to read '{}': {err}", cli.travel.display()))?;

    let parser = JsonTravelParser;
    let service = SettlementService::new(&parser, config.settlement_options());
    let result = service
        .process(&content)
        .map_err(|err| format_processing_error(&err))?;

    match cli.format {
        OutputFormat::Text => print!("{}", SettlementPresenter::render(&result).to_text()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|err| format!("Failed to serialise result: {err}"))?;
            println!("{json}");
        }
    }
    Ok(())
}
