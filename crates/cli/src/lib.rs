pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use nitido_core::config::{AppConfig, LoadOptions};
use std::process::ExitCode;

use commands::quote::QuoteArgs;
use commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "nitido",
    about = "Sound equipment rental advisor",
    long_about = "Ask the LLM advisor for a sound system, price it in three tiers and compose the WhatsApp order.",
    after_help = "Examples:\n  nitido recommend --params event.json --code nitidobro\n  nitido quote --recommendation rec.json --toggle 4 --quantity 0=3 --json\n  nitido config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Request a recommendation for an event and price the resulting budget")]
    Recommend(RecommendArgs),
    #[command(about = "Price and edit a saved recommendation without calling the LLM")]
    Quote(QuoteArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let logging_options = LoadOptions { skip_llm_credentials: true, ..LoadOptions::default() };
    if let Ok(config) = AppConfig::load(logging_options) {
        logging::init_logging(&config);
    }

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(&args),
        Command::Quote(args) => commands::quote::run(&args),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
