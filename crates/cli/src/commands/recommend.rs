use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use nitido_agent::{client_from_config, LlmRecommendationSource};
use nitido_core::config::{AppConfig, LoadOptions};
use nitido_core::domain::event::EventParameters;

use crate::commands::budget::{run_session, BudgetEdits, PricingFlags};
use crate::commands::{CommandResult, EXIT_CONFIG};

const COMMAND: &str = "recommend";

#[derive(Clone, Debug, Default, Args)]
pub struct RecommendArgs {
    #[arg(long, value_name = "JSON_FILE", help = "Event parameters as JSON; defaults are used when omitted")]
    pub params: Option<PathBuf>,
    #[command(flatten)]
    pub pricing: PricingFlags,
}

pub fn run(args: &RecommendArgs) -> CommandResult {
    run_with_options(args, LoadOptions::default())
}

pub fn run_with_options(args: &RecommendArgs, options: LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "config_validation", error.to_string(), EXIT_CONFIG);
        }
    };

    let params = match args.params.as_deref().map(read_params).transpose() {
        Ok(params) => params.unwrap_or_default(),
        Err(message) => return CommandResult::failure(COMMAND, "invalid_input", message, EXIT_CONFIG),
    };

    let client = match client_from_config(&config.llm) {
        Ok(client) => client,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                format!("{error:#}"),
                EXIT_CONFIG,
            );
        }
    };
    let source = LlmRecommendationSource::from_config(Arc::from(client), &config.llm);

    run_session(
        COMMAND,
        &params,
        &source,
        &BudgetEdits::from_flags(&args.pricing),
        &config.messaging,
        args.pricing.json,
    )
}

fn read_params(path: &Path) -> Result<EventParameters, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("could not read `{}`: {error}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|error| format!("could not parse event parameters `{}`: {error}", path.display()))
}
