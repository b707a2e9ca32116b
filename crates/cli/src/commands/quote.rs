use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clap::Args;
use nitido_core::config::{AppConfig, LoadOptions};
use nitido_core::domain::event::EventParameters;
use nitido_core::domain::recommendation::{Recommendation, RecommendationSource};
use nitido_core::errors::RecommendationError;

use crate::commands::budget::{run_session, BudgetEdits, PricingFlags, QuantityEdit};
use crate::commands::{CommandResult, EXIT_CONFIG, EXIT_RECOMMENDATION};

const COMMAND: &str = "quote";

/// Prices a previously saved recommendation without calling the LLM.
#[derive(Clone, Debug, Default, Args)]
pub struct QuoteArgs {
    #[arg(long, value_name = "JSON_FILE", help = "Recommendation JSON as returned by the model")]
    pub recommendation: PathBuf,
    #[arg(long = "toggle", value_name = "INDEX", help = "Flip the selection of a line item")]
    pub toggles: Vec<usize>,
    #[arg(long = "quantity", value_name = "INDEX=QUANTITY", help = "Set the quantity of an adjustable line item")]
    pub quantities: Vec<QuantityEdit>,
    #[command(flatten)]
    pub pricing: PricingFlags,
}

struct SavedRecommendation(Recommendation);

#[async_trait]
impl RecommendationSource for SavedRecommendation {
    async fn recommend(
        &self,
        _params: &EventParameters,
    ) -> Result<Recommendation, RecommendationError> {
        Ok(self.0.clone())
    }
}

pub fn run(args: &QuoteArgs) -> CommandResult {
    run_with_options(args, LoadOptions::default())
}

pub fn run_with_options(args: &QuoteArgs, options: LoadOptions) -> CommandResult {
    let options = LoadOptions { skip_llm_credentials: true, ..options };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "config_validation", error.to_string(), EXIT_CONFIG);
        }
    };

    let recommendation = match read_recommendation(&args.recommendation) {
        Ok(recommendation) => recommendation,
        Err(error) => {
            return CommandResult::failure(COMMAND, error.class(), error.to_string(), EXIT_RECOMMENDATION);
        }
    };

    let edits = BudgetEdits {
        toggles: args.toggles.clone(),
        quantities: args.quantities.clone(),
        ..BudgetEdits::from_flags(&args.pricing)
    };

    run_session(
        COMMAND,
        &EventParameters::default(),
        &SavedRecommendation(recommendation),
        &edits,
        &config.messaging,
        args.pricing.json,
    )
}

fn read_recommendation(path: &Path) -> Result<Recommendation, RecommendationError> {
    let raw = fs::read_to_string(path).map_err(|error| {
        RecommendationError::Fetch(format!("could not read `{}`: {error}", path.display()))
    })?;
    Recommendation::from_response_text(&raw)
}
