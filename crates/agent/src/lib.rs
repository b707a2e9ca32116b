//! LLM-backed recommendation source.
//!
//! The model is strictly an advisor: it proposes equipment quantities and
//! explanations. Prices, tiers and totals are deterministic decisions made
//! by `nitido-core`.

pub mod llm;
pub mod prompt;
pub mod source;

pub use llm::{client_from_config, CompletionRequest, GeminiClient, LlmClient, OllamaClient};
pub use source::LlmRecommendationSource;
