use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nitido_core::config::LlmConfig;
use nitido_core::domain::event::EventParameters;
use nitido_core::domain::recommendation::{Recommendation, RecommendationSource};
use nitido_core::errors::RecommendationError;
use tracing::{info, warn};

use crate::llm::{CompletionRequest, LlmClient};
use crate::prompt::{recommendation_prompt, recommendation_schema};

pub const DEFAULT_TEMPERATURE: f64 = 0.5;

/// Asks an LLM for a structured equipment recommendation. A single attempt
/// per call, bounded by `timeout`.
pub struct LlmRecommendationSource {
    client: Arc<dyn LlmClient>,
    timeout: Duration,
    temperature: f64,
}

impl LlmRecommendationSource {
    pub fn new(client: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self { client, timeout, temperature: DEFAULT_TEMPERATURE }
    }

    pub fn from_config(client: Arc<dyn LlmClient>, config: &LlmConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
            temperature: config.temperature,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl RecommendationSource for LlmRecommendationSource {
    async fn recommend(
        &self,
        params: &EventParameters,
    ) -> Result<Recommendation, RecommendationError> {
        let request = CompletionRequest {
            prompt: recommendation_prompt(params),
            response_schema: Some(recommendation_schema()),
            temperature: self.temperature,
        };

        let raw = match tokio::time::timeout(self.timeout, self.client.complete(&request)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(error)) => {
                warn!(event_name = "agent.llm.request_failed", error = %error, "llm call failed");
                return Err(RecommendationError::Fetch(format!("{error:#}")));
            }
            Err(_) => {
                warn!(
                    event_name = "agent.llm.timeout",
                    timeout_secs = self.timeout.as_secs(),
                    "llm call timed out"
                );
                return Err(RecommendationError::Timeout { timeout_secs: self.timeout.as_secs() });
            }
        };

        let recommendation = Recommendation::from_response_text(&raw)?;
        info!(
            event_name = "agent.llm.recommendation_parsed",
            main_speakers = recommendation.main_speakers.quantity,
            subwoofers = recommendation.subwoofers.quantity,
            monitors = recommendation.monitor_quantity(),
            "llm recommendation parsed"
        );
        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use nitido_core::domain::event::EventParameters;
    use nitido_core::domain::recommendation::RecommendationSource;
    use nitido_core::errors::RecommendationError;

    use super::LlmRecommendationSource;
    use crate::llm::{CompletionRequest, LlmClient};

    const VALID_RESPONSE: &str = r#"{
        "mainSpeakers": { "quantity": 2, "type": "15 pulgadas activo", "power": "1000W RMS" },
        "subwoofers": { "quantity": 1, "type": "18 pulgadas activo", "power": "1200W RMS" },
        "monitors": { "quantity": 0, "type": "" },
        "mixer": { "type": "Digital", "channels": 8 },
        "explanation": "Sala mediana con música electrónica.",
        "placementSuggestion": "Altavoces a ambos lados del DJ."
    }"#;

    enum Reply {
        Text(String),
        Error(&'static str),
        Hang,
    }

    struct StubClient {
        reply: Reply,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl StubClient {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self { reply, seen: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl LlmClient for StubClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.seen.lock().expect("lock").push(request.clone());
            match &self.reply {
                Reply::Text(text) => Ok(text.clone()),
                Reply::Error(message) => Err(anyhow!(*message)),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
            }
        }
    }

    fn source(client: Arc<StubClient>) -> LlmRecommendationSource {
        LlmRecommendationSource::new(client, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn parses_fenced_structured_answer() {
        let client = StubClient::new(Reply::Text(format!("```json\n{VALID_RESPONSE}\n```")));
        let recommendation = source(client.clone())
            .recommend(&EventParameters::default())
            .await
            .expect("valid recommendation");

        assert_eq!(recommendation.main_speakers.quantity, 2);
        assert_eq!(recommendation.mixer.channels, 8);
        assert_eq!(recommendation.monitor_quantity(), 0);

        let seen = client.seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].temperature, 0.5);
        assert!(seen[0].response_schema.is_some());
        assert!(seen[0].prompt.contains("- Cantidad de invitados: 100"));
    }

    #[tokio::test]
    async fn missing_mixer_is_a_format_error() {
        let client = StubClient::new(Reply::Text(
            r#"{"mainSpeakers":{"quantity":2},"subwoofers":{"quantity":1},"explanation":"","placementSuggestion":""}"#
                .to_string(),
        ));

        let error = source(client).recommend(&EventParameters::default()).await.expect_err("format");
        assert_eq!(error, RecommendationError::MissingField("mixer"));
        assert!(error.is_format_error());
    }

    #[tokio::test]
    async fn non_json_answer_is_malformed() {
        let client = StubClient::new(Reply::Text("Lo siento, no puedo ayudar.".to_string()));
        let error = source(client).recommend(&EventParameters::default()).await.expect_err("format");
        assert!(matches!(error, RecommendationError::Malformed(_)));
    }

    #[tokio::test]
    async fn transport_errors_become_fetch_errors() {
        let client = StubClient::new(Reply::Error("gemini endpoint returned 503"));
        let error = source(client).recommend(&EventParameters::default()).await.expect_err("fetch");

        assert_eq!(error, RecommendationError::Fetch("gemini endpoint returned 503".to_string()));
        assert!(!error.is_format_error());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_llm_times_out_without_retry() {
        let client = StubClient::new(Reply::Hang);
        let error = LlmRecommendationSource::new(client.clone(), Duration::from_secs(30))
            .recommend(&EventParameters::default())
            .await
            .expect_err("timeout");

        assert_eq!(error, RecommendationError::Timeout { timeout_secs: 30 });
        assert_eq!(client.seen.lock().expect("lock").len(), 1);
    }
}
