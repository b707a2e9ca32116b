use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use nitido_core::config::{LlmConfig, LlmProvider};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub response_schema: Option<Value>,
    pub temperature: f64,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(http: Client, base_url: &str, model: &str, api_key: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!(model = %self.model, "sending gemini generateContent request");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&gemini_body(request))
            .send()
            .await
            .context("gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("gemini endpoint returned {status}");
        }

        let payload: Value =
            response.json().await.context("failed to decode gemini response body")?;
        gemini_text(&payload)
    }
}

pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(http: Client, base_url: &str, model: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string(), model: model.to_string() }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!(model = %self.model, "sending ollama generate request");
        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&ollama_body(&self.model, request))
            .send()
            .await
            .context("ollama request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("ollama endpoint returned {status}");
        }

        let payload: Value =
            response.json().await.context("failed to decode ollama response body")?;
        payload
            .get("response")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("ollama response has no `response` text"))
    }
}

pub fn gemini_body(request: &CompletionRequest) -> Value {
    let mut generation_config = json!({ "temperature": request.temperature });
    if let Some(schema) = &request.response_schema {
        generation_config["responseMimeType"] = json!("application/json");
        generation_config["responseSchema"] = schema.clone();
    }

    json!({
        "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
        "generationConfig": generation_config,
    })
}

/// Concatenates the text parts of the first candidate.
pub fn gemini_text(payload: &Value) -> Result<String> {
    let parts = payload
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("gemini response has no candidate content"))?;

    let text = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<String>();
    if text.is_empty() {
        bail!("gemini candidate carries no text parts");
    }
    Ok(text)
}

pub fn ollama_body(model: &str, request: &CompletionRequest) -> Value {
    let mut body = json!({
        "model": model,
        "prompt": request.prompt,
        "stream": false,
        "options": { "temperature": request.temperature },
    });
    if let Some(schema) = &request.response_schema {
        body["format"] = to_json_schema(schema);
    }
    body
}

/// Ollama takes standard JSON Schema; Gemini's dialect uses upper-case type names.
fn to_json_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let converted = match (key.as_str(), value) {
                        ("type", Value::String(kind)) => Value::String(kind.to_ascii_lowercase()),
                        _ => to_json_schema(value),
                    };
                    (key.clone(), converted)
                })
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.iter().map(to_json_schema).collect()),
        other => other.clone(),
    }
}

pub fn client_from_config(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    let http = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("failed to build http client")?;
    let base_url = config.effective_base_url();

    match config.provider {
        LlmProvider::Gemini => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| anyhow!("llm.api_key is required for the gemini provider"))?;
            Ok(Box::new(GeminiClient::new(http, base_url, &config.model, api_key)))
        }
        LlmProvider::Ollama => Ok(Box::new(OllamaClient::new(http, base_url, &config.model))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{gemini_body, gemini_text, ollama_body, CompletionRequest};

    fn request() -> CompletionRequest {
        CompletionRequest {
            prompt: "Analiza".to_string(),
            response_schema: Some(json!({
                "type": "OBJECT",
                "properties": { "mixer": { "type": "OBJECT", "properties": { "channels": { "type": "INTEGER" } } } },
                "required": ["mixer"]
            })),
            temperature: 0.5,
        }
    }

    #[test]
    fn gemini_body_requests_json_with_schema() {
        let body = gemini_body(&request());

        assert_eq!(body["contents"][0]["parts"][0]["text"], "Analiza");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
        assert_eq!(body["generationConfig"]["responseSchema"]["required"][0], "mixer");
    }

    #[test]
    fn gemini_body_without_schema_is_plain_text() {
        let body = gemini_body(&CompletionRequest { response_schema: None, ..request() });
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn gemini_text_joins_first_candidate_parts() {
        let payload = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"mixer\":" }, { "text": "{}}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        });
        assert_eq!(gemini_text(&payload).expect("text"), "{\"mixer\":{}}");
    }

    #[test]
    fn gemini_text_rejects_empty_candidates() {
        assert!(gemini_text(&json!({ "candidates": [] })).is_err());
        assert!(gemini_text(&json!({ "candidates": [{ "content": { "parts": [{}] } }] })).is_err());
    }

    #[test]
    fn ollama_body_lowercases_schema_types() {
        let body = ollama_body("llama3.1", &request());

        assert_eq!(body["model"], "llama3.1");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["temperature"], 0.5);
        assert_eq!(body["format"]["type"], "object");
        assert_eq!(body["format"]["properties"]["mixer"]["properties"]["channels"]["type"], "integer");
        assert_eq!(body["format"]["required"][0], "mixer");
    }
}
