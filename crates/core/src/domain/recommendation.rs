use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::event::EventParameters;
use crate::errors::RecommendationError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerSpec {
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub power: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSpec {
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerSpec {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub channels: u32,
}

/// Equipment proposal returned by the recommendation collaborator.
///
/// Quantities are kept signed as received; the budget builder ignores
/// anything that is not strictly positive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub main_speakers: SpeakerSpec,
    pub subwoofers: SpeakerSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitors: Option<MonitorSpec>,
    pub mixer: MixerSpec,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub placement_suggestion: String,
}

const REQUIRED_FIELDS: [&str; 3] = ["mainSpeakers", "subwoofers", "mixer"];

impl Recommendation {
    /// Parses a raw model response, tolerating surrounding whitespace and a
    /// Markdown code fence around the JSON document.
    pub fn from_response_text(raw: &str) -> Result<Self, RecommendationError> {
        let payload = strip_code_fence(raw.trim());
        let value: Value = serde_json::from_str(payload)
            .map_err(|error| RecommendationError::Malformed(error.to_string()))?;
        Self::from_json(value)
    }

    pub fn from_json(value: Value) -> Result<Self, RecommendationError> {
        let Some(object) = value.as_object() else {
            return Err(RecommendationError::Malformed("expected a JSON object".to_string()));
        };

        for field in REQUIRED_FIELDS {
            match object.get(field) {
                None | Some(Value::Null) => return Err(RecommendationError::MissingField(field)),
                Some(_) => {}
            }
        }

        serde_json::from_value(value)
            .map_err(|error| RecommendationError::Malformed(error.to_string()))
    }

    pub fn monitor_quantity(&self) -> i64 {
        self.monitors.as_ref().map(|monitors| monitors.quantity).unwrap_or(0)
    }
}

fn strip_code_fence(payload: &str) -> &str {
    let Some(rest) = payload.strip_prefix("```") else {
        return payload;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Narrow seam around the external recommendation service.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommend(
        &self,
        params: &EventParameters,
    ) -> Result<Recommendation, RecommendationError>;
}
