use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_LINK_BASE_URL: &str = "https://wa.me";
pub const DEFAULT_DESTINATION: &str = "59898753539";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MessagingError {
    #[error("destination `{0}` must be a non-empty string of digits")]
    InvalidDestination(String),
    #[error("order message is empty")]
    EmptyMessage,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderHandoff {
    pub destination: String,
    pub url: String,
}

/// Opens an external conversation pre-filled with an order message.
/// Whether the message is eventually delivered is outside this crate.
pub trait MessagingChannel: Send + Sync {
    fn open(&self, destination: &str, message: &str) -> Result<OrderHandoff, MessagingError>;
}

#[derive(Clone, Debug)]
pub struct WhatsAppLink {
    base_url: String,
}

impl Default for WhatsAppLink {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_BASE_URL)
    }
}

impl WhatsAppLink {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into().trim_end_matches('/').to_string() }
    }
}

impl MessagingChannel for WhatsAppLink {
    fn open(&self, destination: &str, message: &str) -> Result<OrderHandoff, MessagingError> {
        let destination = destination.trim();
        if destination.is_empty() || !destination.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(MessagingError::InvalidDestination(destination.to_string()));
        }
        if message.trim().is_empty() {
            return Err(MessagingError::EmptyMessage);
        }

        let url = format!("{}/{destination}?text={}", self.base_url, urlencoding::encode(message));
        Ok(OrderHandoff { destination: destination.to_string(), url })
    }
}

#[cfg(test)]
mod tests {
    use super::{MessagingChannel, MessagingError, WhatsAppLink, DEFAULT_DESTINATION};

    #[test]
    fn builds_prefilled_link_with_component_encoding() {
        let handoff = WhatsAppLink::default()
            .open(DEFAULT_DESTINATION, "¡Hola!\n- Mixer (2ch)")
            .expect("valid handoff");

        assert_eq!(
            handoff.url,
            "https://wa.me/59898753539?text=%C2%A1Hola%21%0A-%20Mixer%20%282ch%29"
        );
        assert_eq!(handoff.destination, "59898753539");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let handoff = WhatsAppLink::new("https://example.test/")
            .open("123", "hola")
            .expect("valid handoff");
        assert_eq!(handoff.url, "https://example.test/123?text=hola");
    }

    #[test]
    fn rejects_non_numeric_destination_and_blank_message() {
        let link = WhatsAppLink::default();

        assert_eq!(
            link.open("+598 98", "hola"),
            Err(MessagingError::InvalidDestination("+598 98".to_string()))
        );
        assert_eq!(link.open("598", "  "), Err(MessagingError::EmptyMessage));
    }
}
