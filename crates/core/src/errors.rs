use thiserror::Error;

pub const RETRY_LATER_MESSAGE: &str =
    "Hubo un error al generar la recomendación. Por favor, inténtalo de nuevo más tarde.";
pub const SELECTION_EMPTY_MESSAGE: &str = "Por favor, selecciona al menos un ítem para contratar.";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("recommendation request failed: {0}")]
    Fetch(String),
    #[error("recommendation request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
    #[error("recommendation response is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("recommendation response is malformed: {0}")]
    Malformed(String),
}

impl RecommendationError {
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::MissingField(_) | Self::Malformed(_))
    }

    pub fn class(&self) -> &'static str {
        if self.is_format_error() {
            "recommendation_format"
        } else {
            "recommendation_fetch"
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    #[error("no qualifying line item is selected")]
    SelectionEmpty,
    #[error("line item index {index} is out of range (budget has {len} items)")]
    UnknownLineItem { index: usize, len: usize },
    #[error("quantity of `{item}` is fixed")]
    QuantityNotAdjustable { item: &'static str },
    #[error("no budget is active; submit event parameters first")]
    NoActiveBudget,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid event parameters: {0}")]
    InvalidEventParameters(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
    #[error(transparent)]
    Budget(#[from] BudgetError),
    #[error("messaging handoff failed: {0}")]
    Messaging(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("selection warning: {message}")]
    SelectionWarning { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "Los datos del evento no son válidos. Revisa el formulario e inténtalo de nuevo."
            }
            Self::SelectionWarning { .. } => SELECTION_EMPTY_MESSAGE,
            Self::ServiceUnavailable { .. } => RETRY_LATER_MESSAGE,
            Self::Internal { .. } => "Ocurrió un error interno inesperado.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::SelectionWarning { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::SelectionWarning { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let unassigned = || "unassigned".to_owned();
        match value {
            ApplicationError::Domain(error) => {
                Self::BadRequest { message: error.to_string(), correlation_id: unassigned() }
            }
            // Fetch and format failures look identical to the user.
            ApplicationError::Recommendation(error) => {
                Self::ServiceUnavailable { message: error.to_string(), correlation_id: unassigned() }
            }
            ApplicationError::Budget(BudgetError::SelectionEmpty) => Self::SelectionWarning {
                message: BudgetError::SelectionEmpty.to_string(),
                correlation_id: unassigned(),
            },
            ApplicationError::Budget(error) => {
                Self::BadRequest { message: error.to_string(), correlation_id: unassigned() }
            }
            ApplicationError::Messaging(message) => {
                Self::ServiceUnavailable { message, correlation_id: unassigned() }
            }
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: unassigned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{
        ApplicationError, BudgetError, InterfaceError, RecommendationError, RETRY_LATER_MESSAGE,
        SELECTION_EMPTY_MESSAGE,
    };

    #[test]
    fn fetch_and_format_failures_share_the_retry_later_message() {
        let fetch = ApplicationError::from(RecommendationError::Fetch("connection reset".into()))
            .into_interface("sub-1");
        let format = ApplicationError::from(RecommendationError::MissingField("mixer"))
            .into_interface("sub-2");

        assert!(matches!(fetch, InterfaceError::ServiceUnavailable { .. }));
        assert!(matches!(format, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(fetch.user_message(), RETRY_LATER_MESSAGE);
        assert_eq!(format.user_message(), RETRY_LATER_MESSAGE);
    }

    #[test]
    fn fetch_and_format_failures_keep_distinct_classes() {
        assert_eq!(RecommendationError::Fetch("x".into()).class(), "recommendation_fetch");
        assert_eq!(
            RecommendationError::Timeout { timeout_secs: 30 }.class(),
            "recommendation_fetch"
        );
        assert_eq!(RecommendationError::MissingField("mixer").class(), "recommendation_format");
        assert_eq!(RecommendationError::Malformed("eof".into()).class(), "recommendation_format");
    }

    #[test]
    fn empty_selection_maps_to_inline_warning() {
        let interface =
            ApplicationError::from(BudgetError::SelectionEmpty).into_interface("sub-3");

        assert!(matches!(
            interface,
            InterfaceError::SelectionWarning { ref correlation_id, .. } if correlation_id == "sub-3"
        ));
        assert_eq!(interface.user_message(), SELECTION_EMPTY_MESSAGE);
    }

    #[test]
    fn configuration_error_maps_to_internal() {
        let interface =
            ApplicationError::Configuration("missing api key".to_owned()).into_interface("req-4");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.correlation_id(), "req-4");
    }
}
