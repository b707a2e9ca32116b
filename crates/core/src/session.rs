//! Advisor session: one event form, at most one recommendation in flight,
//! and the editable budget derived from the latest successful answer.
//!
//! State moves `Idle -> Loading -> Ready | Failed`. Every submission starts
//! from a clean slate; a failure never leaves the previous budget behind.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::event::EventParameters;
use crate::domain::recommendation::{Recommendation, RecommendationSource};
use crate::errors::{ApplicationError, BudgetError};
use crate::messaging::{MessagingChannel, OrderHandoff};
use crate::pricing::{
    format_order, price_budget, Budget, LineItem, MixerChannels, PriceCatalog, PriceTier,
    PricingResult,
};

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveQuote {
    pub submission_id: Uuid,
    pub received_at: DateTime<Utc>,
    pub recommendation: Recommendation,
    pub budget: Budget,
    pub mixer_channels: MixerChannels,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Loading {
        submission_id: Uuid,
    },
    Ready(Box<ActiveQuote>),
    Failed {
        submission_id: Uuid,
        error: ApplicationError,
    },
}

#[derive(Debug, Default)]
pub struct AdvisorSession {
    catalog: PriceCatalog,
    discount_code: String,
    state: SessionState,
}

impl AdvisorSession {
    pub fn new(catalog: PriceCatalog) -> Self {
        Self { catalog, discount_code: String::new(), state: SessionState::Idle }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading { .. })
    }

    pub async fn submit<S>(
        &mut self,
        params: &EventParameters,
        source: &S,
    ) -> Result<&ActiveQuote, ApplicationError>
    where
        S: RecommendationSource + ?Sized,
    {
        let submission_id = Uuid::new_v4();
        self.state = SessionState::Loading { submission_id };
        info!(
            event_name = "advisor.submission.started",
            correlation_id = %submission_id,
            venue_type = ?params.venue_type,
            guest_count = params.guest_count,
            "requesting sound system recommendation"
        );

        if let Err(error) = params.validate() {
            warn!(
                event_name = "advisor.submission.invalid_parameters",
                correlation_id = %submission_id,
                error = %error,
                "event parameters rejected"
            );
            return Err(self.fail(submission_id, error.into()));
        }

        let recommendation = match source.recommend(params).await {
            Ok(recommendation) => recommendation,
            Err(failure) => {
                if failure.is_format_error() {
                    error!(
                        event_name = "advisor.recommendation.format_invalid",
                        correlation_id = %submission_id,
                        error = %failure,
                        "recommendation response did not match the expected shape"
                    );
                } else {
                    error!(
                        event_name = "advisor.recommendation.fetch_failed",
                        correlation_id = %submission_id,
                        error = %failure,
                        "recommendation request failed"
                    );
                }
                return Err(self.fail(submission_id, failure.into()));
            }
        };

        let budget = Budget::build(&recommendation, &self.catalog);
        info!(
            event_name = "advisor.submission.succeeded",
            correlation_id = %submission_id,
            line_items = budget.len(),
            "budget built from recommendation"
        );

        self.state = SessionState::Ready(Box::new(ActiveQuote {
            submission_id,
            received_at: Utc::now(),
            recommendation,
            budget,
            mixer_channels: MixerChannels::Two,
        }));
        Ok(self.active()?)
    }

    fn fail(&mut self, submission_id: Uuid, error: ApplicationError) -> ApplicationError {
        self.state = SessionState::Failed { submission_id, error: error.clone() };
        error
    }

    pub fn active(&self) -> Result<&ActiveQuote, BudgetError> {
        match &self.state {
            SessionState::Ready(quote) => Ok(quote.as_ref()),
            _ => Err(BudgetError::NoActiveBudget),
        }
    }

    fn active_mut(&mut self) -> Result<&mut ActiveQuote, BudgetError> {
        match &mut self.state {
            SessionState::Ready(quote) => Ok(quote.as_mut()),
            _ => Err(BudgetError::NoActiveBudget),
        }
    }

    pub fn items(&self) -> Result<&[LineItem], BudgetError> {
        Ok(self.active()?.budget.items())
    }

    pub fn discount_code(&self) -> &str {
        &self.discount_code
    }

    /// The code is form state: it survives new submissions.
    pub fn set_discount_code(&mut self, code: impl Into<String>) {
        self.discount_code = code.into();
    }

    pub fn price_tier(&self) -> PriceTier {
        PriceTier::resolve(&self.discount_code)
    }

    pub fn toggle_item(&mut self, index: usize) -> Result<&LineItem, BudgetError> {
        self.active_mut()?.budget.toggle(index)
    }

    pub fn set_quantity(&mut self, index: usize, requested: i64) -> Result<&LineItem, BudgetError> {
        self.active_mut()?.budget.set_quantity(index, requested)
    }

    pub fn mixer_channels(&self) -> Result<MixerChannels, BudgetError> {
        Ok(self.active()?.mixer_channels)
    }

    pub fn set_mixer_channels(&mut self, channels: MixerChannels) -> Result<(), BudgetError> {
        self.active_mut()?.mixer_channels = channels;
        Ok(())
    }

    pub fn pricing(&self) -> Result<PricingResult, BudgetError> {
        let quote = self.active()?;
        Ok(price_budget(quote.budget.items(), self.price_tier(), quote.mixer_channels))
    }

    pub fn total(&self) -> Result<Decimal, BudgetError> {
        Ok(self.pricing()?.total)
    }

    pub fn order_message(&self) -> Result<String, BudgetError> {
        let quote = self.active()?;
        let total = self.total()?;
        format_order(quote.budget.items(), quote.mixer_channels, total)
    }

    pub fn hand_off<C>(&self, channel: &C, destination: &str) -> Result<OrderHandoff, ApplicationError>
    where
        C: MessagingChannel + ?Sized,
    {
        let message = match self.order_message() {
            Ok(message) => message,
            Err(error) => {
                warn!(
                    event_name = "advisor.order.rejected",
                    error = %error,
                    "order message could not be composed"
                );
                return Err(error.into());
            }
        };

        let handoff = channel
            .open(destination, &message)
            .map_err(|error| ApplicationError::Messaging(error.to_string()))?;
        info!(
            event_name = "advisor.order.handed_off",
            destination = %handoff.destination,
            "order message handed to messaging channel"
        );
        Ok(handoff)
    }
}
