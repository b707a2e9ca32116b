pub mod config;
pub mod domain;
pub mod errors;
pub mod messaging;
pub mod pricing;
pub mod session;

pub use domain::event::{AcousticProfile, EventParameters, MusicStyle, VenueDimensions, VenueType};
pub use domain::recommendation::{
    MixerSpec, MonitorSpec, Recommendation, RecommendationSource, SpeakerSpec,
};
pub use errors::{ApplicationError, BudgetError, DomainError, InterfaceError, RecommendationError};
pub use messaging::{MessagingChannel, MessagingError, OrderHandoff, WhatsAppLink};
pub use pricing::{
    compute_total, format_order, format_uyu, price_budget, Budget, LineItem, LineItemKind,
    MixerChannels, PriceCatalog, PriceTier, PricingResult, PricingTraceStep,
};
pub use session::{ActiveQuote, AdvisorSession, SessionState};
