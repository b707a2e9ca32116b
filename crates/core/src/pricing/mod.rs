pub mod budget;
pub mod catalog;
pub mod currency;
pub mod order;
pub mod tier;
pub mod total;

#[cfg(test)]
pub(crate) mod fixtures;

pub use budget::{Budget, LineItem, LineItemKind};
pub use catalog::{EquipmentKind, PriceCatalog, UnitPrices};
pub use currency::format_uyu;
pub use order::format_order;
pub use tier::PriceTier;
pub use total::{compute_total, price_budget, MixerChannels, PricingResult, PricingTraceStep};
