use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::tier::PriceTier;

pub const SHIPPING_COST: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
pub const OPERATIONAL_COST: Decimal = Decimal::from_parts(3000, 0, 0, false, 0);
pub const MIXER_FOUR_CHANNEL_SURCHARGE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    MainSpeaker,
    Subwoofer,
    Monitor,
    Mixer,
    VinylDeck,
}

/// Rental price of one unit under each tier, in UYU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPrices {
    pub ideal: Decimal,
    pub average: Decimal,
    pub max_discount: Decimal,
}

impl UnitPrices {
    pub const ZERO: Self =
        Self { ideal: Decimal::ZERO, average: Decimal::ZERO, max_discount: Decimal::ZERO };

    pub fn new(ideal: i64, average: i64, max_discount: i64) -> Self {
        Self {
            ideal: Decimal::from(ideal),
            average: Decimal::from(average),
            max_discount: Decimal::from(max_discount),
        }
    }

    pub fn flat(price: Decimal) -> Self {
        Self { ideal: price, average: price, max_discount: price }
    }

    pub fn for_tier(&self, tier: PriceTier) -> Decimal {
        match tier {
            PriceTier::Ideal => self.ideal,
            PriceTier::Average => self.average,
            PriceTier::MaxDiscount => self.max_discount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCatalog {
    pub main_speaker: UnitPrices,
    pub subwoofer: UnitPrices,
    pub monitor: UnitPrices,
    pub mixer: UnitPrices,
    pub vinyl_deck: UnitPrices,
    pub shipping: Decimal,
    pub operational: Decimal,
}

impl Default for PriceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl PriceCatalog {
    pub fn standard() -> Self {
        Self {
            main_speaker: UnitPrices::new(2500, 2000, 1500),
            subwoofer: UnitPrices::new(3500, 3000, 2300),
            monitor: UnitPrices::new(2000, 2000, 2000),
            mixer: UnitPrices::new(2500, 2000, 1500),
            vinyl_deck: UnitPrices::new(2500, 2000, 1500),
            shipping: SHIPPING_COST,
            operational: OPERATIONAL_COST,
        }
    }

    pub fn unit_prices(&self, kind: EquipmentKind) -> UnitPrices {
        match kind {
            EquipmentKind::MainSpeaker => self.main_speaker,
            EquipmentKind::Subwoofer => self.subwoofer,
            EquipmentKind::Monitor => self.monitor,
            EquipmentKind::Mixer => self.mixer,
            EquipmentKind::VinylDeck => self.vinyl_deck,
        }
    }
}
