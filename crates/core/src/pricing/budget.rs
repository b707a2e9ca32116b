use serde::{Deserialize, Serialize};

use crate::domain::recommendation::Recommendation;
use crate::errors::BudgetError;
use crate::pricing::catalog::{EquipmentKind, PriceCatalog, UnitPrices};
use crate::pricing::tier::PriceTier;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    MainSpeakers,
    Subwoofers,
    StageMonitors,
    Mixer,
    VinylDecks,
    Shipping,
    Operations,
    Lighting,
}

impl LineItemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::MainSpeakers => "Altavoces Principales",
            Self::Subwoofers => "Subwoofers",
            Self::StageMonitors => "Monitores de Escenario",
            Self::Mixer => "Mixer",
            Self::VinylDecks => "Bandejas de Vinilo",
            Self::Shipping => "Envío",
            Self::Operations => "Operativa",
            Self::Lighting => "Iluminación",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub kind: LineItemKind,
    pub quantity: u32,
    pub unit_prices: UnitPrices,
    pub is_selected: bool,
    pub is_quantity_adjustable: bool,
}

impl LineItem {
    fn adjustable(kind: LineItemKind, quantity: u32, unit_prices: UnitPrices) -> Self {
        Self { kind, quantity, unit_prices, is_selected: true, is_quantity_adjustable: true }
    }

    fn fixed(kind: LineItemKind, unit_prices: UnitPrices) -> Self {
        Self { kind, quantity: 1, unit_prices, is_selected: true, is_quantity_adjustable: false }
    }

    fn deselected(self) -> Self {
        Self { is_selected: false, ..self }
    }

    pub fn name(&self) -> &'static str {
        self.kind.label()
    }

    pub fn unit_price(&self, tier: PriceTier) -> rust_decimal::Decimal {
        self.unit_prices.for_tier(tier)
    }
}

/// Ordered, user-editable rental budget derived from one recommendation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    items: Vec<LineItem>,
}

impl Budget {
    pub fn build(recommendation: &Recommendation, catalog: &PriceCatalog) -> Self {
        let mut items = Vec::with_capacity(8);

        let recommended = [
            (
                LineItemKind::MainSpeakers,
                EquipmentKind::MainSpeaker,
                recommendation.main_speakers.quantity,
            ),
            (LineItemKind::Subwoofers, EquipmentKind::Subwoofer, recommendation.subwoofers.quantity),
            (LineItemKind::StageMonitors, EquipmentKind::Monitor, recommendation.monitor_quantity()),
        ];
        for (kind, equipment, quantity) in recommended {
            if let Some(quantity) = positive_quantity(quantity) {
                items.push(LineItem::adjustable(kind, quantity, catalog.unit_prices(equipment)));
            }
        }

        items.push(LineItem::fixed(LineItemKind::Mixer, catalog.mixer));
        items.push(
            LineItem::adjustable(LineItemKind::VinylDecks, 2, catalog.vinyl_deck).deselected(),
        );
        items.push(LineItem::fixed(LineItemKind::Shipping, UnitPrices::flat(catalog.shipping)));
        items.push(LineItem::fixed(
            LineItemKind::Operations,
            UnitPrices::flat(catalog.operational),
        ));
        items.push(LineItem::fixed(LineItemKind::Lighting, UnitPrices::ZERO).deselected());

        Self { items }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, kind: LineItemKind) -> Option<&LineItem> {
        self.items.iter().find(|item| item.kind == kind)
    }

    pub fn position(&self, kind: LineItemKind) -> Option<usize> {
        self.items.iter().position(|item| item.kind == kind)
    }

    pub fn toggle(&mut self, index: usize) -> Result<&LineItem, BudgetError> {
        let current = self.item_at(index)?;
        let updated = LineItem { is_selected: !current.is_selected, ..current.clone() };
        Ok(self.replace(index, updated))
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<&LineItem, BudgetError> {
        let current = self.item_at(index)?;
        let updated = LineItem { is_selected: selected, ..current.clone() };
        Ok(self.replace(index, updated))
    }

    /// Negative requests clamp to zero; values beyond `u32::MAX` saturate.
    pub fn set_quantity(&mut self, index: usize, requested: i64) -> Result<&LineItem, BudgetError> {
        let current = self.item_at(index)?;
        if !current.is_quantity_adjustable {
            return Err(BudgetError::QuantityNotAdjustable { item: current.name() });
        }

        let quantity = u32::try_from(requested.max(0)).unwrap_or(u32::MAX);
        let updated = LineItem { quantity, ..current.clone() };
        Ok(self.replace(index, updated))
    }

    fn item_at(&self, index: usize) -> Result<&LineItem, BudgetError> {
        self.items.get(index).ok_or(BudgetError::UnknownLineItem { index, len: self.items.len() })
    }

    fn replace(&mut self, index: usize, item: LineItem) -> &LineItem {
        self.items[index] = item;
        &self.items[index]
    }
}

fn positive_quantity(quantity: i64) -> Option<u32> {
    (quantity > 0).then(|| u32::try_from(quantity).unwrap_or(u32::MAX))
}
