use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::budget::{LineItem, LineItemKind};
use crate::pricing::catalog::MIXER_FOUR_CHANNEL_SURCHARGE;
use crate::pricing::tier::PriceTier;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MixerChannels {
    #[default]
    Two,
    Four,
}

impl MixerChannels {
    pub fn count(self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub item: LineItemKind,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub surcharge: Decimal,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub tier: PriceTier,
    pub mixer_channels: MixerChannels,
    pub total: Decimal,
    pub steps: Vec<PricingTraceStep>,
}

pub fn compute_total(items: &[LineItem], tier: PriceTier, channels: MixerChannels) -> Decimal {
    price_budget(items, tier, channels).total
}

/// Prices every selected item; unselected items are absent from the trace.
pub fn price_budget(items: &[LineItem], tier: PriceTier, channels: MixerChannels) -> PricingResult {
    let steps = items
        .iter()
        .filter(|item| item.is_selected)
        .map(|item| {
            let unit_price = item.unit_price(tier);
            let surcharge = if item.kind == LineItemKind::Mixer && channels == MixerChannels::Four {
                MIXER_FOUR_CHANNEL_SURCHARGE
            } else {
                Decimal::ZERO
            };
            PricingTraceStep {
                item: item.kind,
                quantity: item.quantity,
                unit_price,
                surcharge,
                amount: unit_price * Decimal::from(item.quantity) + surcharge,
            }
        })
        .collect::<Vec<_>>();

    let total = steps.iter().map(|step| step.amount).sum();

    PricingResult { tier, mixer_channels: channels, total, steps }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::pricing::budget::{Budget, LineItemKind};
    use crate::pricing::catalog::{PriceCatalog, MIXER_FOUR_CHANNEL_SURCHARGE};
    use crate::pricing::fixtures::recommendation;
    use crate::pricing::tier::PriceTier;

    use super::{compute_total, price_budget, MixerChannels};

    fn budget(main: i64, subs: i64, monitors: Option<i64>) -> Budget {
        Budget::build(&recommendation(main, subs, monitors), &PriceCatalog::standard())
    }

    #[test]
    fn default_selection_example_totals_fourteen_thousand_five_hundred() {
        let budget = budget(2, 1, None);

        // 2×2500 + 3500 + 2500 + 500 + 3000, vinyl decks and lighting excluded.
        let total = compute_total(budget.items(), PriceTier::Ideal, MixerChannels::Two);
        assert_eq!(total, Decimal::from(14_500));
    }

    #[test]
    fn tier_selects_unit_price_column() {
        let budget = budget(2, 1, Some(2));

        // Monitors and fixed costs are the same in every tier.
        assert_eq!(
            compute_total(budget.items(), PriceTier::Ideal, MixerChannels::Two),
            Decimal::from(5000 + 3500 + 4000 + 2500 + 3500)
        );
        assert_eq!(
            compute_total(budget.items(), PriceTier::Average, MixerChannels::Two),
            Decimal::from(4000 + 3000 + 4000 + 2000 + 3500)
        );
        assert_eq!(
            compute_total(budget.items(), PriceTier::MaxDiscount, MixerChannels::Two),
            Decimal::from(3000 + 2300 + 4000 + 1500 + 3500)
        );
    }

    #[test]
    fn four_channel_mixer_adds_surcharge_only_when_mixer_selected() {
        let mut budget = budget(2, 1, None);
        let two = compute_total(budget.items(), PriceTier::Average, MixerChannels::Two);
        let four = compute_total(budget.items(), PriceTier::Average, MixerChannels::Four);
        assert_eq!(four - two, MIXER_FOUR_CHANNEL_SURCHARGE);

        let mixer = budget.position(LineItemKind::Mixer).expect("mixer index");
        budget.toggle(mixer).expect("deselect mixer");
        assert_eq!(
            compute_total(budget.items(), PriceTier::Average, MixerChannels::Two),
            compute_total(budget.items(), PriceTier::Average, MixerChannels::Four)
        );
    }

    #[test]
    fn total_is_monotonic_in_selected_quantity() {
        let mut budget = budget(2, 1, None);
        let mut previous = Decimal::ZERO;

        for quantity in 0..6 {
            budget.set_quantity(0, quantity).expect("main speakers are adjustable");
            let total = compute_total(budget.items(), PriceTier::MaxDiscount, MixerChannels::Two);
            assert!(total >= previous, "total decreased at quantity {quantity}");
            previous = total;
        }
    }

    #[test]
    fn unselected_items_ignore_quantity_changes() {
        let mut budget = budget(2, 1, None);
        let vinyl = budget.position(LineItemKind::VinylDecks).expect("vinyl index");
        let before = compute_total(budget.items(), PriceTier::Ideal, MixerChannels::Two);

        budget.set_quantity(vinyl, 10).expect("vinyl decks are adjustable");
        assert_eq!(compute_total(budget.items(), PriceTier::Ideal, MixerChannels::Two), before);

        budget.toggle(vinyl).expect("select vinyl decks");
        assert_eq!(
            compute_total(budget.items(), PriceTier::Ideal, MixerChannels::Two),
            before + Decimal::from(25_000)
        );
    }

    #[test]
    fn lighting_never_contributes() {
        let mut budget = budget(2, 1, None);
        let before = compute_total(budget.items(), PriceTier::Ideal, MixerChannels::Four);
        let lighting = budget.position(LineItemKind::Lighting).expect("lighting index");

        budget.toggle(lighting).expect("select lighting");
        assert_eq!(compute_total(budget.items(), PriceTier::Ideal, MixerChannels::Four), before);
    }

    #[test]
    fn trace_lists_selected_items_with_surcharge() {
        let budget = budget(2, 1, None);
        let result = price_budget(budget.items(), PriceTier::Ideal, MixerChannels::Four);

        assert_eq!(result.steps.len(), 5);
        let mixer = result
            .steps
            .iter()
            .find(|step| step.item == LineItemKind::Mixer)
            .expect("mixer step");
        assert_eq!(mixer.surcharge, Decimal::from(500));
        assert_eq!(mixer.amount, Decimal::from(3000));
        assert_eq!(result.total, Decimal::from(15_000));
    }

    #[test]
    fn fractional_prices_are_not_rounded_before_summing() {
        let mut catalog = PriceCatalog::standard();
        catalog.main_speaker.ideal = Decimal::new(100_025, 2);
        let budget = Budget::build(&recommendation(3, 0, None), &catalog);

        let total = compute_total(budget.items(), PriceTier::Ideal, MixerChannels::Two);
        assert_eq!(total, Decimal::new(300_075, 2) + Decimal::from(2500 + 500 + 3000));
    }

    #[test]
    fn channel_counts_round_trip() {
        assert_eq!(MixerChannels::default(), MixerChannels::Two);
        assert_eq!(MixerChannels::from_count(4), Some(MixerChannels::Four));
        assert_eq!(MixerChannels::from_count(3), None);
        assert_eq!(MixerChannels::Four.count(), 4);
    }
}
