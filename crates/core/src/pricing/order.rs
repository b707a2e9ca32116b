use rust_decimal::Decimal;

use crate::errors::BudgetError;
use crate::pricing::budget::{LineItem, LineItemKind};
use crate::pricing::currency::format_uyu;
use crate::pricing::total::MixerChannels;

const GREETING: &str = "¡Hola! Quisiera contratar el siguiente equipo de AsistenteNítido:";
const LIGHTING_REQUEST: &str = "- Solicitud de presupuesto para Iluminación.";

/// Composes the hand-off message for the selected equipment.
///
/// Lighting is never itemized: when selected it only adds a request for a
/// separate quote. An order with nothing else selected is rejected.
pub fn format_order(
    items: &[LineItem],
    channels: MixerChannels,
    total: Decimal,
) -> Result<String, BudgetError> {
    let lines = items
        .iter()
        .filter(|item| item.is_selected && item.quantity > 0)
        .filter(|item| item.kind != LineItemKind::Lighting)
        .map(|item| order_line(item, channels))
        .collect::<Vec<_>>();

    if lines.is_empty() {
        return Err(BudgetError::SelectionEmpty);
    }

    let lighting_selected =
        items.iter().any(|item| item.kind == LineItemKind::Lighting && item.is_selected);

    let mut message = format!("{GREETING}\n\n{}", lines.join("\n"));
    if lighting_selected {
        message.push('\n');
        message.push_str(LIGHTING_REQUEST);
    }
    message.push_str(&format!("\n\nTotal estimado: {}", format_uyu(total)));

    Ok(message)
}

fn order_line(item: &LineItem, channels: MixerChannels) -> String {
    if item.kind == LineItemKind::Mixer {
        format!("- {} ({}ch)", item.name(), channels.count())
    } else if item.quantity > 1 {
        format!("- {} (x{})", item.name(), item.quantity)
    } else {
        format!("- {}", item.name())
    }
}
