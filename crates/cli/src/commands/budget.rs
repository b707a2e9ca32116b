//! Shared advisor flow for `recommend` and `quote`: submit, apply budget
//! edits, compose the order hand-off and render the report.

use std::str::FromStr;

use clap::Args;
use nitido_core::config::MessagingConfig;
use nitido_core::domain::event::EventParameters;
use nitido_core::domain::recommendation::{Recommendation, RecommendationSource};
use nitido_core::errors::{ApplicationError, BudgetError, SELECTION_EMPTY_MESSAGE};
use nitido_core::messaging::WhatsAppLink;
use nitido_core::pricing::{format_uyu, LineItemKind, MixerChannels, PriceCatalog, PricingResult};
use nitido_core::session::{AdvisorSession, SessionState};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::commands::{
    CommandResult, EXIT_BUDGET, EXIT_CONFIG, EXIT_MESSAGING, EXIT_RECOMMENDATION,
};

/// `INDEX=QUANTITY` as passed to `--quantity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantityEdit {
    pub index: usize,
    pub quantity: i64,
}

impl FromStr for QuantityEdit {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (index, quantity) = value
            .split_once('=')
            .ok_or_else(|| format!("expected INDEX=QUANTITY, got `{value}`"))?;
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid line item index `{index}`"))?;
        let quantity = quantity
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid quantity `{quantity}`"))?;
        Ok(Self { index, quantity })
    }
}

#[derive(Clone, Debug, Default, Args)]
pub struct PricingFlags {
    #[arg(long = "code", help = "Discount code selecting the price tier")]
    pub discount_code: Option<String>,
    #[arg(long, help = "Price the mixer as a four-channel unit")]
    pub four_channel: bool,
    #[arg(long, help = "Emit machine-readable JSON output")]
    pub json: bool,
}

#[derive(Clone, Debug, Default)]
pub struct BudgetEdits {
    pub discount_code: Option<String>,
    pub four_channel: bool,
    pub toggles: Vec<usize>,
    pub quantities: Vec<QuantityEdit>,
}

impl BudgetEdits {
    pub fn from_flags(flags: &PricingFlags) -> Self {
        Self {
            discount_code: flags.discount_code.clone(),
            four_channel: flags.four_channel,
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportLine {
    index: usize,
    item: &'static str,
    kind: LineItemKind,
    quantity: u32,
    selected: bool,
    adjustable: bool,
    unit_price: Decimal,
}

#[derive(Debug, Serialize)]
struct QuoteReport<'a> {
    command: &'static str,
    status: &'static str,
    correlation_id: String,
    recommendation: &'a Recommendation,
    tier_label: &'static str,
    items: Vec<ReportLine>,
    pricing: PricingResult,
    total_display: String,
    order_url: Option<String>,
    warning: Option<&'static str>,
}

pub fn run_session<S>(
    command: &'static str,
    params: &EventParameters,
    source: &S,
    edits: &BudgetEdits,
    messaging: &MessagingConfig,
    json: bool,
) -> CommandResult
where
    S: RecommendationSource + ?Sized,
{
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                command,
                "runtime",
                format!("failed to build async runtime: {error}"),
                EXIT_RECOMMENDATION,
            );
        }
    };

    let mut session = AdvisorSession::new(PriceCatalog::standard());
    if let Some(code) = &edits.discount_code {
        session.set_discount_code(code.clone());
    }

    let submitted =
        runtime.block_on(session.submit(params, source)).map(|quote| quote.submission_id);
    let correlation_id = match submitted {
        Ok(submission_id) => submission_id.to_string(),
        Err(error) => return submission_failure(command, &session, error),
    };

    if let Err(error) = apply_edits(&mut session, edits) {
        return CommandResult::failure(command, "budget_edit", error.to_string(), EXIT_BUDGET);
    }

    let link = WhatsAppLink::new(messaging.link_base_url.as_str());
    let (order_url, warning) = match session.hand_off(&link, &messaging.destination) {
        Ok(handoff) => (Some(handoff.url), None),
        Err(ApplicationError::Budget(BudgetError::SelectionEmpty)) => {
            (None, Some(SELECTION_EMPTY_MESSAGE))
        }
        Err(error) => {
            return CommandResult::failure(command, "messaging", error.to_string(), EXIT_MESSAGING);
        }
    };

    let report = match build_report(command, &session, correlation_id, order_url, warning) {
        Ok(report) => report,
        Err(error) => {
            return CommandResult::failure(command, "budget_edit", error.to_string(), EXIT_BUDGET);
        }
    };
    info!(
        event_name = "cli.quote.rendered",
        correlation_id = %report.correlation_id,
        total = %report.pricing.total,
        "quote report rendered"
    );

    let output = if json {
        match serde_json::to_string_pretty(&report) {
            Ok(output) => output,
            Err(error) => {
                return CommandResult::failure(
                    command,
                    "serialization",
                    error.to_string(),
                    EXIT_BUDGET,
                );
            }
        }
    } else {
        render_text(&report)
    };

    CommandResult { exit_code: 0, output }
}

fn submission_failure(
    command: &str,
    session: &AdvisorSession,
    error: ApplicationError,
) -> CommandResult {
    let correlation_id = match session.state() {
        SessionState::Failed { submission_id, .. } => submission_id.to_string(),
        _ => "unassigned".to_string(),
    };
    let (error_class, exit_code) = match &error {
        ApplicationError::Recommendation(failure) => (failure.class(), EXIT_RECOMMENDATION),
        ApplicationError::Domain(_) => ("invalid_parameters", EXIT_CONFIG),
        _ => ("internal", EXIT_RECOMMENDATION),
    };
    let interface = error.into_interface(correlation_id);

    CommandResult::failure(
        command,
        error_class,
        format!("{} (correlation_id: {})", interface.user_message(), interface.correlation_id()),
        exit_code,
    )
}

fn apply_edits(session: &mut AdvisorSession, edits: &BudgetEdits) -> Result<(), BudgetError> {
    if edits.four_channel {
        session.set_mixer_channels(MixerChannels::Four)?;
    }
    for index in &edits.toggles {
        session.toggle_item(*index)?;
    }
    for edit in &edits.quantities {
        session.set_quantity(edit.index, edit.quantity)?;
    }
    Ok(())
}

fn build_report<'a>(
    command: &'static str,
    session: &'a AdvisorSession,
    correlation_id: String,
    order_url: Option<String>,
    warning: Option<&'static str>,
) -> Result<QuoteReport<'a>, BudgetError> {
    let quote = session.active()?;
    let tier = session.price_tier();
    let pricing = session.pricing()?;

    let items = quote
        .budget
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| ReportLine {
            index,
            item: item.name(),
            kind: item.kind,
            quantity: item.quantity,
            selected: item.is_selected,
            adjustable: item.is_quantity_adjustable,
            unit_price: item.unit_price(tier),
        })
        .collect();

    Ok(QuoteReport {
        command,
        status: if warning.is_some() { "warning" } else { "ok" },
        correlation_id,
        recommendation: &quote.recommendation,
        tier_label: tier.label(),
        items,
        total_display: format_uyu(pricing.total),
        pricing,
        order_url,
        warning,
    })
}

fn render_text(report: &QuoteReport<'_>) -> String {
    let recommendation = report.recommendation;
    let mut lines = vec![format!("Recomendación ({})", report.correlation_id)];

    lines.push(format!(
        "- {}: {} x {} ({})",
        LineItemKind::MainSpeakers.label(),
        recommendation.main_speakers.quantity,
        recommendation.main_speakers.kind,
        recommendation.main_speakers.power
    ));
    lines.push(format!(
        "- {}: {} x {} ({})",
        LineItemKind::Subwoofers.label(),
        recommendation.subwoofers.quantity,
        recommendation.subwoofers.kind,
        recommendation.subwoofers.power
    ));
    if let Some(monitors) = recommendation.monitors.as_ref().filter(|monitors| monitors.quantity > 0)
    {
        lines.push(format!(
            "- {}: {} x {}",
            LineItemKind::StageMonitors.label(),
            monitors.quantity,
            monitors.kind
        ));
    }
    lines.push(format!(
        "- {}: {}, {} canales",
        LineItemKind::Mixer.label(),
        recommendation.mixer.kind,
        recommendation.mixer.channels
    ));
    if !recommendation.explanation.is_empty() {
        lines.push(format!("Explicación: {}", recommendation.explanation));
    }
    if !recommendation.placement_suggestion.is_empty() {
        lines.push(format!("Colocación sugerida: {}", recommendation.placement_suggestion));
    }

    lines.push(String::new());
    lines.push(format!(
        "Presupuesto ({}, mixer {}ch)",
        report.tier_label,
        report.pricing.mixer_channels.count()
    ));
    for line in &report.items {
        let mark = if line.selected { "x" } else { " " };
        lines.push(format!(
            "[{mark}] {} {} x{} @ {}",
            line.index,
            line.item,
            line.quantity,
            format_uyu(line.unit_price)
        ));
    }
    lines.push(format!("Total estimado: {}", report.total_display));

    if let Some(url) = &report.order_url {
        lines.push(format!("Pedido: {url}"));
    }
    if let Some(warning) = report.warning {
        lines.push(format!("Aviso: {warning}"));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::QuantityEdit;

    #[test]
    fn parses_quantity_edits() {
        assert_eq!("0=4".parse::<QuantityEdit>(), Ok(QuantityEdit { index: 0, quantity: 4 }));
        assert_eq!(" 3 = -1".parse::<QuantityEdit>(), Ok(QuantityEdit { index: 3, quantity: -1 }));
        assert!("4".parse::<QuantityEdit>().is_err());
        assert!("a=1".parse::<QuantityEdit>().is_err());
    }
}
