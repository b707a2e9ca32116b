//! Prompt and response schema for sound system recommendations.
//!
//! The model only proposes equipment. Prices, tiers and totals are computed
//! deterministically by `nitido-core` from the structured answer.

use nitido_core::domain::event::EventParameters;
use serde_json::{json, Value};

/// Formats a metre value without trailing zeros: `10`, `2.5`.
fn metres(value: f64) -> String {
    let rendered = format!("{value:.2}");
    rendered.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn db_restriction(params: &EventParameters) -> String {
    match params.max_db {
        Some(level) => format!("Sí, máximo {level} dB"),
        None => "No".to_string(),
    }
}

pub fn recommendation_prompt(params: &EventParameters) -> String {
    let dimensions = &params.dimensions;
    format!(
        "Analiza los siguientes detalles de un evento y recomienda un sistema de sonido completo.\n\
         - Tipo de lugar: {venue}\n\
         - Dimensiones del lugar (Ancho x Largo x Alto): {width}m x {length}m x {height}m\n\
         - Propiedades acústicas: {acoustics}\n\
         - Cantidad de invitados: {guests}\n\
         - Estilo de música: {style}\n\
         - Restricciones de decibelios: {db}\n\
         \n\
         Calcula la potencia necesaria y el tipo de equipamiento. Considera que en exteriores el sonido se disipa más.\n\
         Para música con muchos graves (electrónica, hip-hop), los subwoofers son cruciales.\n\
         Si el estilo musical es en vivo (pop/rock, jazz), incluye monitores de escenario.\n\
         Para discursos, la claridad es más importante que la potencia de bajos.\n\
         Ajusta la recomendación si hay restricciones de dB.\n\
         Proporciona la recomendación en el formato JSON especificado.",
        venue = params.venue_type.label(),
        width = metres(dimensions.width_m),
        length = metres(dimensions.length_m),
        height = metres(dimensions.height_m),
        acoustics = params.acoustics.description(),
        guests = params.guest_count,
        style = params.music_style.slug(),
        db = db_restriction(params),
    )
}

fn speaker_schema(what: &str, kind_example: &str, power_example: &str) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "quantity": { "type": "INTEGER", "description": format!("Número de {what}.") },
            "type": { "type": "STRING", "description": format!("Tipo de {kind_example}.") },
            "power": { "type": "STRING", "description": format!("Potencia recomendada en Watts RMS, ej: '{power_example}'.") }
        },
        "required": ["quantity", "type", "power"]
    })
}

/// Structured-output schema in the Gemini `responseSchema` dialect.
pub fn recommendation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "mainSpeakers": speaker_schema(
                "altavoces principales",
                "altavoz, ej: '15 pulgadas activo'",
                "1000W RMS",
            ),
            "subwoofers": speaker_schema(
                "subwoofers",
                "subwoofer, ej: '18 pulgadas activo'",
                "1200W RMS",
            ),
            "monitors": {
                "type": "OBJECT",
                "properties": {
                    "quantity": { "type": "INTEGER", "description": "Número de monitores de escenario. 0 si no son necesarios." },
                    "type": { "type": "STRING", "description": "Tipo de monitor, ej: '12 pulgadas activo'." }
                }
            },
            "mixer": {
                "type": "OBJECT",
                "properties": {
                    "type": { "type": "STRING", "description": "Tipo de mezcladora, ej: 'Digital' o 'Analógica'." },
                    "channels": { "type": "INTEGER", "description": "Número mínimo de canales necesarios." }
                },
                "required": ["type", "channels"]
            },
            "explanation": {
                "type": "STRING",
                "description": "Explicación detallada en español de por qué se recomienda esta configuración, considerando todos los factores de entrada."
            },
            "placementSuggestion": {
                "type": "STRING",
                "description": "Una breve sugerencia en español sobre la colocación óptima del equipo en el espacio."
            }
        },
        "required": ["mainSpeakers", "subwoofers", "mixer", "explanation", "placementSuggestion"]
    })
}

#[cfg(test)]
mod tests {
    use nitido_core::domain::event::{AcousticProfile, EventParameters, MusicStyle, VenueType};

    use super::{recommendation_prompt, recommendation_schema};

    #[test]
    fn prompt_describes_every_event_parameter() {
        let mut params = EventParameters::default();
        params.set_venue_type(VenueType::Outdoor);
        params.acoustics = AcousticProfile::Urban;
        params.dimensions.width_m = 12.5;
        params.guest_count = 250;
        params.music_style = MusicStyle::PopRock;
        params.max_db = Some(95);

        let prompt = recommendation_prompt(&params);

        assert!(prompt.contains("- Tipo de lugar: Exterior\n"));
        assert!(prompt.contains("(Ancho x Largo x Alto): 12.5m x 15m x 3m\n"));
        assert!(prompt.contains("edificios cercanos que pueden causar reflejos y eco"));
        assert!(prompt.contains("- Cantidad de invitados: 250\n"));
        assert!(prompt.contains("- Estilo de música: pop-rock\n"));
        assert!(prompt.contains("- Restricciones de decibelios: Sí, máximo 95 dB\n"));
    }

    #[test]
    fn prompt_without_db_cap_says_no() {
        let prompt = recommendation_prompt(&EventParameters::default());
        assert!(prompt.contains("- Restricciones de decibelios: No\n"));
        assert!(prompt.contains("- Tipo de lugar: Interior\n"));
    }

    #[test]
    fn schema_requires_core_sections_and_leaves_monitors_optional() {
        let schema = recommendation_schema();
        let required = schema["required"].as_array().expect("required list");

        for field in ["mainSpeakers", "subwoofers", "mixer", "explanation", "placementSuggestion"] {
            assert!(required.iter().any(|value| value == field), "{field} should be required");
        }
        assert!(!required.iter().any(|value| value == "monitors"));
        assert_eq!(schema["properties"]["mixer"]["required"][1], "channels");
    }
}
