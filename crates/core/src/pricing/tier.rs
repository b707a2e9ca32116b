use serde::{Deserialize, Serialize};

const MAX_DISCOUNT_CODE: &str = "nitidofriend";
const AVERAGE_CODE: &str = "nitidobro";

/// Which of the three unit prices applies to every line item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    #[default]
    Ideal,
    Average,
    MaxDiscount,
}

impl PriceTier {
    /// Unknown or empty codes fall back to `Ideal`; there is no error path.
    pub fn resolve(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            MAX_DISCOUNT_CODE => Self::MaxDiscount,
            AVERAGE_CODE => Self::Average,
            _ => Self::Ideal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ideal => "Precio Ideal",
            Self::Average => "Precio Promedio",
            Self::MaxDiscount => "Rebaja Máxima",
        }
    }
}
