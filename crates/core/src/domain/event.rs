use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VenueType {
    #[default]
    Indoor,
    Outdoor,
}

impl VenueType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Indoor => "Interior",
            Self::Outdoor => "Exterior",
        }
    }

    /// Acoustic profiles offered for this venue, first one is the default.
    pub fn acoustic_options(self) -> &'static [AcousticProfile] {
        match self {
            Self::Indoor => &[
                AcousticProfile::Neutral,
                AcousticProfile::Reverberant,
                AcousticProfile::Dampened,
            ],
            Self::Outdoor => &[
                AcousticProfile::OpenSpace,
                AcousticProfile::Urban,
                AcousticProfile::NaturalAbsorption,
            ],
        }
    }

    pub fn default_acoustics(self) -> AcousticProfile {
        self.acoustic_options()[0]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcousticProfile {
    #[default]
    Neutral,
    Reverberant,
    Dampened,
    OpenSpace,
    Urban,
    NaturalAbsorption,
}

impl AcousticProfile {
    pub fn venue_type(self) -> VenueType {
        match self {
            Self::Neutral | Self::Reverberant | Self::Dampened => VenueType::Indoor,
            Self::OpenSpace | Self::Urban | Self::NaturalAbsorption => VenueType::Outdoor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Neutral => "Neutral (Habitación amueblada)",
            Self::Reverberant => "Reverberante (Hormigón, vidrio)",
            Self::Dampened => "Absorbente (Cortinas, alfombras)",
            Self::OpenSpace => "Espacio Abierto (Sin obstáculos)",
            Self::Urban => "Urbano (Edificios cercanos)",
            Self::NaturalAbsorption => "Natural (Árboles, césped)",
        }
    }

    /// Longer wording used when briefing the recommendation model.
    pub fn description(self) -> &'static str {
        match self {
            Self::Reverberant => "Reverberante (ej. hormigón, vidrio, sala vacía)",
            Self::Neutral => "Neutral (ej. habitación amueblada, algunas superficies blandas)",
            Self::Dampened => "Absorbente (ej. cortinas, alfombras, paneles acústicos)",
            Self::OpenSpace => {
                "Espacio Abierto (sin obstrucciones, el sonido se disipa libremente)"
            }
            Self::Urban => "Urbano (con edificios cercanos que pueden causar reflejos y eco)",
            Self::NaturalAbsorption => {
                "Absorción Natural (cerca de árboles, césped o agua, que absorben el sonido)"
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MusicStyle {
    #[default]
    ElectronicDance,
    PopRock,
    HipHopUrban,
    AcousticFolk,
    JazzBlues,
    SpeechConference,
}

impl MusicStyle {
    pub fn slug(self) -> &'static str {
        match self {
            Self::ElectronicDance => "electronic-dance",
            Self::PopRock => "pop-rock",
            Self::HipHopUrban => "hip-hop-urban",
            Self::AcousticFolk => "acoustic-folk",
            Self::JazzBlues => "jazz-blues",
            Self::SpeechConference => "speech-conference",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ElectronicDance => "Electrónica",
            Self::PopRock => "Pop / Rock en vivo",
            Self::HipHopUrban => "Hip-Hop / Urbano",
            Self::AcousticFolk => "Acústico / Folk",
            Self::JazzBlues => "Jazz / Blues",
            Self::SpeechConference => "Discursos / Conferencias",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VenueDimensions {
    pub width_m: f64,
    pub length_m: f64,
    pub height_m: f64,
}

impl Default for VenueDimensions {
    fn default() -> Self {
        Self { width_m: 10.0, length_m: 15.0, height_m: 3.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventParameters {
    pub venue_type: VenueType,
    pub dimensions: VenueDimensions,
    pub acoustics: AcousticProfile,
    pub guest_count: u32,
    pub music_style: MusicStyle,
    #[serde(default)]
    pub max_db: Option<u32>,
}

impl Default for EventParameters {
    fn default() -> Self {
        Self {
            venue_type: VenueType::Indoor,
            dimensions: VenueDimensions::default(),
            acoustics: AcousticProfile::Neutral,
            guest_count: 100,
            music_style: MusicStyle::ElectronicDance,
            max_db: None,
        }
    }
}

impl EventParameters {
    /// Switching venue type resets acoustics to the new venue's first option.
    pub fn set_venue_type(&mut self, venue_type: VenueType) {
        self.venue_type = venue_type;
        self.acoustics = venue_type.default_acoustics();
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let VenueDimensions { width_m, length_m, height_m } = self.dimensions;
        for (name, value) in [("width", width_m), ("length", length_m), ("height", height_m)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DomainError::InvalidEventParameters(format!(
                    "venue {name} must be a positive number of meters"
                )));
            }
        }

        if self.guest_count == 0 {
            return Err(DomainError::InvalidEventParameters(
                "guest count must be at least 1".to_string(),
            ));
        }

        if self.acoustics.venue_type() != self.venue_type {
            return Err(DomainError::InvalidEventParameters(format!(
                "acoustic profile `{:?}` does not apply to {} venues",
                self.acoustics,
                self.venue_type.label().to_lowercase()
            )));
        }

        if self.max_db == Some(0) {
            return Err(DomainError::InvalidEventParameters(
                "dB restriction must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
