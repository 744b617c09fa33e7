use serde::{Deserialize, Serialize};

use super::CreditError;

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// Default price list, in credits.
pub const MEDIA_SIMULATION_BASE: f64 = 10.0;
pub const MEDIA_SIMULATION_PER_PERSONA: f64 = 2.0;
pub const MEDIA_SIMULATION_PER_ENVIRONMENT: f64 = 5.0;
pub const MEDIA_SIMULATION_PER_MB: f64 = 0.5;

pub const CONCEPT_SIMULATION_BASE: f64 = 5.0;
pub const CONCEPT_SIMULATION_PER_PERSONA: f64 = 1.0;
pub const CONCEPT_SIMULATION_PER_ENVIRONMENT: f64 = 2.5;

/// OCR with no pages submitted costs exactly this.
pub const OCR_BASE: f64 = 0.0;
pub const OCR_PER_MB: f64 = 0.2;

pub const PERSONA_CLUSTERING_BASE: f64 = 2.0;
pub const PERSONA_CLUSTERING_PER_MB: f64 = 1.0;

pub const PERSONA_CHAT_BASE: f64 = 0.0;
pub const PERSONA_CHAT_PER_PERSONA: f64 = 0.5;
pub const PERSONA_CHAT_FIRST_GENERATION: f64 = 3.0;
pub const PERSONA_CHAT_FOLLOW_UP_MESSAGE: f64 = 0.25;

/// Every tunable weight, as `<operation>.<rate>`.
pub const RATE_NAMES: [&str; 15] = [
    "media_simulation.base",
    "media_simulation.per_persona",
    "media_simulation.per_environment",
    "media_simulation.per_mb",
    "concept_simulation.base",
    "concept_simulation.per_persona",
    "concept_simulation.per_environment",
    "ocr.base",
    "ocr.per_mb",
    "persona_clustering.base",
    "persona_clustering.per_mb",
    "persona_chat.base",
    "persona_chat.per_persona",
    "persona_chat.first_generation",
    "persona_chat.follow_up_message",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSimulationRates {
    pub base: f64,
    pub per_persona: f64,
    pub per_environment: f64,
    pub per_mb: f64,
}

impl Default for MediaSimulationRates {
    fn default() -> Self {
        Self {
            base: MEDIA_SIMULATION_BASE,
            per_persona: MEDIA_SIMULATION_PER_PERSONA,
            per_environment: MEDIA_SIMULATION_PER_ENVIRONMENT,
            per_mb: MEDIA_SIMULATION_PER_MB,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptSimulationRates {
    pub base: f64,
    pub per_persona: f64,
    pub per_environment: f64,
}

impl Default for ConceptSimulationRates {
    fn default() -> Self {
        Self {
            base: CONCEPT_SIMULATION_BASE,
            per_persona: CONCEPT_SIMULATION_PER_PERSONA,
            per_environment: CONCEPT_SIMULATION_PER_ENVIRONMENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrRates {
    pub base: f64,
    pub per_mb: f64,
}

impl Default for OcrRates {
    fn default() -> Self {
        Self {
            base: OCR_BASE,
            per_mb: OCR_PER_MB,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaClusteringRates {
    pub base: f64,
    pub per_mb: f64,
}

impl Default for PersonaClusteringRates {
    fn default() -> Self {
        Self {
            base: PERSONA_CLUSTERING_BASE,
            per_mb: PERSONA_CLUSTERING_PER_MB,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaChatRates {
    pub base: f64,
    pub per_persona: f64,
    pub first_generation: f64,
    pub follow_up_message: f64,
}

impl Default for PersonaChatRates {
    fn default() -> Self {
        Self {
            base: PERSONA_CHAT_BASE,
            per_persona: PERSONA_CHAT_PER_PERSONA,
            first_generation: PERSONA_CHAT_FIRST_GENERATION,
            follow_up_message: PERSONA_CHAT_FOLLOW_UP_MESSAGE,
        }
    }
}

/// The full price list. Deserializes from partial JSON; anything left out
/// keeps its default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRates {
    pub media_simulation: MediaSimulationRates,
    pub concept_simulation: ConceptSimulationRates,
    pub ocr: OcrRates,
    pub persona_clustering: PersonaClusteringRates,
    pub persona_chat: PersonaChatRates,
}

impl PricingRates {
    /// Look up a weight by its `<operation>.<rate>` name.
    pub fn get(&self, name: &str) -> Option<f64> {
        let mut copy = *self;
        copy.slot(name).map(|v| *v)
    }

    /// Overwrite a single weight. The table is not re-validated here.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), CreditError> {
        let slot = self.slot(name).ok_or_else(|| CreditError::InvalidRate {
            rate: name.to_string(),
            reason: "no such rate".into(),
        })?;
        *slot = value;
        Ok(())
    }

    /// Every weight must be finite and non-negative, and a first chat
    /// generation may not be cheaper than a follow-up message.
    pub fn validate(&self) -> Result<(), CreditError> {
        for name in RATE_NAMES {
            let value = self.get(name).unwrap_or(f64::NAN);
            if !value.is_finite() {
                return Err(CreditError::InvalidRate {
                    rate: name.to_string(),
                    reason: format!("{} is not a finite number", value),
                });
            }
            if value < 0.0 {
                return Err(CreditError::InvalidRate {
                    rate: name.to_string(),
                    reason: format!("{} is negative", value),
                });
            }
        }

        let chat = &self.persona_chat;
        if chat.first_generation < chat.follow_up_message {
            return Err(CreditError::InvalidRate {
                rate: "persona_chat.first_generation".into(),
                reason: format!(
                    "{} is below persona_chat.follow_up_message ({})",
                    chat.first_generation, chat.follow_up_message
                ),
            });
        }

        Ok(())
    }

    fn slot(&mut self, name: &str) -> Option<&mut f64> {
        let slot = match name {
            "media_simulation.base" => &mut self.media_simulation.base,
            "media_simulation.per_persona" => &mut self.media_simulation.per_persona,
            "media_simulation.per_environment" => &mut self.media_simulation.per_environment,
            "media_simulation.per_mb" => &mut self.media_simulation.per_mb,
            "concept_simulation.base" => &mut self.concept_simulation.base,
            "concept_simulation.per_persona" => &mut self.concept_simulation.per_persona,
            "concept_simulation.per_environment" => &mut self.concept_simulation.per_environment,
            "ocr.base" => &mut self.ocr.base,
            "ocr.per_mb" => &mut self.ocr.per_mb,
            "persona_clustering.base" => &mut self.persona_clustering.base,
            "persona_clustering.per_mb" => &mut self.persona_clustering.per_mb,
            "persona_chat.base" => &mut self.persona_chat.base,
            "persona_chat.per_persona" => &mut self.persona_chat.per_persona,
            "persona_chat.first_generation" => &mut self.persona_chat.first_generation,
            "persona_chat.follow_up_message" => &mut self.persona_chat.follow_up_message,
            _ => return None,
        };
        Some(slot)
    }
}

/// Environment variable that overrides a named rate,
/// e.g. `ocr.per_mb` -> `CREDITS_OCR_PER_MB`.
pub fn env_var_for(name: &str) -> String {
    format!("CREDITS_{}", name.replace('.', "_").to_uppercase())
}
