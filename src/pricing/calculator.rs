use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::rates::{PricingRates, BYTES_PER_MB};
use super::CreditError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    MediaSimulation,
    ConceptSimulation,
    Ocr,
    PersonaClustering,
    PersonaChat,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::MediaSimulation,
        Operation::ConceptSimulation,
        Operation::Ocr,
        Operation::PersonaClustering,
        Operation::PersonaChat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::MediaSimulation => "media_simulation",
            Operation::ConceptSimulation => "concept_simulation",
            Operation::Ocr => "ocr",
            Operation::PersonaClustering => "persona_clustering",
            Operation::PersonaChat => "persona_chat",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Operation::MediaSimulation => "Media simulation",
            Operation::ConceptSimulation => "Concept simulation",
            Operation::Ocr => "OCR",
            Operation::PersonaClustering => "Persona clustering",
            Operation::PersonaChat => "Persona chat",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CreditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s.trim())
            .ok_or_else(|| CreditError::UnknownOperation(s.to_string()))
    }
}

/// One priced workload. File sizes are in bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum CreditRequest {
    MediaSimulation {
        persona_count: u32,
        environment_count: u32,
        #[serde(default)]
        file_sizes_bytes: Vec<f64>,
    },
    ConceptSimulation {
        persona_count: u32,
        environment_count: u32,
    },
    Ocr {
        #[serde(default)]
        file_sizes_bytes: Vec<f64>,
    },
    PersonaClustering {
        file_size_bytes: f64,
    },
    PersonaChat {
        persona_count: u32,
        #[serde(default)]
        first_generation: bool,
    },
}

impl CreditRequest {
    pub fn operation(&self) -> Operation {
        match self {
            CreditRequest::MediaSimulation { .. } => Operation::MediaSimulation,
            CreditRequest::ConceptSimulation { .. } => Operation::ConceptSimulation,
            CreditRequest::Ocr { .. } => Operation::Ocr,
            CreditRequest::PersonaClustering { .. } => Operation::PersonaClustering,
            CreditRequest::PersonaChat { .. } => Operation::PersonaChat,
        }
    }
}

/// Turns usage parameters into a credit amount.
///
/// Holds nothing but an immutable, validated rate table, so a single instance
/// can be shared freely between threads. Each term of a price is
/// `weight * quantity`; terms are summed base first, then personas,
/// environments and file size.
#[derive(Debug, Clone, Default)]
pub struct CreditCalculator {
    rates: PricingRates,
}

impl CreditCalculator {
    pub fn new(rates: PricingRates) -> Result<Self, CreditError> {
        rates.validate()?;
        Ok(Self { rates })
    }

    pub fn rates(&self) -> &PricingRates {
        &self.rates
    }

    pub fn estimate(&self, request: &CreditRequest) -> Result<f64, CreditError> {
        match request {
            CreditRequest::MediaSimulation {
                persona_count,
                environment_count,
                file_sizes_bytes,
            } => self.media_simulation(*persona_count, file_sizes_bytes, *environment_count),
            CreditRequest::ConceptSimulation {
                persona_count,
                environment_count,
            } => self.concept_simulation(*persona_count, *environment_count),
            CreditRequest::Ocr { file_sizes_bytes } => self.ocr(file_sizes_bytes),
            CreditRequest::PersonaClustering { file_size_bytes } => {
                self.persona_clustering(*file_size_bytes)
            }
            CreditRequest::PersonaChat {
                persona_count,
                first_generation,
            } => self.persona_chat(*persona_count, *first_generation),
        }
    }

    pub fn media_simulation(
        &self,
        persona_count: u32,
        file_sizes_bytes: &[f64],
        environment_count: u32,
    ) -> Result<f64, CreditError> {
        let rates = &self.rates.media_simulation;
        let personas = count("persona_count", persona_count)?;
        let environments = count("environment_count", environment_count)?;
        let megabytes = total_megabytes("file_sizes_bytes", file_sizes_bytes)?;

        Ok(rates.base
            + rates.per_persona * personas
            + rates.per_environment * environments
            + rates.per_mb * megabytes)
    }

    pub fn concept_simulation(
        &self,
        persona_count: u32,
        environment_count: u32,
    ) -> Result<f64, CreditError> {
        let rates = &self.rates.concept_simulation;
        let personas = count("persona_count", persona_count)?;
        let environments = count("environment_count", environment_count)?;

        Ok(rates.base + rates.per_persona * personas + rates.per_environment * environments)
    }

    /// An empty batch costs `ocr.base`.
    pub fn ocr(&self, file_sizes_bytes: &[f64]) -> Result<f64, CreditError> {
        let rates = &self.rates.ocr;
        let megabytes = total_megabytes("file_sizes_bytes", file_sizes_bytes)?;

        Ok(rates.base + rates.per_mb * megabytes)
    }

    pub fn persona_clustering(&self, file_size_bytes: f64) -> Result<f64, CreditError> {
        let rates = &self.rates.persona_clustering;
        let megabytes = size_megabytes("file_size_bytes", file_size_bytes)?;

        Ok(rates.base + rates.per_mb * megabytes)
    }

    pub fn persona_chat(
        &self,
        persona_count: u32,
        first_generation: bool,
    ) -> Result<f64, CreditError> {
        let rates = &self.rates.persona_chat;
        let personas = count("persona_count", persona_count)?;
        let generation = if first_generation {
            rates.first_generation
        } else {
            rates.follow_up_message
        };

        Ok(rates.base + rates.per_persona * personas + generation)
    }
}

fn count(argument: &'static str, value: u32) -> Result<f64, CreditError> {
    if value == 0 {
        return Err(CreditError::invalid_argument(argument, "must be at least 1"));
    }
    Ok(f64::from(value))
}

fn size_megabytes(argument: &'static str, bytes: f64) -> Result<f64, CreditError> {
    if !bytes.is_finite() {
        return Err(CreditError::invalid_argument(
            argument,
            format!("{} is not a finite byte count", bytes),
        ));
    }
    if bytes < 0.0 {
        return Err(CreditError::invalid_argument(
            argument,
            format!("{} is negative", bytes),
        ));
    }
    Ok(bytes / BYTES_PER_MB)
}

fn total_megabytes(argument: &'static str, sizes: &[f64]) -> Result<f64, CreditError> {
    sizes
        .iter()
        .try_fold(0.0, |total, &bytes| Ok(total + size_megabytes(argument, bytes)?))
}
