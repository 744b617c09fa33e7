//! Credit pricing for simulation, OCR, clustering and chat workloads.
//!
//! Everything in here is pure arithmetic over a [`PricingRates`] table. Callers
//! that take raw text from a form go through [`sanitize`] first; the engine
//! itself rejects malformed numbers instead of guessing.

pub mod calculator;
pub mod rates;
pub mod sanitize;

pub use calculator::{CreditCalculator, CreditRequest, Operation};
pub use rates::{PricingRates, BYTES_PER_MB};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CreditError {
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    #[error("invalid rate `{rate}`: {reason}")]
    InvalidRate { rate: String, reason: String },

    #[error("unknown operation `{0}`")]
    UnknownOperation(String),
}

impl CreditError {
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        CreditError::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }
}
