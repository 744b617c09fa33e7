//! Lenient parsing of the calculator form's free-text fields.

use super::BYTES_PER_MB;
use super::CreditError;

/// Parse a comma-separated list of megabyte values into byte sizes.
///
/// Tokens that are not numbers, or are zero, negative or non-finite, are
/// dropped without complaint so one typo does not block the estimate.
pub fn parse_megabytes(input: &str) -> Vec<f64> {
    input
        .split(',')
        .filter_map(|token| token.trim().parse::<f64>().ok())
        .filter(|mb| mb.is_finite() && *mb > 0.0)
        .map(megabytes_to_bytes)
        .collect()
}

pub fn megabytes_to_bytes(mb: f64) -> f64 {
    mb * BYTES_PER_MB
}

pub fn bytes_to_megabytes(bytes: f64) -> f64 {
    bytes / BYTES_PER_MB
}

/// Counts come from number inputs but still arrive as text. Unlike file
/// sizes these are required, so a bad value is an error rather than skipped.
pub fn parse_count(argument: &'static str, input: &str) -> Result<u32, CreditError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CreditError::invalid_argument(argument, "is required"));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| {
            CreditError::invalid_argument(argument, format!("`{}` is not a whole number", trimmed))
        })
}

/// Credits as shown to the user: always two decimals.
pub fn format_credits(credits: f64) -> String {
    format!("{:.2}", credits)
}
