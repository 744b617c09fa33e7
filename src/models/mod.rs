use serde::{Deserialize, Serialize};

use crate::pricing::Operation;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub rates_loaded_from: String,
    pub uptime_seconds: u64,
}

// --- Credits ---
#[derive(Debug, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub operation: Operation,
    pub credits: f64,
    /// `credits` rounded for display.
    pub display: String,
}

/// Raw calculator form. Everything arrives as text and goes through the
/// sanitizer before it reaches the calculator.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CalculatorForm {
    pub operation: String,
    #[serde(default)]
    pub persona_count: String,
    #[serde(default)]
    pub environment_count: String,
    #[serde(default)]
    pub file_sizes_mb: String,
    /// Checkbox: present as `on` when ticked, absent otherwise.
    #[serde(default)]
    pub first_generation: Option<String>,
}
