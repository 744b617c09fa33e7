use axum::extract::State;
use axum::response::Html;
use axum::{Form, Json};
use serde_json::json;

use crate::error::AppError;
use crate::models::{CalculatorForm, EstimateResponse};
use crate::pricing::sanitize::{bytes_to_megabytes, format_credits, parse_count, parse_megabytes};
use crate::pricing::{CreditError, CreditRequest, Operation, PricingRates};
use crate::state::AppState;

pub const CALCULATOR_TEMPLATE: &str = "credit_calculator.html";

fn page_context(form: &CalculatorForm) -> tera::Context {
    let operations: Vec<serde_json::Value> = Operation::ALL
        .iter()
        .map(|op| json!({ "value": op.as_str(), "label": op.label() }))
        .collect();

    let mut ctx = tera::Context::new();
    ctx.insert("operations", &operations);
    ctx.insert("form", form);
    ctx
}

/// Turn the free-text form into a calculator request. File sizes are
/// filtered leniently; counts and the operation are not.
pub fn request_from_form(form: &CalculatorForm) -> Result<CreditRequest, CreditError> {
    let operation: Operation = form.operation.parse()?;
    let file_sizes_bytes = parse_megabytes(&form.file_sizes_mb);

    let request = match operation {
        Operation::MediaSimulation => CreditRequest::MediaSimulation {
            persona_count: parse_count("persona_count", &form.persona_count)?,
            environment_count: parse_count("environment_count", &form.environment_count)?,
            file_sizes_bytes,
        },
        Operation::ConceptSimulation => CreditRequest::ConceptSimulation {
            persona_count: parse_count("persona_count", &form.persona_count)?,
            environment_count: parse_count("environment_count", &form.environment_count)?,
        },
        Operation::Ocr => CreditRequest::Ocr { file_sizes_bytes },
        Operation::PersonaClustering => {
            // Clustering prices one data file; extra entries are ignored.
            let file_size_bytes = file_sizes_bytes.first().copied().ok_or_else(|| {
                CreditError::invalid_argument("file_sizes_mb", "a data file size is required")
            })?;
            CreditRequest::PersonaClustering { file_size_bytes }
        }
        Operation::PersonaChat => CreditRequest::PersonaChat {
            persona_count: parse_count("persona_count", &form.persona_count)?,
            first_generation: form.first_generation.is_some(),
        },
    };
    Ok(request)
}

pub async fn credits_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let form = CalculatorForm {
        operation: Operation::MediaSimulation.to_string(),
        persona_count: "1".into(),
        environment_count: "1".into(),
        ..Default::default()
    };
    let html = state.tera.render(CALCULATOR_TEMPLATE, &page_context(&form))?;
    Ok(Html(html))
}

/// Form posts always re-render the page; bad input shows up as a message
/// next to the form rather than an error status.
pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<CalculatorForm>,
) -> Result<Html<String>, AppError> {
    let mut ctx = page_context(&form);

    let outcome = request_from_form(&form).and_then(|request| {
        let credits = state.calculator.estimate(&request)?;
        Ok((request, credits))
    });

    match outcome {
        Ok((request, credits)) => {
            tracing::debug!(operation = %request.operation(), credits, "form estimate");
            if let CreditRequest::MediaSimulation { file_sizes_bytes, .. }
            | CreditRequest::Ocr { file_sizes_bytes } = &request
            {
                let accepted: Vec<String> = file_sizes_bytes
                    .iter()
                    .map(|b| bytes_to_megabytes(*b).to_string())
                    .collect();
                ctx.insert("accepted_sizes_mb", &accepted.join(", "));
            }
            ctx.insert("result", &format_credits(credits));
        }
        Err(e) => {
            tracing::warn!(operation = %form.operation, error = %e, "form estimate rejected");
            ctx.insert("error", &e.to_string());
        }
    }

    let html = state.tera.render(CALCULATOR_TEMPLATE, &ctx)?;
    Ok(Html(html))
}

/// POST /api/v1/credits/estimate
pub async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<CreditRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let credits = state.calculator.estimate(&request)?;
    tracing::debug!(operation = %request.operation(), credits, "api estimate");

    Ok(Json(EstimateResponse {
        operation: request.operation(),
        credits,
        display: format_credits(credits),
    }))
}

/// GET /api/v1/credits/rates
pub async fn rates(State(state): State<AppState>) -> Json<PricingRates> {
    Json(*state.calculator.rates())
}
