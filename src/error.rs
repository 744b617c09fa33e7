use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::pricing::CreditError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("{0}")]
    Credit(#[from] CreditError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Credit(_) => StatusCode::BAD_REQUEST,
            AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(%status, error = %self);
        } else {
            tracing::warn!(%status, error = %self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_errors_are_client_errors() {
        let err: AppError =
            CreditError::invalid_argument("persona_count", "must be at least 1").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "invalid argument `persona_count`: must be at least 1"
        );
    }

    #[test]
    fn template_errors_are_server_errors() {
        let err: AppError = tera::Error::msg("missing template").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
