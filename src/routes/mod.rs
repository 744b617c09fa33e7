pub mod credits;
pub mod health;

use crate::middleware;
use crate::state::AppState;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

async fn home_redirect() -> axum::response::Redirect {
    axum::response::Redirect::permanent("/credits")
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(_) if origin == "*" => {
                tracing::warn!("wildcard CORS origin is not supported; list origins explicitly");
                None
            }
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(false)
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        // Calculator page
        .route("/", axum::routing::get(home_redirect))
        .route(
            "/credits",
            axum::routing::get(credits::credits_page).post(credits::submit_form),
        )
        // API
        .route("/api/v1/credits/estimate", axum::routing::post(credits::estimate))
        .route("/api/v1/credits/rates", axum::routing::get(credits::rates))
        // Health
        .route("/health", axum::routing::get(health::health_check))
        // Middleware layers (applied bottom-up)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(axum::middleware::from_fn(
            middleware::security_headers::security_headers,
        ))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::Config;
    use crate::pricing::PricingRates;
    use crate::state::AppState;
    use axum::response::Response;
    use axum::Router;

    pub fn state() -> AppState {
        let mut tera = tera::Tera::default();
        tera.add_raw_template(
            super::credits::CALCULATOR_TEMPLATE,
            include_str!("../../templates/credit_calculator.html"),
        )
        .unwrap();

        let config = Config {
            port: 0,
            templates_glob: String::new(),
            allowed_origins: vec!["https://dashboard.example".into()],
            rates: PricingRates::default(),
            rates_source: "defaults".into(),
        };
        AppState::new(config, tera).unwrap()
    }

    pub fn router() -> Router {
        super::build_router(state())
    }

    pub async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::router;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn root_redirects_to_calculator() {
        let resp = router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(resp.headers()[header::LOCATION], "/credits");
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_only() {
        let resp = router()
            .oneshot(
                Request::get("/api/v1/credits/rates")
                    .header(header::ORIGIN, "https://dashboard.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://dashboard.example"
        );

        let resp = router()
            .oneshot(
                Request::get("/api/v1/credits/rates")
                    .header(header::ORIGIN, "https://elsewhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected() {
        let body = format!(
            r#"{{"operation": "ocr", "file_sizes_bytes": [{}1]}}"#,
            "1,".repeat(40_000)
        );
        let resp = router()
            .oneshot(
                Request::post("/api/v1/credits/estimate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, body.len())
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
