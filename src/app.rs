use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::Config;
use crate::handlers::{self, AppState};

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Serves the OpenAPI specification YAML file.
///
/// Reads `openapi.yml` from the working directory; 404 when it is missing.
async fn serve_openapi_spec() -> impl IntoResponse {
    match tokio::fs::read_to_string("openapi.yml").await {
        Ok(content) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/yaml")],
            content,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "OpenAPI spec not found").into_response(),
    }
}

/// Serves the Swagger UI page, pointed at [`serve_openapi_spec`].
async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Fraterny Affiliates API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.yml",
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

/// Routes subject to rate limiting in production.
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // API Documentation
        .route("/docs", get(serve_swagger_ui))
        .route("/api-docs/openapi.yml", get(serve_openapi_spec))
        // API endpoints
        .route("/api/hello", get(handlers::hello).post(handlers::echo_hello))
        .route(
            "/api/influencers",
            get(handlers::list_influencers).post(handlers::create_influencer),
        )
        // List view
        .route("/influencers", get(handlers::influencers_page))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

/// All routes without rate limiting or transport middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes())
        .with_state(state)
}

/// Milliseconds between quota refills for a sustained `per_second` rate.
///
/// The governor builder takes the refill period, not a rate.
fn replenish_interval_ms(per_second: u64) -> u64 {
    (1000 / per_second.max(1)).max(1)
}

/// The production application: rate-limited API routes, tracing and CORS.
///
/// The rate limiter keys on the client IP, so the server must be run with
/// connect info (`into_make_service_with_connect_info`).
pub fn app(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(replenish_interval_ms(config.rate_limit_per_second))
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let protected_routes = api_routes().layer(ServiceBuilder::new().layer(GovernorLayer {
        config: governor_conf,
    }));

    // Health check bypasses rate limiting
    Ok(Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}
