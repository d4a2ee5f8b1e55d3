use crate::config::Config;
use crate::errors::ApiError;
use crate::models::*;
use crate::query::ListParams;
use crate::store::InfluencerStore;
use crate::view::{self, state::FETCH_FAILED_MESSAGE, FetchOutcome, ListViewState, PAGE_SIZE};
use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Influencer storage.
    pub store: Arc<dyn InfluencerStore>,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// ISO-8601 UTC timestamp with millisecond precision.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// GET /api/hello
///
/// Reports whether the JWT secret and database URL are configured. Never
/// returns their values.
pub async fn hello(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "Hello from Fraterny API!",
        "timestamp": timestamp(),
        "status": "success",
        "hasJwtSecret": state.config.has_jwt_secret(),
        "hasDbUrl": state.config.has_database_url(),
    }))
}

/// POST /api/hello
///
/// Echoes any JSON body back. Nothing is stored.
pub async fn echo_hello(body: Bytes) -> Result<Json<Value>, ApiError> {
    let received: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!("Rejected hello body: {}", e);
        ApiError::InvalidJson
    })?;

    Ok(Json(json!({
        "message": "Data received successfully!",
        "received": received,
        "timestamp": timestamp(),
        "status": "success",
    })))
}

/// GET /api/influencers
///
/// Filtered, paginated read, newest first, with the exact match count.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `query` - Raw query string carrying `page`, `limit`, `status` and `search`; the first value of a repeated key wins.
///
/// # Returns
///
/// * `Result<Json<ApiResponse<Vec<Influencer>>>, ApiError>` - The page envelope, or a 500 envelope with empty data.
pub async fn list_influencers(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<ApiResponse<Vec<Influencer>>>, ApiError> {
    let params = ListParams::from_query(query.as_deref());
    tracing::info!("GET /api/influencers - params: {:?}", params);

    let page = state
        .store
        .find(&params.to_query())
        .await
        .map_err(ApiError::FetchFailed)?;

    tracing::info!(
        "Fetched {} influencer(s), {} matching",
        page.rows.len(),
        page.total
    );

    Ok(Json(
        ApiResponse::success(page.rows, "Influencers fetched successfully").with_count(page.total),
    ))
}

/// POST /api/influencers
///
/// Validates the body and inserts one influencer.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `body` - Raw JSON body; a body that does not decode is an unexpected failure (500).
///
/// # Returns
///
/// * `Result<(StatusCode, Json<ApiResponse<Influencer>>), ApiError>` - 201 with the stored row, or an error envelope.
pub async fn create_influencer(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<Influencer>>), ApiError> {
    let request: CreateInfluencerRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Internal(format!("Failed to parse request body: {}", e)))?;

    tracing::info!(
        "POST /api/influencers - email: {:?}, affiliate_code: {:?}",
        request.email,
        request.affiliate_code
    );

    let new = request.validate()?;
    let influencer = state
        .store
        .insert(new)
        .await
        .map_err(ApiError::CreateFailed)?;

    tracing::info!("Influencer {} created", influencer.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            influencer,
            "Influencer created successfully",
        )),
    ))
}

/// GET /influencers
///
/// Server-rendered list view, seeded with the first page for the given filters.
pub async fn influencers_page(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, ApiError> {
    let params = ListParams::from_query(query.as_deref());
    let search = params.search.unwrap_or_default();
    let status = params.status.unwrap_or_default();

    let list_params = ListParams {
        page: None,
        limit: Some(PAGE_SIZE.to_string()),
        status: Some(status.clone()),
        search: Some(search.clone()),
    };

    let mut view_state = ListViewState::new(Some(Vec::new()));
    view_state.set_search_term(search);
    view_state.set_status_filter(status);

    let outcome = match state.store.find(&list_params.to_query()).await {
        Ok(page) => FetchOutcome::Loaded(page.rows),
        Err(e) => {
            tracing::error!("Store error: {}", e);
            FetchOutcome::Rejected(FETCH_FAILED_MESSAGE.to_string())
        }
    };
    view_state.finish_fetch(outcome);

    let html = view::render_html(&view_state)
        .map_err(|e| ApiError::Internal(format!("Failed to render list view: {}", e)))?;
    Ok(Html(html))
}
