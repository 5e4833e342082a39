//! Gateway routes

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use axum_extra::{TypedHeader, headers::Cookie};
use serde::Serialize;
use serde_json::json;
use session::SessionRecord;
use tracing::debug;

use artwork::ArtworkRecord;

use crate::{
    error::{GatewayError, GatewayResult},
    middleware::{cors_layer, trace_layer},
    state::AppState,
};

/// Create the router for the gateway service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/all-client-data", get(all_client_data))
        .route("/artwork/:artwork_id", get(get_artwork))
        .layer(trace_layer())
        .layer(cors_layer())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gateway"
    }))
}

/// Session of the calling user, resolved from the legacy session cookie
pub async fn all_client_data(
    State(state): State<AppState>,
    cookies: Option<TypedHeader<Cookie>>,
) -> GatewayResult<Json<SessionRecord>> {
    let cookie = cookies
        .as_ref()
        .and_then(|TypedHeader(cookies)| cookies.get(&state.cookie_name));

    let record = state.sessions.load(cookie).await?;
    debug!("Resolved session of user {}", record.id);

    Ok(Json(record))
}

#[derive(Serialize)]
pub struct ArtworkResponse {
    pub data: ArtworkRecord,
}

pub async fn get_artwork(
    State(state): State<AppState>,
    Path(artwork_id): Path<String>,
) -> GatewayResult<Json<ArtworkResponse>> {
    let record = state
        .artworks
        .fetch_artwork(&artwork_id)
        .await
        .map_err(|source| GatewayError::artwork(&artwork_id, source))?;

    Ok(Json(ArtworkResponse { data: record }))
}
