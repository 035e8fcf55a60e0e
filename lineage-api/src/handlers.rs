//! Request handlers: thin functions that extract state/body, call into the
//! library crate, and map the result through `ApiResult`.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use lineage_engine::engine::CancellationToken;
use lineage_engine::{run_traversal, TraversalRequest, TraversalResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn traverse(
    State(state): State<AppState>,
    request: Result<Json<TraversalRequest>, JsonRejection>,
) -> ApiResult<Json<TraversalResponse>> {
    let Json(request) = request.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let cancel = CancellationToken::new();
    let response = run_traversal(&state.registry, state.adapter.as_ref(), &request, &cancel)?;
    Ok(Json(response))
}
