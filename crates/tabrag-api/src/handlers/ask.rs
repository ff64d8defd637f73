use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::dto::{AskRequest, AskResponse};
use crate::error::ApiError;
use crate::services::QueryService;
use crate::state::AppState;

pub async fn handle_ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected ask payload");
        ApiError::unprocessable(rejection.body_text())
    })?;

    tracing::info!(
        query_len = request.query.as_deref().map(str::len).unwrap_or(0),
        "Processing ask request"
    );

    let response = QueryService::ask(&state, &request).await?;

    Ok(Json(response))
}
