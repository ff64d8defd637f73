use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let current = state.current().await;
    Json(HealthResponse::new(current.label()).with_detail(current.detail()))
}
