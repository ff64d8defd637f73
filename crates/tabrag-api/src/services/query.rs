use tabrag_core::models::Query;

use crate::dto::{AskRequest, AskResponse};
use crate::error::ApiError;
use crate::state::{AppState, ServiceState};

/// Service for answering questions
pub struct QueryService;

impl QueryService {
    /// Validate the request, then answer it if the service is ready
    pub async fn ask(state: &AppState, request: &AskRequest) -> Result<AskResponse, ApiError> {
        let query = Query::parse(request.query.as_deref())?;

        let answerer = match state.current().await {
            ServiceState::Ready(answerer) => answerer,
            ServiceState::Uninitialized | ServiceState::Degraded { .. } => {
                return Err(ApiError::not_initialized());
            }
        };

        let answer = answerer.answer(&query).await.map_err(|e| {
            tracing::error!(error = %e, retryable = e.is_retryable(), "Answering failed");
            ApiError::from(e)
        })?;

        Ok(AskResponse { response: answer.text })
    }
}
