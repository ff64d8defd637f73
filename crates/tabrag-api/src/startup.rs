use std::sync::Arc;

use tabrag_core::error::Result;
use tabrag_retrieval::{prepare, Prepared};

use crate::config::ApiConfig;
use crate::state::{AppState, ServiceState};

/// Run the one-time startup sequence and record its outcome in `state`
pub async fn initialize(state: &AppState, api_config: &ApiConfig) {
    let outcome = match api_config.load_layered() {
        Ok(config) => prepare(&config).await,
        Err(e) => Err(e),
    };
    apply(state, outcome).await;
}

/// Move `state` to Ready or Degraded; a failure is logged here and nowhere else
pub async fn apply(state: &AppState, outcome: Result<Prepared>) {
    match outcome {
        Ok(prepared) => {
            let build = &prepared.build;
            tracing::info!(
                documents = build.document_count,
                embedded = build.embedded,
                reused = build.reused,
                embedding_dim = build.embedding_dim,
                index_hash = %build.index_hash,
                "Service ready"
            );
            state.set(ServiceState::Ready(Arc::new(prepared.answerer))).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Error initializing the application");
            state.set(ServiceState::Degraded { reason: e.to_string() }).await;
        }
    }
}
