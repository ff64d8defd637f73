use std::sync::Arc;

use tabrag_retrieval::RetrievalAnswerer;
use tokio::sync::RwLock;

/// Lifecycle of the query service
///
/// Startup runs once: `Uninitialized` moves to `Ready` or `Degraded` and
/// stays there.
#[derive(Clone)]
pub enum ServiceState {
    Uninitialized,
    Ready(Arc<RetrievalAnswerer>),
    Degraded { reason: String },
}

impl ServiceState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready(_) => "ready",
            Self::Degraded { .. } => "degraded",
        }
    }

    /// Why startup failed, when it did
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Degraded { reason } => Some(reason),
            _ => None,
        }
    }
}

pub struct AppState {
    service: RwLock<ServiceState>,
}

impl AppState {
    pub fn new() -> Self {
        Self { service: RwLock::new(ServiceState::Uninitialized) }
    }

    pub fn ready(answerer: RetrievalAnswerer) -> Self {
        Self { service: RwLock::new(ServiceState::Ready(Arc::new(answerer))) }
    }

    pub fn degraded(reason: impl Into<String>) -> Self {
        Self { service: RwLock::new(ServiceState::Degraded { reason: reason.into() }) }
    }

    /// Current state; the answerer is shared, not copied
    pub async fn current(&self) -> ServiceState {
        self.service.read().await.clone()
    }

    pub async fn set(&self, state: ServiceState) {
        *self.service.write().await = state;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
