use serde::Serialize;

/// Successful answer
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub response: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthResponse {
    pub fn new(status: &'static str) -> Self {
        Self { status, service: "tabrag-api", detail: None }
    }

    pub fn with_detail(mut self, detail: Option<&str>) -> Self {
        self.detail = detail.map(str::to_string);
        self
    }
}
