use serde::Deserialize;

/// Ask request body
///
/// `query` is optional at the serde level so a missing field reaches
/// validation instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: Option<String>,
}
