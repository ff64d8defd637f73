use serde::{Deserialize, Serialize};

use crate::error::{Result, TabragError};

/// A validated user question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    question: String,
}

impl Query {
    /// Validate raw input into a query. Whitespace-only input is rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Err(TabragError::validation("query is required"));
        };

        let question = raw.trim();
        if question.is_empty() {
            return Err(TabragError::validation("query must be a non-empty string"));
        }

        Ok(Self { question: question.to_string() })
    }

    pub fn question(&self) -> &str {
        &self.question
    }
}

/// Generated answer, returned verbatim from the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
}
