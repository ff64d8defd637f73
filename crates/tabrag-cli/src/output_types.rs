//! Serializable output shapes shared by the commands

use serde::Serialize;
use tabled::Tabled;
use tabrag_core::formats::{ColumnKind, ColumnProfile};

#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub path: String,
    pub encoding: String,
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
    pub summary: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ColumnRow {
    #[tabled(rename = "Column")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Missing")]
    pub missing: usize,
}

impl From<&ColumnProfile> for ColumnRow {
    fn from(profile: &ColumnProfile) -> Self {
        let kind = match profile.kind {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        };
        Self {
            name: profile.name.clone(),
            kind: kind.to_string(),
            missing: profile.missing,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub question: String,
    pub answer: String,
}
