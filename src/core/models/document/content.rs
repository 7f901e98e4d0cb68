//! Editable body of a process document

use serde::{Deserialize, Serialize};

/// Everything that may only change while the document is a draft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
    #[serde(default)]
    pub process_groups: Vec<ProcessGroup>,
    #[serde(default)]
    pub annexes: Vec<Annex>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub implicated_actors: Vec<String>,
    #[serde(default)]
    pub management_rules: Vec<String>,
    #[serde(default)]
    pub terminology: Vec<String>,
    #[serde(default)]
    pub change_history: Vec<ChangeHistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeHistoryEntry {
    pub version: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub author: String,
    pub description: String,
}

/// Major group of process steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessGroup {
    pub id: String,
    pub title: String,
    pub order: i32,
    #[serde(default)]
    pub process_steps: Vec<ProcessStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStep {
    pub id: String,
    pub title: String,
    pub order: i32,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub durations: Vec<String>,
    #[serde(default)]
    pub responsible: String,
    #[serde(default)]
    pub descriptions: Vec<ProcessDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDescription {
    pub title: String,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub order: i32,
    #[serde(default)]
    pub output_index: i32,
    #[serde(default)]
    pub duration_index: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnexType {
    Diagram,
    Table,
    Text,
    File,
}

/// Appendix section; the body shape depends on the annex type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annex {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub annex_type: AnnexType,
    #[serde(default)]
    pub content: serde_json::Value,
    pub order: i32,
}
