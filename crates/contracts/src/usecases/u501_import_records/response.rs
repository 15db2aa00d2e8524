use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// First rows of a parsed file, shown before the user confirms the import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub file_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
    /// Data rows in the whole file
    pub total_rows: usize,
}

/// A data row that was not imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    /// 1-based data row number (the header row is not counted)
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub entity: String,
    pub total_rows: usize,
    pub inserted: usize,
    pub failed: Vec<RowFailure>,
}

impl ImportSummary {
    pub fn new(entity: impl Into<String>, total_rows: usize) -> Self {
        Self {
            entity: entity.into(),
            total_rows,
            ..Default::default()
        }
    }

    pub fn fail(&mut self, row: usize, reason: impl Into<String>) {
        self.failed.push(RowFailure {
            row,
            reason: reason.into(),
        });
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.inserted == self.total_rows
    }
}
