use serde::{Deserialize, Serialize};

/// Action identifier plus the selected record ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRequest {
    pub action: String,
    pub ids: Vec<String>,
}
