use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub id: String,
    pub reason: String,
}

/// Result of a remote-mutating bulk action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub action: String,
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn ok(&mut self, id: impl Into<String>) {
        self.succeeded.push(id.into());
    }

    pub fn fail(&mut self, id: impl Into<String>, reason: impl Into<String>) {
        self.failed.push(BulkFailure {
            id: id.into(),
            reason: reason.into(),
        });
    }
}
