use serde::{Deserialize, Serialize};

/// Production stage health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageStatus {
    OnTime,
    Delayed,
    Blocked,
}

impl StageStatus {
    pub fn code(&self) -> &'static str {
        match self {
            StageStatus::OnTime => "on-time",
            StageStatus::Delayed => "delayed",
            StageStatus::Blocked => "blocked",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StageStatus::OnTime => "On Time",
            StageStatus::Delayed => "Delayed",
            StageStatus::Blocked => "Blocked",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "on-time" => Some(StageStatus::OnTime),
            "delayed" => Some(StageStatus::Delayed),
            "blocked" => Some(StageStatus::Blocked),
            _ => None,
        }
    }
}

impl Default for StageStatus {
    fn default() -> Self {
        StageStatus::OnTime
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
