use serde::{Deserialize, Serialize};

use crate::usecases::common::UseCaseMetadata;

/// Reports offered by the reports dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Sales,
    Production,
    /// Listed in the dialog but not produced yet
    Inventory,
}

impl ReportKind {
    pub fn code(&self) -> &'static str {
        match self {
            ReportKind::Sales => "sales",
            ReportKind::Production => "production",
            ReportKind::Inventory => "inventory",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Sales => "Sales Report",
            ReportKind::Production => "Production Status Report",
            ReportKind::Inventory => "Inventory Report",
        }
    }

    /// Download name without extension
    pub fn file_stem(&self) -> &'static str {
        match self {
            ReportKind::Sales => "sales_report",
            ReportKind::Production => "production_report",
            ReportKind::Inventory => "inventory_report",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "sales" => Some(ReportKind::Sales),
            "production" => Some(ReportKind::Production),
            "inventory" => Some(ReportKind::Inventory),
            _ => None,
        }
    }
}

pub struct GenerateReport;

impl UseCaseMetadata for GenerateReport {
    fn usecase_index() -> &'static str {
        "u503"
    }

    fn usecase_name() -> &'static str {
        "generate_report"
    }

    fn display_name() -> &'static str {
        "Reports"
    }
}
