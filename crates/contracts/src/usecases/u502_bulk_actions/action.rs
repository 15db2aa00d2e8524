//! Bulk action identifiers as sent by the list pages.
//!
//! Orders use `snake_case` ids (`update_status_shipped`, `assign_line_line_b`),
//! products and customers the dashed forms of their own panels.

use crate::enums::{AccountStatus, OrderPriority, OrderStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum OrderBulkAction {
    UpdateStatus(OrderStatus),
    /// Display name of the line, e.g. `Line A`
    AssignLine(String),
    SetPriority(OrderPriority),
    Export,
    Duplicate,
    Delete,
}

impl OrderBulkAction {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "export" => return Some(Self::Export),
            "duplicate" => return Some(Self::Duplicate),
            "delete" => return Some(Self::Delete),
            _ => {}
        }
        if let Some(status) = code.strip_prefix("update_status_") {
            return OrderStatus::from_code(status).map(Self::UpdateStatus);
        }
        if let Some(line) = code.strip_prefix("assign_line_") {
            // line_a -> Line A
            let letter = line.strip_prefix("line_")?;
            return match letter {
                "a" | "b" | "c" => Some(Self::AssignLine(format!(
                    "Line {}",
                    letter.to_ascii_uppercase()
                ))),
                _ => None,
            };
        }
        if let Some(priority) = code.strip_prefix("priority_") {
            return OrderPriority::from_code(priority).map(Self::SetPriority);
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductBulkAction {
    /// Relative base price change in percent
    AdjustPrice(f64),
    ChangeCategory(String),
    Export,
    Duplicate,
    Delete,
}

impl ProductBulkAction {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "export-data" | "export" => return Some(Self::Export),
            "duplicate" => return Some(Self::Duplicate),
            "delete" => return Some(Self::Delete),
            _ => {}
        }
        if let Some(percent) = code.strip_prefix("update-price:") {
            return percent
                .trim()
                .trim_end_matches('%')
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .map(Self::AdjustPrice);
        }
        if let Some(category) = code.strip_prefix("change-category:") {
            let category = category.trim();
            return (!category.is_empty()).then(|| Self::ChangeCategory(category.to_string()));
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerBulkAction {
    UpdateStatus(AccountStatus),
    Export,
    Delete,
}

impl CustomerBulkAction {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "export" => Some(Self::Export),
            "delete" => Some(Self::Delete),
            _ => code
                .strip_prefix("update-status-")
                .and_then(AccountStatus::from_code)
                .map(Self::UpdateStatus),
        }
    }
}
