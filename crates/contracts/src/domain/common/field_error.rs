use serde::{Deserialize, Serialize};
use std::fmt;

/// One failed check of a draft, reported next to the form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collects every failed check so a form can show them all at once
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.0.push(FieldError::new(field, message));
        }
    }

    pub fn require_text(&mut self, value: &str, field: &str, label: &str) {
        self.check(
            !value.trim().is_empty(),
            field,
            &format!("{} is required", label),
        );
    }

    pub fn require_non_negative(&mut self, value: f64, field: &str, label: &str) {
        self.check(
            value.is_finite() && value >= 0.0,
            field,
            &format!("{} must be a number >= 0", label),
        );
    }

    /// Non-negative whole number that fits a `u32` column
    pub fn require_count(&mut self, value: f64, field: &str, label: &str) {
        self.require_non_negative(value, field, label);
        self.check(
            value.fract() == 0.0 && value <= f64::from(u32::MAX),
            field,
            &format!("{} must be a whole number up to {}", label, u32::MAX),
        );
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing failed
    pub fn into_result(self) -> Result<(), Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_all_errors() {
        let mut errors = FieldErrors::new();
        errors.require_text("  ", "customerName", "Customer name");
        errors.require_non_negative(-1.0, "unitPrice", "Unit price");
        errors.require_non_negative(f64::NAN, "quantity", "Quantity");
        errors.require_text("Acme", "productName", "Product name");

        let failed = errors.into_result().unwrap_err();
        let fields: Vec<&str> = failed.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["customerName", "unitPrice", "quantity"]);
        assert_eq!(failed[0].to_string(), "customerName: Customer name is required");
    }

    #[test]
    fn test_require_count() {
        let mut errors = FieldErrors::new();
        errors.require_count(450.0, "stockLevel", "Stock level");
        errors.require_count(f64::from(u32::MAX), "variants", "Variants");
        assert!(errors.is_empty());

        errors.require_count(2.5, "stockLevel", "Stock level");
        errors.require_count(1e12, "minimumOrder", "Minimum order");
        let failed = errors.into_result().unwrap_err();
        let fields: Vec<&str> = failed.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["stockLevel", "minimumOrder"]);
    }
}
