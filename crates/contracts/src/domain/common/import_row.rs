use std::collections::HashMap;

use super::FieldErrors;

/// One data row of an imported table, keyed by header
pub type ImportRow = HashMap<String, String>;

/// Trimmed cell text; blank cells read as `None`
pub fn cell<'a>(row: &'a ImportRow, key: &str) -> Option<&'a str> {
    row.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

pub fn cell_string(row: &ImportRow, key: &str) -> Option<String> {
    cell(row, key).map(str::to_string)
}

/// Numeric cell; thousands separators and a leading currency sign are
/// tolerated. Unparseable text is recorded against `key` and reads as 0.
pub fn cell_number(row: &ImportRow, key: &str, errors: &mut FieldErrors) -> Option<f64> {
    let raw = cell(row, key)?;
    let cleaned: String = raw
        .trim_start_matches(['₹', '$'])
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match cleaned.trim().parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.check(false, key, &format!("'{}' is not a number", raw));
            Some(0.0)
        }
    }
}

/// `true`/`yes`/`1` (any case) is true
pub fn cell_flag(row: &ImportRow, key: &str) -> bool {
    matches!(
        cell(row, key).map(|v| v.to_ascii_lowercase()).as_deref(),
        Some("true" | "yes" | "1" | "y")
    )
}

/// Comma- or semicolon-separated list cell
pub fn cell_list(row: &ImportRow, key: &str) -> Vec<String> {
    cell(row, key)
        .map(|v| {
            v.split([',', ';'])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> ImportRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_cells() {
        let r = row(&[
            ("name", "  Tee "),
            ("blank", "   "),
            ("price", "₹1,250"),
            ("bad", "ten"),
            ("sizes", "S, M;L"),
            ("new", "Yes"),
        ]);
        let mut errors = FieldErrors::new();
        assert_eq!(cell(&r, "name"), Some("Tee"));
        assert_eq!(cell(&r, "blank"), None);
        assert_eq!(cell(&r, "absent"), None);
        assert_eq!(cell_number(&r, "price", &mut errors), Some(1250.0));
        assert!(errors.is_empty());
        assert_eq!(cell_number(&r, "bad", &mut errors), Some(0.0));
        assert!(!errors.is_empty());
        assert_eq!(cell_list(&r, "sizes"), vec!["S", "M", "L"]);
        assert!(cell_flag(&r, "new"));
        assert!(!cell_flag(&r, "name"));
    }
}
