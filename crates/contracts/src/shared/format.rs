//! Display formatting shared by lists, exports and reports.
//!
//! Currency follows the en-IN convention: rupee sign, no fraction digits,
//! last three digits grouped together and the rest in pairs (`₹1,25,000`).

use chrono::{DateTime, NaiveDate, Utc};

pub const NOT_AVAILABLE: &str = "N/A";

/// `125000.0` -> `₹1,25,000`
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹0".to_string();
    }
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{}₹{}", sign, group_indian(&digits))
}

/// Lakh/crore grouping of a plain digit string
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Western grouping in threes with a custom separator (`1234567` -> `1 234 567`)
pub fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Whole percent, `65` -> `65%`
pub fn format_percent(value: impl Into<f64>) -> String {
    format!("{:.0}%", value.into())
}

/// `15 Jan 2024`, or `N/A` when there is no date
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%-d %b %Y").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `Generated on: 15 Jan 2024 14:05:09` line of PDF exports
pub fn generated_on(now: DateTime<Utc>) -> String {
    format!(
        "Generated on: {} {}",
        format_date(Some(now.date_naive())),
        now.format("%H:%M:%S")
    )
}
