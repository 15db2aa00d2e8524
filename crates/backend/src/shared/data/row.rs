//! Helpers shared by the per-entity row mappings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::store::StoreRow;

/// Serializes a typed row into the store's JSON object
pub fn encode_row<T: Serialize>(row: &T) -> anyhow::Result<StoreRow> {
    match serde_json::to_value(row)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("row encoded as {} instead of an object", other),
    }
}

pub fn decode_row<T: DeserializeOwned>(table: &str, row: StoreRow) -> anyhow::Result<T> {
    let id = row
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("?")
        .to_string();
    serde_json::from_value(Value::Object(row))
        .map_err(|e| anyhow::anyhow!("{} row {}: {}", table, id, e))
}

/// Column where the store may send `null` for a non-optional value
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Closed enumeration column; unknown values fail the row
pub fn parse_enum<T>(
    table: &str,
    field: &str,
    value: &str,
    from_code: impl Fn(&str) -> Option<T>,
) -> anyhow::Result<T> {
    from_code(value)
        .ok_or_else(|| anyhow::anyhow!("{}: unknown {} '{}'", table, field, value))
}

/// Date column; accepts `YYYY-MM-DD` and full timestamps
pub fn parse_date(table: &str, field: &str, value: Option<&str>) -> anyhow::Result<Option<NaiveDate>> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| Some(ts.date_naive()))
        .map_err(|_| anyhow::anyhow!("{}: {} '{}' is not a date", table, field, raw))
}

/// `created_at` column; unreadable timestamps read as absent
pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc))
}

pub fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Non-negative whole number column stored as a JSON number
pub fn to_count(value: f64) -> u32 {
    if value.is_finite() {
        value.round().clamp(0.0, f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::OrderStatus;

    #[test]
    fn test_parse_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_date("orders", "due_date", Some("2024-01-15")).unwrap(), expected);
        assert_eq!(
            parse_date("orders", "due_date", Some("2024-01-15T10:30:00+00:00")).unwrap(),
            expected
        );
        assert_eq!(parse_date("orders", "due_date", Some(" ")).unwrap(), None);
        let err = parse_date("orders", "due_date", Some("15.01.2024")).unwrap_err();
        assert!(err.to_string().contains("due_date"));
    }

    #[test]
    fn test_parse_enum_names_field() {
        assert_eq!(
            parse_enum("orders", "status", "shipped", OrderStatus::from_code).unwrap(),
            OrderStatus::Shipped
        );
        let err = parse_enum("orders", "status", "lost", OrderStatus::from_code).unwrap_err();
        assert_eq!(err.to_string(), "orders: unknown status 'lost'");
    }

    #[test]
    fn test_to_count() {
        assert_eq!(to_count(12.0), 12);
        assert_eq!(to_count(-3.0), 0);
        assert_eq!(to_count(f64::NAN), 0);
    }
}
