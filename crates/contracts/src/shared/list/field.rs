use chrono::{DateTime, NaiveDate, Utc};
use std::borrow::Cow;

/// Value of a single record field as seen by filters and comparators
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Number(f64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    List(Vec<Cow<'a, str>>),
    Missing,
}

impl<'a> FieldValue<'a> {
    pub fn text(value: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(value))
    }

    pub fn opt_text(value: Option<&'a String>) -> Self {
        match value {
            Some(v) => FieldValue::Text(Cow::Borrowed(v.as_str())),
            None => FieldValue::Missing,
        }
    }

    pub fn opt_date(value: Option<NaiveDate>) -> Self {
        value.map(FieldValue::Date).unwrap_or(FieldValue::Missing)
    }

    pub fn opt_timestamp(value: Option<DateTime<Utc>>) -> Self {
        value.map(FieldValue::Timestamp).unwrap_or(FieldValue::Missing)
    }

    pub fn list(values: &'a [String]) -> Self {
        FieldValue::List(values.iter().map(|v| Cow::Borrowed(v.as_str())).collect())
    }

    /// String form used by substring and equality predicates.
    /// Missing fields read as the empty string.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(t) => Cow::Borrowed(t.as_ref()),
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
            FieldValue::Timestamp(ts) => Cow::Owned(ts.to_rfc3339()),
            FieldValue::List(items) => Cow::Owned(items.join(", ")),
            FieldValue::Missing => Cow::Borrowed(""),
        }
    }

    /// Calendar date of date-like values
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Timestamp(ts) => Some(ts.date_naive()),
            _ => None,
        }
    }
}

/// A record that can be shown in a filtered/sorted list
pub trait ListRecord {
    /// Identifier used by selections and bulk actions
    fn record_id(&self) -> String;

    /// Field lookup by its UI key (camelCase). Unknown keys are `Missing`.
    fn field(&self, key: &str) -> FieldValue<'_>;

    /// Fields searched by the free-text search box
    fn search_fields() -> &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text() {
        assert_eq!(FieldValue::Number(500.0).as_text(), "500");
        assert_eq!(FieldValue::Number(12.5).as_text(), "12.5");
        assert_eq!(FieldValue::Missing.as_text(), "");
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(FieldValue::Date(date).as_text(), "2024-01-15");
        let sizes = vec!["S".to_string(), "M".to_string()];
        assert_eq!(FieldValue::list(&sizes).as_text(), "S, M");
    }
}
