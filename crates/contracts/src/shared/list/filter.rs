use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::field::{FieldValue, ListRecord};

/// Match-all sentinels used by select boxes ("All Status", "All" categories)
const ALL_SENTINELS: &[&str] = &["all", "All", ""];

/// Calendar window for the order date-range filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Week,
    Month,
    Quarter,
}

impl DateWindow {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "all" => Some(DateWindow::All),
            "today" => Some(DateWindow::Today),
            "week" => Some(DateWindow::Week),
            "month" => Some(DateWindow::Month),
            "quarter" => Some(DateWindow::Quarter),
            _ => None,
        }
    }

    /// Whether `date` falls in the same calendar period as `today`.
    /// Weeks are ISO weeks (Monday first).
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DateWindow::All => true,
            DateWindow::Today => date == today,
            DateWindow::Week => date.iso_week() == today.iso_week(),
            DateWindow::Month => date.year() == today.year() && date.month() == today.month(),
            DateWindow::Quarter => {
                date.year() == today.year() && (date.month0() / 3) == (today.month0() / 3)
            }
        }
    }
}

/// One active filter value of a list page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Case-insensitive containment over the record's search fields (OR)
    Search { text: String },
    /// Exact equality; `all`/`All`/empty matches everything
    Equals { field: String, value: String },
    /// Case-insensitive containment on one field
    Contains { field: String, value: String },
    /// Inclusive numeric range, either bound optional
    Range {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Set intersection for list fields (sizes, colors)
    AnyOf { field: String, values: Vec<String> },
    /// Date falls in the calendar window around `today`
    DateWithin {
        field: String,
        window: DateWindow,
        today: NaiveDate,
    },
}

impl Predicate {
    /// Field the predicate is bound to; `None` for search
    pub fn field(&self) -> Option<&str> {
        match self {
            Predicate::Search { .. } => None,
            Predicate::Equals { field, .. }
            | Predicate::Contains { field, .. }
            | Predicate::Range { field, .. }
            | Predicate::AnyOf { field, .. }
            | Predicate::DateWithin { field, .. } => Some(field),
        }
    }

    /// Inactive predicates match every record
    pub fn is_active(&self) -> bool {
        match self {
            Predicate::Search { text } => !text.is_empty(),
            Predicate::Equals { value, .. } => !ALL_SENTINELS.contains(&value.as_str()),
            Predicate::Contains { value, .. } => !value.is_empty(),
            Predicate::Range { min, max, .. } => min.is_some() || max.is_some(),
            Predicate::AnyOf { values, .. } => !values.is_empty(),
            Predicate::DateWithin { window, .. } => *window != DateWindow::All,
        }
    }

    pub fn matches<R: ListRecord>(&self, record: &R) -> bool {
        if !self.is_active() {
            return true;
        }

        match self {
            Predicate::Search { text } => {
                let needle = text.to_lowercase();
                R::search_fields().iter().any(|key| {
                    record
                        .field(key)
                        .as_text()
                        .to_lowercase()
                        .contains(&needle)
                })
            }
            Predicate::Equals { field, value } => match record.field(field) {
                FieldValue::Missing => false,
                v => v.as_text() == value.as_str(),
            },
            Predicate::Contains { field, value } => record
                .field(field)
                .as_text()
                .to_lowercase()
                .contains(&value.to_lowercase()),
            Predicate::Range { field, min, max } => match record.field(field) {
                FieldValue::Number(n) => {
                    min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi)
                }
                _ => false,
            },
            Predicate::AnyOf { field, values } => match record.field(field) {
                FieldValue::List(items) => items
                    .iter()
                    .any(|item| values.iter().any(|v| v.eq_ignore_ascii_case(item))),
                FieldValue::Missing => false,
                v => {
                    let text = v.as_text();
                    values.iter().any(|candidate| candidate.eq_ignore_ascii_case(&text))
                }
            },
            Predicate::DateWithin {
                field,
                window,
                today,
            } => match record.field(field).as_date() {
                Some(date) => window.contains(date, *today),
                None => false,
            },
        }
    }
}

/// Set of predicates combined with logical AND
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    pub predicates: Vec<Predicate>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(self, text: impl Into<String>) -> Self {
        self.with(Predicate::Search { text: text.into() })
    }

    pub fn equals(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(Predicate::Equals {
            field: field.into(),
            value: value.into(),
        })
    }

    pub fn contains(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(Predicate::Contains {
            field: field.into(),
            value: value.into(),
        })
    }

    pub fn range(self, field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        self.with(Predicate::Range {
            field: field.into(),
            min,
            max,
        })
    }

    pub fn any_of(self, field: impl Into<String>, values: Vec<String>) -> Self {
        self.with(Predicate::AnyOf {
            field: field.into(),
            values,
        })
    }

    pub fn date_within(
        self,
        field: impl Into<String>,
        window: DateWindow,
        today: NaiveDate,
    ) -> Self {
        self.with(Predicate::DateWithin {
            field: field.into(),
            window,
            today,
        })
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.set(predicate);
        self
    }

    /// Replaces the predicate of the same kind bound to the same field
    pub fn set(&mut self, predicate: Predicate) {
        let same_slot = |p: &Predicate| {
            std::mem::discriminant(p) == std::mem::discriminant(&predicate)
                && p.field() == predicate.field()
        };
        match self.predicates.iter_mut().find(|p| same_slot(p)) {
            Some(existing) => *existing = predicate,
            None => self.predicates.push(predicate),
        }
    }

    pub fn clear(&mut self) {
        self.predicates.clear();
    }

    pub fn active(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter().filter(|p| p.is_active())
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    pub fn matches<R: ListRecord>(&self, record: &R) -> bool {
        self.active().all(|p| p.matches(record))
    }
}
