use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::field::{FieldValue, ListRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Sort key plus direction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Column header click: same key ascending flips to descending,
    /// anything else starts ascending.
    pub fn toggled(current: Option<&SortSpec>, key: &str) -> SortSpec {
        match current {
            Some(spec) if spec.key == key && spec.direction == SortDirection::Asc => {
                SortSpec::desc(key)
            }
            _ => SortSpec::asc(key),
        }
    }

    pub fn compare<R: ListRecord>(&self, a: &R, b: &R) -> Ordering {
        self.direction
            .apply(compare_values(&a.field(&self.key), &b.field(&self.key)))
    }
}

/// Ascending comparison of two field values.
///
/// Dates compare as dates, numbers numerically, text case-insensitively.
/// `Missing` is smaller than any present value, so records without the field
/// come first ascending and last descending.
pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Missing, FieldValue::Missing) => Ordering::Equal,
        (FieldValue::Missing, _) => Ordering::Less,
        (_, FieldValue::Missing) => Ordering::Greater,
        (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(y),
        _ => match (a.as_date(), b.as_date()) {
            (Some(x), Some(y)) => match (a, b) {
                (FieldValue::Timestamp(x), FieldValue::Timestamp(y)) => x.cmp(y),
                _ => x.cmp(&y),
            },
            _ => a.as_text().to_lowercase().cmp(&b.as_text().to_lowercase()),
        },
    }
}

/// Stable in-place sort of a borrowed view
pub fn sort_records<R: ListRecord>(items: &mut [&R], spec: &SortSpec) {
    items.sort_by(|a, b| spec.compare(*a, *b));
}
