//! Query parsing and response helpers shared by the entity handlers.

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use contracts::shared::list::{
    filter_and_sort, paginate, DateWindow, FilterSpec, ListRecord, Page, SortDirection, SortSpec,
};
use serde::Deserialize;

use crate::shared::error::AppError;
use crate::shared::export::ExportArtifact;
use crate::shared::import::UploadedFile;
use crate::usecases::u502_bulk_actions::BulkResult;

const RESERVED: &[&str] = &["search", "sort", "dir", "page", "pageSize", "dateRange"];

/// List query of `GET /api/<entity>`.
///
/// `search`, `sort`, `dir`, `page` (zero-based), `pageSize` (0 = all) and
/// `dateRange` are fixed parameters. `min.<field>` / `max.<field>` give a
/// numeric range, `any.<field>=a,b` a set filter, `has.<field>` a substring
/// filter. Every other parameter is an exact match on that field.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: FilterSpec,
    pub sort_key: Option<String>,
    pub direction: Option<SortDirection>,
    pub page: usize,
    pub page_size: usize,
}

impl ListQuery {
    /// `date_field` is the field `dateRange` applies to, if the entity has one
    pub fn parse(
        params: &HashMap<String, String>,
        date_field: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        let mut filter = FilterSpec::new();
        if let Some(text) = params.get("search") {
            filter = filter.search(text.trim());
        }
        if let (Some(field), Some(code)) = (date_field, params.get("dateRange")) {
            let window = DateWindow::from_code(code)
                .ok_or_else(|| AppError::invalid("dateRange", format!("Unknown date range '{}'", code)))?;
            filter = filter.date_within(field, window, today);
        }

        let mut ranges: HashMap<&str, (Option<f64>, Option<f64>)> = HashMap::new();
        for (key, value) in params {
            if RESERVED.contains(&key.as_str()) {
                continue;
            }
            if let Some(field) = key.strip_prefix("min.") {
                ranges.entry(field).or_default().0 = Some(number(key, value)?);
            } else if let Some(field) = key.strip_prefix("max.") {
                ranges.entry(field).or_default().1 = Some(number(key, value)?);
            } else if let Some(field) = key.strip_prefix("any.") {
                let values: Vec<String> = value
                    .split(',')
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .collect();
                filter = filter.any_of(field, values);
            } else if let Some(field) = key.strip_prefix("has.") {
                filter = filter.contains(field, value.as_str());
            } else {
                filter = filter.equals(key.as_str(), value.as_str());
            }
        }
        for (field, (min, max)) in ranges {
            filter = filter.range(field, min, max);
        }

        let direction = match params.get("dir") {
            Some(code) => Some(
                SortDirection::from_code(code)
                    .ok_or_else(|| AppError::invalid("dir", "Sort direction must be asc or desc"))?,
            ),
            None => None,
        };

        Ok(Self {
            filter,
            sort_key: params.get("sort").filter(|s| !s.is_empty()).cloned(),
            direction,
            page: optional_count(params, "page")?,
            page_size: optional_count(params, "pageSize")?,
        })
    }

    /// Explicit `sort`/`dir`, else a named preset, else the entity default
    pub fn sort_spec(
        &self,
        preset: fn(&str) -> Option<SortSpec>,
        default: Option<SortSpec>,
    ) -> Option<SortSpec> {
        match (&self.sort_key, self.direction) {
            (Some(key), Some(direction)) => Some(SortSpec {
                key: key.clone(),
                direction,
            }),
            (Some(key), None) => preset(key).or_else(|| Some(SortSpec::asc(key.as_str()))),
            (None, _) => default,
        }
    }
}

fn number(key: &str, value: &str) -> Result<f64, AppError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| AppError::invalid(key, format!("'{}' is not a number", value)))
}

fn optional_count(params: &HashMap<String, String>, key: &str) -> Result<usize, AppError> {
    match params.get(key) {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| AppError::invalid(key, format!("'{}' is not a page number", raw))),
        None => Ok(0),
    }
}

pub fn no_preset(_: &str) -> Option<SortSpec> {
    None
}

/// Filtered, sorted rows without pagination
pub fn visible<'a, R: ListRecord>(records: &'a [R], query: &ListQuery, sort: Option<&SortSpec>) -> Vec<&'a R> {
    filter_and_sort(records, &query.filter, sort)
}

pub fn page_of<R: ListRecord + Clone>(records: &[R], query: &ListQuery, sort: Option<&SortSpec>) -> Page<R> {
    let rows: Vec<R> = visible(records, query, sort).into_iter().cloned().collect();
    paginate(&rows, query.page, query.page_size)
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportParams {
    #[serde(default)]
    pub preview: bool,
}

/// Reads the multipart field `file`
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ParseFailure(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::ParseFailure(format!("Invalid upload: {}", e)))?;
        return Ok(UploadedFile::new(name, bytes.to_vec()));
    }
    Err(AppError::ParseFailure("No file uploaded".to_string()))
}

/// Attachment response carrying the artifact's content type and file name
pub fn artifact_response(artifact: ExportArtifact) -> Response {
    let disposition = artifact.content_disposition();
    (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}

pub fn bulk_response(result: BulkResult) -> Response {
    match result {
        BulkResult::Artifact(artifact) => artifact_response(artifact),
        BulkResult::Outcome(outcome) => Json(outcome).into_response(),
    }
}
