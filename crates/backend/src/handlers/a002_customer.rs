use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use contracts::domain::a002_customer::aggregate::{Customer, CustomerDraft};
use contracts::shared::list::Page;
use contracts::shared::summary::CustomerSummary;
use contracts::usecases::u502_bulk_actions::BulkRequest;
use serde_json::json;

use super::common::{
    artifact_response, bulk_response, no_preset, page_of, read_upload, visible, ImportParams, ListQuery,
};
use crate::domain::a002_customer;
use crate::shared::config;
use crate::shared::data::get_store;
use crate::shared::error::AppError;
use crate::shared::export::export_csv;
use crate::usecases::u501_import_records::{ImportExecutor, ImportTarget};
use crate::usecases::u502_bulk_actions::BulkExecutor;

fn list_query(params: &HashMap<String, String>) -> Result<ListQuery, AppError> {
    ListQuery::parse(params, Some("lastOrder"), Utc::now().date_naive())
}

/// GET /api/customers
pub async fn list(Query(params): Query<HashMap<String, String>>) -> Result<Json<Page<Customer>>, AppError> {
    let query = list_query(&params)?;
    let customers = a002_customer::service::list(get_store()?.as_ref()).await?;
    let sort = query.sort_spec(no_preset, Some(Customer::default_sort()));
    Ok(Json(page_of(&customers, &query, sort.as_ref())))
}

/// GET /api/customers/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Customer>, AppError> {
    Ok(Json(a002_customer::service::get(get_store()?.as_ref(), &id).await?))
}

/// POST /api/customers
pub async fn create(Json(draft): Json<CustomerDraft>) -> Result<Json<Customer>, AppError> {
    Ok(Json(a002_customer::service::create(get_store()?.as_ref(), draft).await?))
}

/// PUT /api/customers/:id
pub async fn update(
    Path(id): Path<String>,
    Json(draft): Json<CustomerDraft>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(
        a002_customer::service::update(get_store()?.as_ref(), &id, draft).await?,
    ))
}

/// DELETE /api/customers/:id
pub async fn delete(Path(id): Path<String>) -> Result<Json<serde_json::Value>, AppError> {
    a002_customer::service::delete(get_store()?.as_ref(), &id).await?;
    Ok(Json(json!({ "id": id })))
}

/// POST /api/customers/bulk
pub async fn bulk(Json(request): Json<BulkRequest>) -> Result<Response, AppError> {
    let executor = BulkExecutor::new(get_store()?);
    Ok(bulk_response(executor.run_customers(&request).await?))
}

/// POST /api/customers/import?preview=true
pub async fn import(Query(params): Query<ImportParams>, multipart: Multipart) -> Result<Response, AppError> {
    let file = read_upload(multipart).await?;
    let executor = ImportExecutor::new(get_store()?, config::current().import.preview_rows);
    if params.preview {
        return Ok(Json(executor.preview(ImportTarget::Customers, &file)?).into_response());
    }
    let summary = executor
        .import(ImportTarget::Customers, &file, Utc::now().date_naive())
        .await?;
    Ok(Json(summary).into_response())
}

/// GET /api/customers/export
pub async fn export(Query(params): Query<HashMap<String, String>>) -> Result<Response, AppError> {
    let query = list_query(&params)?;
    let customers = a002_customer::service::list(get_store()?.as_ref()).await?;
    let sort = query.sort_spec(no_preset, Some(Customer::default_sort()));
    let rows = visible(&customers, &query, sort.as_ref());
    Ok(artifact_response(export_csv(&rows, a002_customer::service::EXPORT_NAME, None)?))
}

/// GET /api/customers/summary
pub async fn summary() -> Result<Json<CustomerSummary>, AppError> {
    Ok(Json(a002_customer::service::summary(get_store()?.as_ref()).await?))
}
