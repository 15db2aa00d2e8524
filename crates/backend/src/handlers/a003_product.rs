use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use contracts::domain::a003_product::aggregate::{Product, ProductDraft};
use contracts::shared::list::{Page, SortSpec};
use contracts::shared::summary::ProductSummary;
use contracts::usecases::u502_bulk_actions::BulkRequest;
use serde_json::json;

use super::common::{
    artifact_response, bulk_response, page_of, read_upload, visible, ImportParams, ListQuery,
};
use crate::domain::a003_product;
use crate::shared::config;
use crate::shared::data::get_store;
use crate::shared::error::AppError;
use crate::shared::export::export_csv;
use crate::usecases::u501_import_records::{ImportExecutor, ImportTarget};
use crate::usecases::u502_bulk_actions::BulkExecutor;

fn list_query(params: &HashMap<String, String>) -> Result<ListQuery, AppError> {
    ListQuery::parse(params, None, Utc::now().date_naive())
}

/// Requested sort or preset, catalog order by name otherwise
fn list_sort(query: &ListQuery) -> Option<SortSpec> {
    query.sort_spec(Product::sort_preset, Some(Product::default_sort()))
}

/// GET /api/products (`sort` also takes the presets name, price, stock, newest)
pub async fn list(Query(params): Query<HashMap<String, String>>) -> Result<Json<Page<Product>>, AppError> {
    let query = list_query(&params)?;
    let products = a003_product::service::list(get_store()?.as_ref()).await?;
    let sort = list_sort(&query);
    Ok(Json(page_of(&products, &query, sort.as_ref())))
}

/// GET /api/products/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Product>, AppError> {
    Ok(Json(a003_product::service::get(get_store()?.as_ref(), &id).await?))
}

/// POST /api/products
pub async fn create(Json(draft): Json<ProductDraft>) -> Result<Json<Product>, AppError> {
    Ok(Json(a003_product::service::create(get_store()?.as_ref(), draft).await?))
}

/// PUT /api/products/:id
pub async fn update(
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(
        a003_product::service::update(get_store()?.as_ref(), &id, draft).await?,
    ))
}

/// DELETE /api/products/:id
pub async fn delete(Path(id): Path<String>) -> Result<Json<serde_json::Value>, AppError> {
    a003_product::service::delete(get_store()?.as_ref(), &id).await?;
    Ok(Json(json!({ "id": id })))
}

/// POST /api/products/bulk
pub async fn bulk(Json(request): Json<BulkRequest>) -> Result<Response, AppError> {
    let executor = BulkExecutor::new(get_store()?);
    Ok(bulk_response(executor.run_products(&request).await?))
}

/// POST /api/products/import?preview=true
pub async fn import(Query(params): Query<ImportParams>, multipart: Multipart) -> Result<Response, AppError> {
    let file = read_upload(multipart).await?;
    let executor = ImportExecutor::new(get_store()?, config::current().import.preview_rows);
    if params.preview {
        return Ok(Json(executor.preview(ImportTarget::Products, &file)?).into_response());
    }
    let summary = executor
        .import(ImportTarget::Products, &file, Utc::now().date_naive())
        .await?;
    Ok(Json(summary).into_response())
}

/// GET /api/products/export
pub async fn export(Query(params): Query<HashMap<String, String>>) -> Result<Response, AppError> {
    let query = list_query(&params)?;
    let products = a003_product::service::list(get_store()?.as_ref()).await?;
    let sort = list_sort(&query);
    let rows = visible(&products, &query, sort.as_ref());
    Ok(artifact_response(export_csv(&rows, a003_product::service::EXPORT_NAME, None)?))
}

/// GET /api/products/summary
pub async fn summary() -> Result<Json<ProductSummary>, AppError> {
    Ok(Json(a003_product::service::summary(get_store()?.as_ref()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> Product {
        ProductDraft {
            name: name.into(),
            sku: format!("SKU-{}", name),
            category: "T-Shirts".into(),
            ..Default::default()
        }
        .into_product(100)
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_list_defaults_to_name_order() {
        let products = vec![product("Polo"), product("Hoodie"), product("Cargo Pants")];
        let query = list_query(&params(&[])).unwrap();
        let page = page_of(&products, &query, list_sort(&query).as_ref());
        let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Cargo Pants", "Hoodie", "Polo"]);
    }

    #[test]
    fn test_preset_overrides_default() {
        let query = list_query(&params(&[("sort", "stock")])).unwrap();
        assert_eq!(list_sort(&query), Some(SortSpec::desc("stockLevel")));
    }
}
