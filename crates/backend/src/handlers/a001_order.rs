use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, Utc};
use contracts::domain::a001_order::aggregate::{Order, OrderDraft};
use contracts::shared::list::{Page, SortSpec};
use contracts::shared::summary::OrderSummary;
use contracts::usecases::u502_bulk_actions::BulkRequest;
use serde::Deserialize;
use serde_json::json;

use super::common::{
    artifact_response, bulk_response, no_preset, page_of, read_upload, visible, ImportParams, ListQuery,
};
use crate::domain::a001_order;
use crate::shared::config;
use crate::shared::data::get_store;
use crate::shared::error::AppError;
use crate::shared::export::export_csv;
use crate::usecases::u501_import_records::{ImportExecutor, ImportTarget};
use crate::usecases::u502_bulk_actions::BulkExecutor;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Requested sort, newest orders first otherwise
fn list_sort(query: &ListQuery) -> Option<SortSpec> {
    query.sort_spec(no_preset, Some(Order::default_sort()))
}

/// GET /api/orders
pub async fn list(Query(params): Query<HashMap<String, String>>) -> Result<Json<Page<Order>>, AppError> {
    let query = ListQuery::parse(&params, Some("orderDate"), today())?;
    let orders = a001_order::service::list(get_store()?.as_ref()).await?;
    let sort = list_sort(&query);
    Ok(Json(page_of(&orders, &query, sort.as_ref())))
}

/// GET /api/orders/:id (order number or store id)
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Order>, AppError> {
    Ok(Json(a001_order::service::get(get_store()?.as_ref(), &id).await?))
}

/// POST /api/orders
pub async fn create(Json(draft): Json<OrderDraft>) -> Result<Json<Order>, AppError> {
    Ok(Json(
        a001_order::service::create(get_store()?.as_ref(), draft, today()).await?,
    ))
}

/// PUT /api/orders/:id
pub async fn update(Path(id): Path<String>, Json(draft): Json<OrderDraft>) -> Result<Json<Order>, AppError> {
    Ok(Json(
        a001_order::service::update(get_store()?.as_ref(), &id, draft, today()).await?,
    ))
}

/// DELETE /api/orders/:id
pub async fn delete(Path(id): Path<String>) -> Result<Json<serde_json::Value>, AppError> {
    a001_order::service::delete(get_store()?.as_ref(), &id).await?;
    Ok(Json(json!({ "id": id })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageMove {
    pub stage_id: String,
}

/// POST /api/orders/:id/stage
pub async fn move_to_stage(
    Path(id): Path<String>,
    Json(request): Json<StageMove>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(
        a001_order::service::move_to_stage(get_store()?.as_ref(), &id, &request.stage_id, today()).await?,
    ))
}

/// POST /api/orders/bulk
pub async fn bulk(Json(request): Json<BulkRequest>) -> Result<Response, AppError> {
    let executor = BulkExecutor::new(get_store()?);
    Ok(bulk_response(executor.run_orders(&request, today()).await?))
}

/// POST /api/orders/import?preview=true
pub async fn import(Query(params): Query<ImportParams>, multipart: Multipart) -> Result<Response, AppError> {
    let file = read_upload(multipart).await?;
    let executor = ImportExecutor::new(get_store()?, config::current().import.preview_rows);
    if params.preview {
        return Ok(Json(executor.preview(ImportTarget::Orders, &file)?).into_response());
    }
    Ok(Json(executor.import(ImportTarget::Orders, &file, today()).await?).into_response())
}

/// GET /api/orders/export, same filters as the list
pub async fn export(Query(params): Query<HashMap<String, String>>) -> Result<Response, AppError> {
    let query = ListQuery::parse(&params, Some("orderDate"), today())?;
    let orders = a001_order::service::list(get_store()?.as_ref()).await?;
    let sort = list_sort(&query);
    let rows = visible(&orders, &query, sort.as_ref());
    Ok(artifact_response(export_csv(&rows, a001_order::service::EXPORT_NAME, None)?))
}

/// GET /api/orders/summary
pub async fn summary() -> Result<Json<OrderSummary>, AppError> {
    Ok(Json(
        a001_order::service::summary(get_store()?.as_ref(), today()).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, order_date: NaiveDate) -> Order {
        OrderDraft {
            customer_name: "Trendy Threads".into(),
            product_name: "Vintage Tee".into(),
            quantity: 10.0,
            unit_price: 5.0,
            order_date: Some(order_date),
            ..Default::default()
        }
        .into_order(id.to_string(), order_date)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_list_defaults_to_newest_first() {
        let orders = vec![
            order("ORD-2024-001", date(2)),
            order("ORD-2024-003", date(20)),
            order("ORD-2024-002", date(11)),
        ];
        let query = ListQuery::parse(&HashMap::new(), Some("orderDate"), date(21)).unwrap();
        let page = page_of(&orders, &query, list_sort(&query).as_ref());
        let ids: Vec<&str> = page.items.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["ORD-2024-003", "ORD-2024-002", "ORD-2024-001"]);
    }

    #[test]
    fn test_explicit_sort_wins() {
        let params: HashMap<String, String> = [("sort".to_string(), "id".to_string())].into();
        let query = ListQuery::parse(&params, Some("orderDate"), date(21)).unwrap();
        assert_eq!(list_sort(&query), Some(SortSpec::asc("id")));
    }
}
