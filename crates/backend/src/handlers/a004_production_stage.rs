use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::Json;
use chrono::Utc;
use contracts::domain::a004_production_stage::aggregate::ProductionStage;
use contracts::shared::list::{Page, SortSpec};
use contracts::shared::summary::StageOverview;
use serde_json::json;

use super::common::{no_preset, page_of, ListQuery};
use crate::domain::a004_production_stage;
use crate::shared::data::get_store;
use crate::shared::error::AppError;

/// GET /api/stages, workflow order unless sorted otherwise
pub async fn list(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<ProductionStage>>, AppError> {
    let query = ListQuery::parse(&params, None, Utc::now().date_naive())?;
    let stages = a004_production_stage::service::list(get_store()?.as_ref()).await?;
    let sort = query.sort_spec(no_preset, Some(SortSpec::asc("sequence")));
    Ok(Json(page_of(&stages, &query, sort.as_ref())))
}

/// GET /api/stages/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<ProductionStage>, AppError> {
    Ok(Json(
        a004_production_stage::service::get(get_store()?.as_ref(), &id).await?,
    ))
}

/// POST /api/stages
pub async fn create(Json(stage): Json<ProductionStage>) -> Result<Json<ProductionStage>, AppError> {
    Ok(Json(
        a004_production_stage::service::create(get_store()?.as_ref(), stage).await?,
    ))
}

/// PUT /api/stages/:id
pub async fn update(
    Path(id): Path<String>,
    Json(stage): Json<ProductionStage>,
) -> Result<Json<ProductionStage>, AppError> {
    Ok(Json(
        a004_production_stage::service::update(get_store()?.as_ref(), &id, stage).await?,
    ))
}

/// DELETE /api/stages/:id
pub async fn delete(Path(id): Path<String>) -> Result<Json<serde_json::Value>, AppError> {
    a004_production_stage::service::delete(get_store()?.as_ref(), &id).await?;
    Ok(Json(json!({ "id": id })))
}

/// GET /api/stages/overview
pub async fn overview() -> Result<Json<StageOverview>, AppError> {
    Ok(Json(
        a004_production_stage::service::overview(get_store()?.as_ref()).await?,
    ))
}
