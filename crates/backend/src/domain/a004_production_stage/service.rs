use contracts::domain::a004_production_stage::aggregate::ProductionStage;
use contracts::domain::common::AggregateRoot;
use contracts::shared::summary::{stage_overview, StageOverview};

use super::repository;
use crate::domain::a001_order;
use crate::shared::data::RemoteStore;
use crate::shared::error::AppError;

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("{} {}", ProductionStage::element_name(), id))
}

/// Stages in workflow order
pub async fn list(store: &dyn RemoteStore) -> Result<Vec<ProductionStage>, AppError> {
    Ok(repository::list_all(store).await?)
}

pub async fn get(store: &dyn RemoteStore, id: &str) -> Result<ProductionStage, AppError> {
    list(store)
        .await?
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| not_found(id))
}

pub async fn create(store: &dyn RemoteStore, stage: ProductionStage) -> Result<ProductionStage, AppError> {
    stage.validate().map_err(AppError::ValidationFailure)?;
    if list(store).await?.iter().any(|s| s.id == stage.id) {
        return Err(AppError::invalid(
            "id",
            format!("Stage {} already exists", stage.id),
        ));
    }
    let created = repository::insert(store, &stage).await?;
    tracing::info!("Created production stage {}", created.id);
    Ok(created)
}

pub async fn update(
    store: &dyn RemoteStore,
    id: &str,
    mut stage: ProductionStage,
) -> Result<ProductionStage, AppError> {
    get(store, id).await?;
    stage.id = id.to_string();
    stage.validate().map_err(AppError::ValidationFailure)?;
    let updated = repository::update(store, &stage).await?;
    tracing::info!("Updated production stage {}", updated.id);
    Ok(updated)
}

pub async fn delete(store: &dyn RemoteStore, id: &str) -> Result<(), AppError> {
    if !repository::delete(store, id).await? {
        return Err(not_found(id));
    }
    tracing::info!("Deleted production stage {}", id);
    Ok(())
}

/// Seeds the default workflow into an empty stage table
pub async fn ensure_defaults(store: &dyn RemoteStore) -> Result<usize, AppError> {
    if !list(store).await?.is_empty() {
        return Ok(0);
    }
    let rows = repository::default_rows();
    let count = rows.len();
    for row in rows {
        store
            .insert(repository::TABLE, row)
            .await
            .map_err(AppError::from)?;
    }
    tracing::info!("Seeded {} default production stages", count);
    Ok(count)
}

/// Live stage load from the current open orders
pub async fn overview(store: &dyn RemoteStore) -> Result<StageOverview, AppError> {
    let stages = list(store).await?;
    let orders = a001_order::service::list(store).await?;
    Ok(stage_overview(&stages, &orders))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::memory::MemoryStore;
    use contracts::enums::StageStatus;

    #[tokio::test]
    async fn test_ensure_defaults_runs_once() {
        let store = MemoryStore::new();
        assert_eq!(ensure_defaults(&store).await.unwrap(), 5);
        assert_eq!(ensure_defaults(&store).await.unwrap(), 0);
        let ids: Vec<String> = list(&store).await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["cutting", "sewing", "printing", "quality", "packaging"]);
    }

    #[tokio::test]
    async fn test_update_and_duplicate_create() {
        let store = MemoryStore::seeded();
        let mut stage = get(&store, "printing").await.unwrap();
        stage.status = StageStatus::Delayed;
        let updated = update(&store, "printing", stage.clone()).await.unwrap();
        assert_eq!(updated.status, StageStatus::Delayed);
        assert!(matches!(create(&store, stage).await, Err(AppError::ValidationFailure(_))));
        assert_eq!(overview(&store).await.unwrap().delayed_stages, 1);
    }
}
