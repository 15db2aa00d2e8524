use contracts::domain::a003_product::aggregate::{Product, ProductDraft};
use contracts::domain::common::AggregateRoot;
use contracts::shared::summary::{product_summary, ProductSummary};

use super::repository;
use crate::shared::config;
use crate::shared::data::RemoteStore;
use crate::shared::error::AppError;

/// Download name of products CSV exports
pub const EXPORT_NAME: &str = "products-export";

fn low_stock_threshold() -> u32 {
    config::current().catalog.low_stock_threshold
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("{} {}", Product::element_name(), id))
}

pub async fn list(store: &dyn RemoteStore) -> Result<Vec<Product>, AppError> {
    Ok(repository::list_all(store, low_stock_threshold()).await?)
}

pub async fn get(store: &dyn RemoteStore, id: &str) -> Result<Product, AppError> {
    list(store)
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| not_found(id))
}

pub async fn create(store: &dyn RemoteStore, draft: ProductDraft) -> Result<Product, AppError> {
    draft.validate().map_err(AppError::ValidationFailure)?;
    let threshold = low_stock_threshold();
    let created = repository::insert(store, &draft.into_product(threshold), threshold).await?;
    tracing::info!("Created product {} ({})", created.sku, created.id);
    Ok(created)
}

pub async fn update(store: &dyn RemoteStore, id: &str, draft: ProductDraft) -> Result<Product, AppError> {
    draft.validate().map_err(AppError::ValidationFailure)?;
    let existing = get(store, id).await?;
    let threshold = low_stock_threshold();
    let updated = repository::update(store, &draft.apply_to(&existing, threshold), threshold).await?;
    tracing::info!("Updated product {}", updated.sku);
    Ok(updated)
}

/// Writes a product changed in place; availability is re-derived first
pub async fn save(store: &dyn RemoteStore, product: &Product) -> Result<Product, AppError> {
    let threshold = low_stock_threshold();
    let mut product = product.clone();
    product.refresh_availability(threshold);
    Ok(repository::update(store, &product, threshold).await?)
}

pub async fn duplicate(store: &dyn RemoteStore, id: &str) -> Result<Product, AppError> {
    let copy = get(store, id).await?.duplicate();
    let created = repository::insert(store, &copy, low_stock_threshold()).await?;
    tracing::info!("Duplicated product {} as {}", id, created.sku);
    Ok(created)
}

pub async fn delete(store: &dyn RemoteStore, id: &str) -> Result<(), AppError> {
    if !repository::delete(store, id).await? {
        return Err(not_found(id));
    }
    tracing::info!("Deleted product {}", id);
    Ok(())
}

pub async fn summary(store: &dyn RemoteStore) -> Result<ProductSummary, AppError> {
    Ok(product_summary(&list(store).await?))
}
