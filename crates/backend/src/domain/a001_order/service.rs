use chrono::{Datelike, NaiveDate};
use contracts::domain::a001_order::aggregate::{next_order_number, Order, OrderDraft};
use contracts::domain::a004_production_stage::aggregate::stage_sequence;
use contracts::domain::common::AggregateRoot;
use contracts::enums::OrderStatus;
use contracts::shared::summary::{order_summary, OrderSummary};

use super::repository;
use crate::domain::a004_production_stage;
use crate::shared::data::RemoteStore;
use crate::shared::error::AppError;

/// Download name of orders CSV exports
pub const EXPORT_NAME: &str = "orders-export";

pub async fn list(store: &dyn RemoteStore) -> Result<Vec<Order>, AppError> {
    Ok(repository::list_all(store).await?)
}

/// Order by order number, or by store id
pub async fn get(store: &dyn RemoteStore, id: &str) -> Result<Order, AppError> {
    list(store)
        .await?
        .into_iter()
        .find(|o| o.id == id || o.db_id.as_deref() == Some(id))
        .ok_or_else(|| not_found(id))
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("{} {}", Order::element_name(), id))
}

/// Validates the draft, numbers the order when it has no number and inserts it
pub async fn create(store: &dyn RemoteStore, draft: OrderDraft, today: NaiveDate) -> Result<Order, AppError> {
    draft.validate().map_err(AppError::ValidationFailure)?;

    let existing = list(store).await?;
    let requested = draft
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    let order_number = match requested {
        Some(number) => {
            if existing.iter().any(|o| o.id == number) {
                return Err(AppError::invalid(
                    "id",
                    format!("Order number {} already exists", number),
                ));
            }
            number
        }
        None => next_order_number(existing.iter().map(|o| o.id.as_str()), today.year()),
    };

    let order = draft.into_order(order_number, today);
    let created = repository::insert(store, &order).await?;
    tracing::info!("Created order {}", created.id);
    Ok(created)
}

pub async fn update(
    store: &dyn RemoteStore,
    id: &str,
    draft: OrderDraft,
    today: NaiveDate,
) -> Result<Order, AppError> {
    draft.validate().map_err(AppError::ValidationFailure)?;
    let existing = get(store, id).await?;
    let updated = repository::update(store, &draft.apply_to(&existing, today)).await?;
    tracing::info!("Updated order {}", updated.id);
    Ok(updated)
}

/// Writes an order changed in place (bulk status, line or priority changes)
pub async fn save(store: &dyn RemoteStore, order: &Order) -> Result<Order, AppError> {
    Ok(repository::update(store, order).await?)
}

pub async fn delete(store: &dyn RemoteStore, id: &str) -> Result<(), AppError> {
    let order = get(store, id).await?;
    let db_id = order.db_id.as_deref().unwrap_or(order.id.as_str());
    if !repository::delete(store, db_id).await? {
        return Err(not_found(id));
    }
    tracing::info!("Deleted order {}", order.id);
    Ok(())
}

/// Copy under the next free order number, back at the start of the workflow
pub async fn duplicate(store: &dyn RemoteStore, id: &str, today: NaiveDate) -> Result<Order, AppError> {
    let source = get(store, id).await?;
    let mut draft = OrderDraft::from(&source);
    draft.id = None;
    draft.status = Some(OrderStatus::Pending);
    draft.progress = Some(0.0);
    draft.order_date = Some(today);
    if draft.due_date.is_some_and(|due| due < today) {
        draft.due_date = None;
    }
    create(store, draft, today).await
}

/// Moves the order to a defined production stage and rebuilds its timeline
pub async fn move_to_stage(
    store: &dyn RemoteStore,
    id: &str,
    stage_id: &str,
    today: NaiveDate,
) -> Result<Order, AppError> {
    let stages = a004_production_stage::service::list(store).await?;
    let sequence = stage_sequence(&stages);
    let mut order = get(store, id).await?;
    order
        .move_to_stage(&sequence, stage_id, today)
        .map_err(|e| AppError::ValidationFailure(vec![e]))?;
    let saved = repository::update(store, &order).await?;
    tracing::info!("Order {} moved to stage {}", saved.id, stage_id);
    Ok(saved)
}

pub async fn summary(store: &dyn RemoteStore, today: NaiveDate) -> Result<OrderSummary, AppError> {
    let orders = list(store).await?;
    Ok(order_summary(&orders, today))
}
