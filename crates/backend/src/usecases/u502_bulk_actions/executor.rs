use std::sync::Arc;

use chrono::NaiveDate;
use contracts::domain::a001_order::aggregate::Order;
use contracts::domain::a003_product::aggregate::Product;
use contracts::enums::{AccountStatus, OrderPriority, OrderStatus};
use contracts::shared::list::ListRecord;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u502_bulk_actions::{
    BulkActions, BulkOutcome, BulkRequest, CustomerBulkAction, OrderBulkAction, ProductBulkAction,
};
use serde::Serialize;

use crate::domain::{a001_order, a002_customer, a003_product};
use crate::shared::data::RemoteStore;
use crate::shared::error::AppError;
use crate::shared::export::{export_csv, ExportArtifact};

/// What a bulk action produced: a download or per-record results
#[derive(Debug)]
pub enum BulkResult {
    Artifact(ExportArtifact),
    Outcome(BulkOutcome),
}

/// Executor for actions applied to a selection of list rows.
///
/// Remote actions run one id at a time; a failing id is recorded and the
/// rest of the selection still runs.
pub struct BulkExecutor {
    store: Arc<dyn RemoteStore>,
}

impl BulkExecutor {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Order ids are order numbers
    pub async fn run_orders(&self, request: &BulkRequest, today: NaiveDate) -> Result<BulkResult, AppError> {
        check_selection(request)?;
        let action = OrderBulkAction::parse(&request.action).ok_or_else(|| unknown_action(request))?;
        let store = self.store.as_ref();

        let step = match action {
            OrderBulkAction::Export => {
                let orders = a001_order::service::list(store).await?;
                return export_selection(&orders, &request.ids, a001_order::service::EXPORT_NAME);
            }
            OrderBulkAction::Duplicate => Step::Duplicate,
            OrderBulkAction::Delete => Step::Delete,
            OrderBulkAction::UpdateStatus(status) => Step::Change(OrderChange::Status(status)),
            OrderBulkAction::AssignLine(line) => Step::Change(OrderChange::Line(line)),
            OrderBulkAction::SetPriority(priority) => Step::Change(OrderChange::Priority(priority)),
        };

        let mut outcome = BulkOutcome::new(&request.action);
        for id in &request.ids {
            let result = match &step {
                Step::Change(change) => update_order(store, id, change).await,
                Step::Duplicate => a001_order::service::duplicate(store, id, today).await.map(|_| ()),
                Step::Delete => a001_order::service::delete(store, id).await,
            };
            record(&mut outcome, id, result);
        }
        finish(outcome)
    }

    pub async fn run_products(&self, request: &BulkRequest) -> Result<BulkResult, AppError> {
        check_selection(request)?;
        let action =
            ProductBulkAction::parse(&request.action).ok_or_else(|| unknown_action(request))?;
        let store = self.store.as_ref();

        let step = match action {
            ProductBulkAction::Export => {
                let products = a003_product::service::list(store).await?;
                return export_selection(&products, &request.ids, a003_product::service::EXPORT_NAME);
            }
            ProductBulkAction::Duplicate => Step::Duplicate,
            ProductBulkAction::Delete => Step::Delete,
            ProductBulkAction::AdjustPrice(percent) => Step::Change(ProductChange::Price(percent)),
            ProductBulkAction::ChangeCategory(category) => Step::Change(ProductChange::Category(category)),
        };

        let mut outcome = BulkOutcome::new(&request.action);
        for id in &request.ids {
            let result = match &step {
                Step::Change(change) => update_product(store, id, change).await,
                Step::Duplicate => a003_product::service::duplicate(store, id).await.map(|_| ()),
                Step::Delete => a003_product::service::delete(store, id).await,
            };
            record(&mut outcome, id, result);
        }
        finish(outcome)
    }

    pub async fn run_customers(&self, request: &BulkRequest) -> Result<BulkResult, AppError> {
        check_selection(request)?;
        let action =
            CustomerBulkAction::parse(&request.action).ok_or_else(|| unknown_action(request))?;
        let store = self.store.as_ref();

        let mut outcome = BulkOutcome::new(&request.action);
        match action {
            CustomerBulkAction::Export => {
                let customers = a002_customer::service::list(store).await?;
                return export_selection(&customers, &request.ids, a002_customer::service::EXPORT_NAME);
            }
            CustomerBulkAction::UpdateStatus(status) => {
                for id in &request.ids {
                    let result = update_customer_status(store, id, status).await;
                    record(&mut outcome, id, result);
                }
            }
            CustomerBulkAction::Delete => {
                for id in &request.ids {
                    let result = a002_customer::service::delete(store, id).await;
                    record(&mut outcome, id, result);
                }
            }
        }
        finish(outcome)
    }
}

/// Store-writing work applied to each selected id
enum Step<C> {
    Change(C),
    Duplicate,
    Delete,
}

/// Field edits a bulk action makes to an order
#[derive(Debug, Clone, PartialEq)]
enum OrderChange {
    Status(OrderStatus),
    Line(String),
    Priority(OrderPriority),
}

impl OrderChange {
    fn apply(&self, order: &mut Order) {
        match self {
            OrderChange::Status(status) => order.status = *status,
            OrderChange::Line(line) => order.production_line = Some(line.clone()),
            OrderChange::Priority(priority) => order.priority = *priority,
        }
    }
}

/// Field edits a bulk action makes to a product
#[derive(Debug, Clone, PartialEq)]
enum ProductChange {
    /// Relative, in percent
    Price(f64),
    Category(String),
}

impl ProductChange {
    fn apply(&self, product: &mut Product) {
        match self {
            ProductChange::Price(percent) => product.adjust_price(*percent),
            ProductChange::Category(category) => product.category = category.clone(),
        }
    }
}

async fn update_order(store: &dyn RemoteStore, id: &str, change: &OrderChange) -> Result<(), AppError> {
    let mut order = a001_order::service::get(store, id).await?;
    change.apply(&mut order);
    a001_order::service::save(store, &order).await?;
    Ok(())
}

async fn update_product(store: &dyn RemoteStore, id: &str, change: &ProductChange) -> Result<(), AppError> {
    let mut product = a003_product::service::get(store, id).await?;
    change.apply(&mut product);
    a003_product::service::save(store, &product).await?;
    Ok(())
}

async fn update_customer_status(
    store: &dyn RemoteStore,
    id: &str,
    status: AccountStatus,
) -> Result<(), AppError> {
    let mut customer = a002_customer::service::get(store, id).await?;
    customer.account_status = status;
    a002_customer::service::save(store, &customer).await?;
    Ok(())
}

fn check_selection(request: &BulkRequest) -> Result<(), AppError> {
    if request.ids.is_empty() {
        return Err(AppError::invalid("ids", "No records selected"));
    }
    Ok(())
}

fn unknown_action(request: &BulkRequest) -> AppError {
    AppError::invalid("action", format!("Unknown bulk action '{}'", request.action))
}

fn record(outcome: &mut BulkOutcome, id: &str, result: Result<(), AppError>) {
    match result {
        Ok(()) => outcome.ok(id),
        Err(e) => {
            tracing::warn!("Bulk {} failed for {}: {}", outcome.action, id, e);
            outcome.fail(id, e.to_string());
        }
    }
}

fn finish(outcome: BulkOutcome) -> Result<BulkResult, AppError> {
    tracing::info!(
        "{} {}: {} succeeded, {} failed",
        BulkActions::full_name(),
        outcome.action,
        outcome.succeeded.len(),
        outcome.failed.len()
    );
    Ok(BulkResult::Outcome(outcome))
}

/// CSV of the selected records, one body row per record found
fn export_selection<T: ListRecord + Serialize>(
    records: &[T],
    ids: &[String],
    name: &str,
) -> Result<BulkResult, AppError> {
    let selected: Vec<&T> = records
        .iter()
        .filter(|r| ids.contains(&r.record_id()))
        .collect();
    Ok(BulkResult::Artifact(export_csv(&selected, name, None)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::memory::MemoryStore;
    use contracts::domain::a001_order::aggregate::OrderDraft;
    use contracts::domain::a002_customer::aggregate::CustomerDraft;
    use contracts::domain::a003_product::aggregate::ProductDraft;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn request(action: &str, ids: &[&str]) -> BulkRequest {
        BulkRequest {
            action: action.to_string(),
            ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn outcome(result: BulkResult) -> BulkOutcome {
        match result {
            BulkResult::Outcome(outcome) => outcome,
            BulkResult::Artifact(a) => panic!("unexpected artifact {}", a.file_name),
        }
    }

    async fn seed_orders(store: &MemoryStore, count: usize) {
        for i in 0..count {
            let draft = OrderDraft {
                customer_name: format!("Customer {i}"),
                product_name: "Classic Crew Tee".into(),
                quantity: 10.0,
                unit_price: 5.0,
                ..Default::default()
            };
            a001_order::service::create(store, draft, today()).await.unwrap();
        }
    }

    async fn seed_products(store: &MemoryStore) -> Vec<String> {
        let mut ids = Vec::new();
        for (sku, price) in [("CT-001", 8.5), ("PH-002", 20.0), ("VT-003", 12.0), ("EC-004", 9.0)] {
            let draft = ProductDraft {
                sku: sku.into(),
                name: format!("Product {sku}"),
                category: "Basic".into(),
                base_price: price,
                stock_level: 500.0,
                sizes: vec!["S".into(), "M".into()],
                ..Default::default()
            };
            ids.push(a003_product::service::create(store, draft).await.unwrap().id);
        }
        ids
    }

    #[test]
    fn test_order_change_touches_only_its_field() {
        let mut order = OrderDraft {
            customer_name: "Urban Wear".into(),
            product_name: "Polo".into(),
            quantity: 4.0,
            unit_price: 10.0,
            ..Default::default()
        }
        .into_order("ORD-2024-010".into(), today());
        let before = order.clone();

        OrderChange::Line("Line C".into()).apply(&mut order);
        assert_eq!(order.production_line.as_deref(), Some("Line C"));
        assert_eq!(order.status, before.status);
        assert_eq!(order.priority, before.priority);

        OrderChange::Status(OrderStatus::QualityCheck).apply(&mut order);
        assert_eq!(order.status, OrderStatus::QualityCheck);
    }

    #[tokio::test]
    async fn test_order_status_update_collects_failures() {
        let store = Arc::new(MemoryStore::new());
        seed_orders(&store, 2).await;
        let executor = BulkExecutor::new(store.clone());

        let result = executor
            .run_orders(
                &request("update_status_shipped", &["ORD-2024-001", "ORD-2024-999", "ORD-2024-002"]),
                today(),
            )
            .await
            .unwrap();
        let outcome = outcome(result);
        assert_eq!(outcome.succeeded, vec!["ORD-2024-001", "ORD-2024-002"]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].id, "ORD-2024-999");

        let order = a001_order::service::get(store.as_ref(), "ORD-2024-002").await.unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_order_line_priority_duplicate_delete() {
        let store = Arc::new(MemoryStore::new());
        seed_orders(&store, 1).await;
        let executor = BulkExecutor::new(store.clone());
        let ids = ["ORD-2024-001"];

        executor.run_orders(&request("assign_line_line_b", &ids), today()).await.unwrap();
        executor.run_orders(&request("priority_high", &ids), today()).await.unwrap();
        let order = a001_order::service::get(store.as_ref(), "ORD-2024-001").await.unwrap();
        assert_eq!(order.production_line.as_deref(), Some("Line B"));
        assert_eq!(order.priority, OrderPriority::High);

        executor.run_orders(&request("duplicate", &ids), today()).await.unwrap();
        assert!(a001_order::service::get(store.as_ref(), "ORD-2024-002").await.is_ok());

        executor.run_orders(&request("delete", &ids), today()).await.unwrap();
        let remaining = a001_order::service::list(store.as_ref()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "ORD-2024-002");
    }

    #[tokio::test]
    async fn test_product_export_has_one_row_per_selected_record() {
        let store = Arc::new(MemoryStore::new());
        let ids = seed_products(&store).await;
        let executor = BulkExecutor::new(store);
        let selected: Vec<&str> = ids[..3].iter().map(String::as_str).collect();

        let result = executor
            .run_products(&request("export-data", &selected))
            .await
            .unwrap();
        let BulkResult::Artifact(artifact) = result else {
            panic!("expected an export artifact");
        };
        assert_eq!(artifact.file_name, "products-export.csv");

        let mut reader = csv::Reader::from_reader(artifact.bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert!(headers.iter().any(|h| h == "sku"));
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_product_price_and_category() {
        let store = Arc::new(MemoryStore::new());
        let ids = seed_products(&store).await;
        let executor = BulkExecutor::new(store.clone());
        let first = ids[0].as_str();

        executor.run_products(&request("update-price:10", &[first])).await.unwrap();
        executor
            .run_products(&request("change-category:Premium", &[first]))
            .await
            .unwrap();
        let product = a003_product::service::get(store.as_ref(), first).await.unwrap();
        assert_eq!(product.base_price, 9.35);
        assert_eq!(product.category, "Premium");
    }

    #[tokio::test]
    async fn test_customer_status_and_rejections() {
        let store = Arc::new(MemoryStore::new());
        let customer = a002_customer::service::create(
            store.as_ref(),
            CustomerDraft {
                company_name: "Trendy Threads".into(),
                contact_person: "Asha".into(),
                email: "asha@trendy.in".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let executor = BulkExecutor::new(store.clone());

        executor
            .run_customers(&request("update-status-suspended", &[customer.id.as_str()]))
            .await
            .unwrap();
        let loaded = a002_customer::service::get(store.as_ref(), &customer.id).await.unwrap();
        assert_eq!(loaded.account_status, AccountStatus::Suspended);

        let err = executor.run_customers(&request("archive", &[customer.id.as_str()])).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationFailure(_)));
        let err = executor.run_customers(&request("delete", &[])).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationFailure(_)));
    }
}
