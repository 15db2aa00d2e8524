use std::sync::Arc;

use chrono::{DateTime, Utc};
use contracts::domain::a001_order::aggregate::Order;
use contracts::enums::OrderStatus;
use contracts::shared::format::{format_currency, format_date, format_percent};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u503_generate_report::{GenerateReport, ReportKind};

use crate::domain::a001_order;
use crate::shared::data::RemoteStore;
use crate::shared::error::AppError;
use crate::shared::export::{export_pdf, ExportArtifact, PdfColumn};

fn sales_columns() -> Vec<PdfColumn<Order>> {
    vec![
        PdfColumn::key("Order ID", "id"),
        PdfColumn::key("Customer", "customerName"),
        PdfColumn::derive("Date", |o: &Order| format_date(o.order_date)),
        // builtin PDF fonts have no rupee glyph
        PdfColumn::derive("Total (INR)", |o: &Order| {
            format_currency(o.total_amount).replace('₹', "")
        }),
        PdfColumn::derive("Status", |o: &Order| o.status.display_name().to_string()),
    ]
}

fn production_columns() -> Vec<PdfColumn<Order>> {
    vec![
        PdfColumn::key("Order ID", "id"),
        PdfColumn::key("Product", "productName"),
        PdfColumn::key("Line", "productionLine"),
        PdfColumn::derive("Due Date", |o: &Order| format_date(o.due_date)),
        PdfColumn::derive("Progress", |o: &Order| format_percent(o.progress)),
    ]
}

/// Orders still to be produced
fn in_production_scope(order: &Order) -> bool {
    matches!(order.status, OrderStatus::Pending | OrderStatus::InProduction)
}

/// Executor for the PDF reports of the reports dialog
pub struct ReportExecutor {
    store: Arc<dyn RemoteStore>,
}

impl ReportExecutor {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    pub async fn generate(&self, kind: ReportKind, now: DateTime<Utc>) -> Result<ExportArtifact, AppError> {
        let orders = a001_order::service::list(self.store.as_ref()).await?;
        let (columns, rows): (Vec<PdfColumn<Order>>, Vec<&Order>) = match kind {
            ReportKind::Sales => (sales_columns(), orders.iter().collect()),
            ReportKind::Production => (
                production_columns(),
                orders.iter().filter(|o| in_production_scope(o)).collect(),
            ),
            ReportKind::Inventory => {
                return Err(AppError::invalid(
                    "kind",
                    format!("{} is not available yet", kind.title()),
                ))
            }
        };

        tracing::info!(
            "{}: {} over {} orders",
            GenerateReport::full_name(),
            kind.code(),
            rows.len()
        );
        export_pdf(&rows, &columns, kind.title(), kind.file_stem(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::memory::MemoryStore;
    use chrono::NaiveDate;
    use contracts::domain::a001_order::aggregate::OrderDraft;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T09:30:00Z").unwrap().with_timezone(&Utc)
    }

    fn order(status: OrderStatus, amount: f64) -> Order {
        OrderDraft {
            customer_name: "Trendy Threads".into(),
            product_name: "Vintage Tee".into(),
            quantity: 1.0,
            unit_price: amount,
            status: Some(status),
            production_line: Some("Line A".into()),
            ..Default::default()
        }
        .into_order("ORD-2024-001".into(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    #[test]
    fn test_report_columns() {
        let open = order(OrderStatus::InProduction, 125000.0);
        let sales = sales_columns();
        assert_eq!(sales.len(), 5);
        assert_eq!(sales[3].header, "Total (INR)");
        assert!(matches!(sales[0].value, crate::shared::export::ColumnValue::Key("id")));
        if let crate::shared::export::ColumnValue::Derive(total) = &sales[3].value {
            assert_eq!(total(&open), "1,25,000");
        }
        assert!(in_production_scope(&open));
        assert!(!in_production_scope(&order(OrderStatus::Shipped, 1.0)));
    }

    #[tokio::test]
    async fn test_generate_reports() {
        let store = Arc::new(MemoryStore::new());
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        for _ in 0..3 {
            let draft = OrderDraft {
                customer_name: "Urban Style".into(),
                product_name: "Hoodie".into(),
                quantity: 20.0,
                unit_price: 15.0,
                ..Default::default()
            };
            a001_order::service::create(store.as_ref(), draft, today).await.unwrap();
        }
        let executor = ReportExecutor::new(store);

        let sales = executor.generate(ReportKind::Sales, now()).await.unwrap();
        assert_eq!(sales.file_name, "sales_report.pdf");
        assert!(sales.bytes.starts_with(b"%PDF"));

        let production = executor.generate(ReportKind::Production, now()).await.unwrap();
        assert_eq!(production.file_name, "production_report.pdf");

        let err = executor.generate(ReportKind::Inventory, now()).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationFailure(_)));
    }
}
