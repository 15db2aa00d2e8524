use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::import_row::{cell, cell_number, cell_string};
use crate::domain::common::{AggregateRoot, FieldError, FieldErrors, ImportRow};
use crate::enums::{OrderPriority, OrderStatus};
use crate::shared::list::{FieldValue, ListRecord, SortSpec};

/// Production lines an order can be assigned to
pub const PRODUCTION_LINES: &[&str] = &["Line A", "Line B", "Line C"];

/// Columns an order import file must carry
pub const IMPORT_REQUIRED_COLUMNS: &[&str] =
    &["customer_name", "product_name", "quantity", "unit_price"];

// ============================================================================
// Timeline
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStatus {
    Completed,
    InProgress,
    #[default]
    Pending,
}

/// One step of an order's production timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub stage: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: TimelineStatus,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Customer order for a batch of printed garments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-assigned UUID
    pub db_id: Option<String>,
    /// Order number shown in lists (`ORD-2024-001`)
    pub id: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub product_name: String,
    #[serde(rename = "design")]
    pub design_notes: Option<String>,
    pub quantity: u32,
    pub unit_price: f64,
    /// Always `quantity * unit_price`
    pub total_amount: f64,
    pub status: OrderStatus,
    pub priority: OrderPriority,
    pub order_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub production_line: Option<String>,
    pub assigned_to: Option<String>,
    pub progress: u8,
    pub specifications: Option<String>,
    pub current_stage: Option<String>,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Order list opens with the newest orders first
    pub fn default_sort() -> SortSpec {
        SortSpec::desc("orderDate")
    }

    pub fn derive_total(quantity: u32, unit_price: f64) -> f64 {
        f64::from(quantity) * unit_price
    }

    /// Whole days from `today` to the due date; negative when overdue
    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        self.due_date.map(|due| (due - today).num_days())
    }

    /// Due within three days (or overdue) and not yet completed or shipped
    pub fn is_urgent(&self, today: NaiveDate) -> bool {
        !self.status.is_closed() && self.days_until_due(today).is_some_and(|d| d <= 3)
    }

    /// Moves the order to `stage_id`.
    ///
    /// `stage_ids` is the ordered list of defined production stages. The
    /// timeline is rebuilt over it: earlier stages become completed, the
    /// target in progress (dated `today`), later ones pending. Dates already
    /// recorded are kept. A pending order enters production.
    pub fn move_to_stage(
        &mut self,
        stage_ids: &[&str],
        stage_id: &str,
        today: NaiveDate,
    ) -> Result<(), FieldError> {
        let target = stage_ids
            .iter()
            .position(|s| *s == stage_id)
            .ok_or_else(|| {
                FieldError::new(
                    "currentStage",
                    format!("'{}' is not a production stage", stage_id),
                )
            })?;

        let timeline = stage_ids
            .iter()
            .enumerate()
            .map(|(idx, stage)| {
                let recorded = self
                    .timeline
                    .iter()
                    .find(|e| e.stage == *stage)
                    .and_then(|e| e.date);
                let (status, date) = match idx.cmp(&target) {
                    std::cmp::Ordering::Less => (TimelineStatus::Completed, recorded),
                    std::cmp::Ordering::Equal => (TimelineStatus::InProgress, Some(today)),
                    std::cmp::Ordering::Greater => (TimelineStatus::Pending, None),
                };
                TimelineEvent {
                    stage: stage.to_string(),
                    date,
                    status,
                }
            })
            .collect();

        self.timeline = timeline;
        self.current_stage = Some(stage_id.to_string());
        if self.status == OrderStatus::Pending {
            self.status = OrderStatus::InProduction;
        }
        Ok(())
    }
}

/// Next free order number for `year`: `ORD-<year>-<seq>`, three digits minimum
pub fn next_order_number<'a>(existing: impl IntoIterator<Item = &'a str>, year: i32) -> String {
    let prefix = format!("ORD-{}-", year);
    let max_seq = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(&prefix))
        .filter_map(|seq| seq.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{:03}", prefix, max_seq + 1)
}

impl AggregateRoot for Order {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn description(&self) -> String {
        format!("{} - {}", self.customer_name, self.product_name)
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "orders"
    }

    fn element_name() -> &'static str {
        "Order"
    }

    fn list_name() -> &'static str {
        "Orders"
    }
}

impl ListRecord for Order {
    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::text(&self.id),
            "dbId" => FieldValue::opt_text(self.db_id.as_ref()),
            "customerName" => FieldValue::text(&self.customer_name),
            "customerEmail" => FieldValue::opt_text(self.customer_email.as_ref()),
            "productName" => FieldValue::text(&self.product_name),
            "design" => FieldValue::opt_text(self.design_notes.as_ref()),
            "quantity" => FieldValue::Number(f64::from(self.quantity)),
            "unitPrice" => FieldValue::Number(self.unit_price),
            "totalAmount" => FieldValue::Number(self.total_amount),
            "status" => FieldValue::text(self.status.code()),
            "priority" => FieldValue::text(self.priority.code()),
            "orderDate" => FieldValue::opt_date(self.order_date),
            "dueDate" => FieldValue::opt_date(self.due_date),
            "productionLine" => FieldValue::opt_text(self.production_line.as_ref()),
            "assignedTo" => FieldValue::opt_text(self.assigned_to.as_ref()),
            "progress" => FieldValue::Number(f64::from(self.progress)),
            "specifications" => FieldValue::opt_text(self.specifications.as_ref()),
            "currentStage" => FieldValue::opt_text(self.current_stage.as_ref()),
            "createdAt" => FieldValue::opt_timestamp(self.created_at),
            _ => FieldValue::Missing,
        }
    }

    fn search_fields() -> &'static [&'static str] {
        &["id", "customerName", "productName"]
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Order form state; numbers stay loose until validated
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDraft {
    /// Order number; assigned on create when empty
    pub id: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub product_name: String,
    pub design: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub status: Option<OrderStatus>,
    pub priority: Option<OrderPriority>,
    pub order_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub production_line: Option<String>,
    pub assigned_to: Option<String>,
    pub progress: Option<f64>,
    pub specifications: Option<String>,
}

impl OrderDraft {
    /// Every failed check at once
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.require_text(&self.customer_name, "customerName", "Customer name");
        errors.require_text(&self.product_name, "productName", "Product name");
        errors.require_non_negative(self.quantity, "quantity", "Quantity");
        errors.check(
            self.quantity.fract() == 0.0 && self.quantity <= f64::from(u32::MAX),
            "quantity",
            "Quantity must be a whole number",
        );
        errors.require_non_negative(self.unit_price, "unitPrice", "Unit price");
        if let Some(progress) = self.progress {
            errors.check(
                (0.0..=100.0).contains(&progress),
                "progress",
                "Progress must be between 0 and 100",
            );
        }
        if let (Some(ordered), Some(due)) = (self.order_date, self.due_date) {
            errors.check(due >= ordered, "dueDate", "Due date is before the order date");
        }
        if let Some(line) = self.production_line.as_deref() {
            errors.check(
                line.is_empty() || PRODUCTION_LINES.contains(&line),
                "productionLine",
                "Unknown production line",
            );
        }
        errors.into_result()
    }

    /// Builds the order this draft describes. Call after `validate`.
    pub fn into_order(self, order_number: String, today: NaiveDate) -> Order {
        let quantity = self.quantity.max(0.0) as u32;
        let unit_price = self.unit_price.max(0.0);
        Order {
            db_id: None,
            id: order_number,
            customer_name: self.customer_name.trim().to_string(),
            customer_email: non_empty(self.customer_email),
            product_name: self.product_name.trim().to_string(),
            design_notes: non_empty(self.design),
            quantity,
            unit_price,
            total_amount: Order::derive_total(quantity, unit_price),
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            order_date: self.order_date.or(Some(today)),
            due_date: self.due_date,
            production_line: non_empty(self.production_line),
            assigned_to: non_empty(self.assigned_to),
            progress: self.progress.unwrap_or(0.0).round().clamp(0.0, 100.0) as u8,
            specifications: non_empty(self.specifications),
            current_stage: None,
            timeline: Vec::new(),
            created_at: None,
        }
    }

    /// Applies the draft onto a loaded order, keeping its identity and timeline
    pub fn apply_to(self, order: &Order, today: NaiveDate) -> Order {
        let order_date = self.order_date.or(order.order_date);
        let mut updated = self.into_order(order.id.clone(), today);
        updated.db_id = order.db_id.clone();
        updated.order_date = order_date.or(updated.order_date);
        updated.current_stage = order.current_stage.clone();
        updated.timeline = order.timeline.clone();
        updated.created_at = order.created_at;
        updated
    }

    /// Draft from an imported row with snake_case headers
    pub fn from_import_row(row: &ImportRow) -> Result<Self, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let quantity = cell_number(row, "quantity", &mut errors).unwrap_or(0.0);
        let unit_price = cell_number(row, "unit_price", &mut errors).unwrap_or(0.0);
        let progress = cell_number(row, "progress", &mut errors);

        let status = match cell(row, "status") {
            Some(code) => {
                let parsed = OrderStatus::from_code(code);
                errors.check(parsed.is_some(), "status", &format!("Unknown status '{}'", code));
                parsed
            }
            None => None,
        };
        let priority = match cell(row, "priority") {
            Some(code) => {
                let parsed = OrderPriority::from_code(&code.to_ascii_lowercase());
                errors.check(
                    parsed.is_some(),
                    "priority",
                    &format!("Unknown priority '{}'", code),
                );
                parsed
            }
            None => None,
        };
        let order_date = import_date(row, "order_date", &mut errors);
        let due_date = import_date(row, "due_date", &mut errors);
        errors.into_result()?;

        Ok(Self {
            id: cell_string(row, "order_number"),
            customer_name: cell_string(row, "customer_name").unwrap_or_default(),
            customer_email: cell_string(row, "customer_email"),
            product_name: cell_string(row, "product_name").unwrap_or_default(),
            design: cell_string(row, "design_notes"),
            quantity,
            unit_price,
            status,
            priority,
            order_date,
            due_date,
            production_line: cell_string(row, "production_line"),
            assigned_to: cell_string(row, "assigned_to"),
            progress,
            specifications: cell_string(row, "specifications"),
        })
    }
}

impl From<&Order> for OrderDraft {
    fn from(order: &Order) -> Self {
        Self {
            id: Some(order.id.clone()),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            product_name: order.product_name.clone(),
            design: order.design_notes.clone(),
            quantity: f64::from(order.quantity),
            unit_price: order.unit_price,
            status: Some(order.status),
            priority: Some(order.priority),
            order_date: order.order_date,
            due_date: order.due_date,
            production_line: order.production_line.clone(),
            assigned_to: order.assigned_to.clone(),
            progress: Some(f64::from(order.progress)),
            specifications: order.specifications.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn import_date(row: &ImportRow, key: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let raw = cell(row, key)?;
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok();
    errors.check(parsed.is_some(), key, &format!("'{}' is not a date", raw));
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list::{filter_and_sort, FilterSpec};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(id: &str, status: OrderStatus) -> Order {
        OrderDraft {
            customer_name: "Fashion Forward Inc.".into(),
            product_name: "Premium Cotton T-Shirt".into(),
            quantity: 500.0,
            unit_price: 12.5,
            status: Some(status),
            order_date: Some(date(2024, 1, 10)),
            due_date: Some(date(2024, 1, 20)),
            ..Default::default()
        }
        .into_order(id.to_string(), date(2024, 1, 10))
    }

    #[test]
    fn test_status_filter_keeps_relative_order() {
        let orders = vec![
            order("ORD-2024-001", OrderStatus::Pending),
            order("ORD-2024-002", OrderStatus::Pending),
            order("ORD-2024-003", OrderStatus::InProduction),
            order("ORD-2024-004", OrderStatus::Completed),
            order("ORD-2024-005", OrderStatus::Shipped),
        ];
        let filter = FilterSpec::new().equals("status", "pending");
        let visible = filter_and_sort(&orders, &filter, None);
        let ids: Vec<&str> = visible.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["ORD-2024-001", "ORD-2024-002"]);
    }

    #[test]
    fn test_default_sort_newest_order_first() {
        let mut early = order("ORD-2024-001", OrderStatus::Pending);
        early.order_date = Some(date(2024, 1, 2));
        let mut late = order("ORD-2024-002", OrderStatus::Pending);
        late.order_date = Some(date(2024, 1, 12));
        let orders = vec![early, late];
        let sort = Order::default_sort();
        let visible = filter_and_sort(&orders, &FilterSpec::new(), Some(&sort));
        assert_eq!(visible[0].id, "ORD-2024-002");
    }

    #[test]
    fn test_total_is_derived() {
        let o = order("ORD-2024-001", OrderStatus::Pending);
        assert_eq!(o.total_amount, 6250.0);
        let json = serde_json::to_value(&o).unwrap();
        assert_eq!(json["totalAmount"], 6250.0);
        assert_eq!(json["status"], "pending");
        assert!(json.get("design").is_some());
    }

    #[test]
    fn test_draft_validation_reports_every_field() {
        let draft = OrderDraft {
            customer_name: " ".into(),
            product_name: String::new(),
            quantity: -5.0,
            unit_price: -1.0,
            progress: Some(120.0),
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["customerName", "productName", "quantity", "unitPrice", "progress"]
        );
    }

    #[test]
    fn test_urgency() {
        let today = date(2024, 1, 17);
        let mut o = order("ORD-2024-001", OrderStatus::InProduction);
        assert!(o.is_urgent(today));
        o.due_date = Some(date(2024, 1, 21));
        assert!(!o.is_urgent(today));
        o.due_date = Some(date(2024, 1, 10));
        assert!(o.is_urgent(today));
        o.status = OrderStatus::Shipped;
        assert!(!o.is_urgent(today));
        o.status = OrderStatus::Pending;
        o.due_date = None;
        assert!(!o.is_urgent(today));
    }

    #[test]
    fn test_move_to_stage() {
        let stages = ["cutting", "sewing", "printing", "quality", "packaging"];
        let today = date(2024, 1, 17);
        let mut o = order("ORD-2024-001", OrderStatus::Pending);
        o.move_to_stage(&stages, "sewing", today).unwrap();
        assert_eq!(o.current_stage.as_deref(), Some("sewing"));
        assert_eq!(o.status, OrderStatus::InProduction);
        assert_eq!(o.timeline.len(), 5);
        assert_eq!(o.timeline[0].status, TimelineStatus::Completed);
        assert_eq!(o.timeline[1].status, TimelineStatus::InProgress);
        assert_eq!(o.timeline[1].date, Some(today));
        assert_eq!(o.timeline[4].status, TimelineStatus::Pending);

        let err = o.move_to_stage(&stages, "dyeing", today).unwrap_err();
        assert_eq!(err.field, "currentStage");
        assert_eq!(o.current_stage.as_deref(), Some("sewing"));
    }

    #[test]
    fn test_next_order_number() {
        let ids = ["ORD-2024-001", "ORD-2024-017", "ORD-2023-099", "custom"];
        assert_eq!(next_order_number(ids, 2024), "ORD-2024-018");
        assert_eq!(next_order_number(ids, 2025), "ORD-2025-001");
    }

    #[test]
    fn test_from_import_row() {
        let row: ImportRow = [
            ("customer_name", "Urban Style Co."),
            ("product_name", "Organic Tee"),
            ("quantity", "300"),
            ("unit_price", "9.5"),
            ("priority", "High"),
            ("due_date", "2024-02-01"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let draft = OrderDraft::from_import_row(&row).unwrap();
        assert_eq!(draft.quantity, 300.0);
        assert_eq!(draft.priority, Some(OrderPriority::High));
        assert!(draft.validate().is_ok());

        let mut bad = row.clone();
        bad.insert("status".into(), "lost".into());
        bad.insert("due_date".into(), "someday".into());
        let errors = OrderDraft::from_import_row(&bad).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
