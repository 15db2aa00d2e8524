use contracts::domain::a001_order::aggregate::{Order, TimelineEvent};
use contracts::enums::{OrderPriority, OrderStatus};
use serde::{Deserialize, Serialize};

use crate::shared::data::row::{
    decode_row, encode_row, format_date, nullable, parse_date, parse_enum, parse_timestamp,
    to_count,
};
use crate::shared::data::{RemoteStore, StoreRow};

pub const TABLE: &str = "orders";

/// `orders` row as the store keeps it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub order_number: String,
    #[serde(deserialize_with = "nullable")]
    pub customer_name: String,
    pub customer_email: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub product_name: String,
    pub design_notes: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub quantity: f64,
    #[serde(deserialize_with = "nullable")]
    pub unit_price: f64,
    #[serde(deserialize_with = "nullable")]
    pub total_amount: f64,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub priority: String,
    pub order_date: Option<String>,
    pub due_date: Option<String>,
    pub production_line: Option<String>,
    pub assigned_to: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub progress: f64,
    pub specifications: Option<String>,
    pub current_stage: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub timeline: Vec<TimelineEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl OrderRow {
    pub fn to_domain(self) -> anyhow::Result<Order> {
        let status = if self.status.is_empty() {
            OrderStatus::default()
        } else {
            parse_enum(TABLE, "status", &self.status, OrderStatus::from_code)?
        };
        let priority = if self.priority.is_empty() {
            OrderPriority::default()
        } else {
            parse_enum(TABLE, "priority", &self.priority, OrderPriority::from_code)?
        };
        let quantity = to_count(self.quantity);
        let unit_price = self.unit_price.max(0.0);

        Ok(Order {
            db_id: self.id,
            id: self.order_number,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            product_name: self.product_name,
            design_notes: self.design_notes,
            quantity,
            unit_price,
            // stored totals are ignored; the product is authoritative
            total_amount: Order::derive_total(quantity, unit_price),
            status,
            priority,
            order_date: parse_date(TABLE, "order_date", self.order_date.as_deref())?,
            due_date: parse_date(TABLE, "due_date", self.due_date.as_deref())?,
            production_line: self.production_line,
            assigned_to: self.assigned_to,
            progress: to_count(self.progress).min(100) as u8,
            specifications: self.specifications,
            current_stage: self.current_stage,
            timeline: self.timeline,
            created_at: parse_timestamp(self.created_at.as_deref()),
        })
    }

    pub fn from_domain(order: &Order) -> Self {
        Self {
            id: order.db_id.clone(),
            order_number: order.id.clone(),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            product_name: order.product_name.clone(),
            design_notes: order.design_notes.clone(),
            quantity: f64::from(order.quantity),
            unit_price: order.unit_price,
            total_amount: Order::derive_total(order.quantity, order.unit_price),
            status: order.status.code().to_string(),
            priority: order.priority.code().to_string(),
            order_date: format_date(order.order_date),
            due_date: format_date(order.due_date),
            production_line: order.production_line.clone(),
            assigned_to: order.assigned_to.clone(),
            progress: f64::from(order.progress),
            specifications: order.specifications.clone(),
            current_stage: order.current_stage.clone(),
            timeline: order.timeline.clone(),
            created_at: order.created_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

fn to_order(row: StoreRow) -> anyhow::Result<Order> {
    decode_row::<OrderRow>(TABLE, row)?.to_domain()
}

pub async fn list_all(store: &dyn RemoteStore) -> anyhow::Result<Vec<Order>> {
    store
        .select_all(TABLE)
        .await?
        .into_iter()
        .map(to_order)
        .collect()
}

pub async fn insert(store: &dyn RemoteStore, order: &Order) -> anyhow::Result<Order> {
    let mut row = OrderRow::from_domain(order);
    row.id = None;
    row.created_at = None;
    to_order(store.insert(TABLE, encode_row(&row)?).await?)
}

/// Writes every column of `order`; `db_id` selects the row
pub async fn update(store: &dyn RemoteStore, order: &Order) -> anyhow::Result<Order> {
    let db_id = order
        .db_id
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("order {} has no store id", order.id))?;
    let mut row = OrderRow::from_domain(order);
    row.id = None;
    row.created_at = None;
    to_order(store.update(TABLE, db_id, encode_row(&row)?).await?)
}

pub async fn delete(store: &dyn RemoteStore, db_id: &str) -> anyhow::Result<bool> {
    store.delete(TABLE, db_id).await
}
