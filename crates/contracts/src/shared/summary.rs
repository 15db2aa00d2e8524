//! Summary cards shown above each list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a001_order::aggregate::{Order, PRODUCTION_LINES};
use crate::domain::a002_customer::aggregate::Customer;
use crate::domain::a003_product::aggregate::Product;
use crate::domain::a004_production_stage::aggregate::ProductionStage;
use crate::enums::{AccountStatus, Availability, OrderStatus, StageStatus};
use crate::shared::list::{sort_records, SortSpec};

const RECENT_ORDERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineLoad {
    pub line: String,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_orders: usize,
    pub by_status: Vec<StatusCount>,
    pub total_revenue: f64,
    pub average_order_value: f64,
    /// Due within three days and still open
    pub urgent_orders: usize,
    /// In-production orders per production line
    pub line_load: Vec<LineLoad>,
    /// Ids of the latest orders by order date
    pub recent_orders: Vec<String>,
}

impl OrderSummary {
    pub fn count(&self, status: OrderStatus) -> usize {
        self.by_status
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

pub fn order_summary(orders: &[Order], today: NaiveDate) -> OrderSummary {
    let total_orders = orders.len();
    let by_status = OrderStatus::all()
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: orders.iter().filter(|o| o.status == status).count(),
        })
        .collect();
    let total_revenue: f64 = orders.iter().map(|o| o.total_amount).sum();
    let average_order_value = if total_orders > 0 {
        total_revenue / total_orders as f64
    } else {
        0.0
    };
    let urgent_orders = orders.iter().filter(|o| o.is_urgent(today)).count();
    let line_load = PRODUCTION_LINES
        .iter()
        .map(|line| LineLoad {
            line: line.to_string(),
            orders: orders
                .iter()
                .filter(|o| {
                    o.status == OrderStatus::InProduction
                        && o.production_line.as_deref() == Some(*line)
                })
                .count(),
        })
        .collect();

    let mut recent: Vec<&Order> = orders.iter().collect();
    sort_records(&mut recent, &SortSpec::desc("orderDate"));
    let recent_orders = recent
        .into_iter()
        .take(RECENT_ORDERS)
        .map(|o| o.id.clone())
        .collect();

    OrderSummary {
        total_orders,
        by_status,
        total_revenue,
        average_order_value,
        urgent_orders,
        line_load,
        recent_orders,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub total_customers: usize,
    pub active_customers: usize,
    pub total_revenue: f64,
    pub total_orders: u64,
    /// Revenue over all orders, not over customers
    pub average_order_value: f64,
}

pub fn customer_summary(customers: &[Customer]) -> CustomerSummary {
    let total_revenue: f64 = customers.iter().map(|c| c.total_revenue).sum();
    let total_orders: u64 = customers.iter().map(|c| u64::from(c.total_orders)).sum();
    CustomerSummary {
        total_customers: customers.len(),
        active_customers: customers
            .iter()
            .filter(|c| c.account_status == AccountStatus::Active)
            .count(),
        total_revenue,
        total_orders,
        average_order_value: if total_orders > 0 {
            total_revenue / total_orders as f64
        } else {
            0.0
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub total_products: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub new_products: usize,
    pub total_stock_units: u64,
    /// Stock valued at base price
    pub inventory_value: f64,
}

pub fn product_summary(products: &[Product]) -> ProductSummary {
    let count = |availability: Availability| {
        products
            .iter()
            .filter(|p| p.availability == availability)
            .count()
    };
    ProductSummary {
        total_products: products.len(),
        in_stock: count(Availability::InStock),
        low_stock: count(Availability::LowStock),
        out_of_stock: count(Availability::OutOfStock),
        new_products: products.iter().filter(|p| p.is_new).count(),
        total_stock_units: products.iter().map(|p| u64::from(p.stock_level)).sum(),
        inventory_value: products
            .iter()
            .map(|p| p.base_price * f64::from(p.stock_level))
            .sum(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageLoad {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub active_orders: u32,
    pub utilization_rate: u8,
    pub status: StageStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOverview {
    pub stages: Vec<StageLoad>,
    pub orders_in_production: usize,
    pub delayed_stages: usize,
    pub blocked_stages: usize,
}

/// Live stage load: active orders are the open orders currently at the stage
pub fn stage_overview(stages: &[ProductionStage], orders: &[Order]) -> StageOverview {
    let mut ordered: Vec<&ProductionStage> = stages.iter().collect();
    ordered.sort_by_key(|s| s.sequence);

    let loads = ordered
        .into_iter()
        .map(|stage| {
            let active = orders
                .iter()
                .filter(|o| {
                    !o.status.is_closed()
                        && o.status != OrderStatus::Cancelled
                        && o.current_stage.as_deref() == Some(stage.id.as_str())
                })
                .count() as u32;
            let mut live = stage.clone();
            live.active_orders = active;
            StageLoad {
                id: stage.id.clone(),
                name: stage.name.clone(),
                capacity: stage.capacity,
                active_orders: active,
                utilization_rate: live.computed_utilization(),
                status: stage.status,
            }
        })
        .collect();

    StageOverview {
        stages: loads,
        orders_in_production: orders
            .iter()
            .filter(|o| o.status == OrderStatus::InProduction)
            .count(),
        delayed_stages: stages
            .iter()
            .filter(|s| s.status == StageStatus::Delayed)
            .count(),
        blocked_stages: stages
            .iter()
            .filter(|s| s.status == StageStatus::Blocked)
            .count(),
    }
}
