use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateRoot, FieldError, FieldErrors};
use crate::enums::StageStatus;
use crate::shared::list::{FieldValue, ListRecord};

/// Workshop stage an order passes through (cutting, sewing, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionStage {
    /// Stable slug, referenced by `Order::current_stage`
    pub id: String,
    pub name: String,
    /// Position in the workflow, lowest first
    pub sequence: u32,
    pub capacity: u32,
    pub active_orders: u32,
    /// Percent of capacity in use, 0-100
    pub utilization_rate: u8,
    pub avg_processing_time: Option<String>,
    pub status: StageStatus,
    #[serde(default)]
    pub operators: Vec<String>,
    pub description: Option<String>,
}

impl ProductionStage {
    /// Utilization recomputed from active orders and capacity
    pub fn computed_utilization(&self) -> u8 {
        if self.capacity == 0 {
            return 0;
        }
        let rate = f64::from(self.active_orders) * 100.0 / f64::from(self.capacity);
        rate.round().clamp(0.0, 100.0) as u8
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.require_text(&self.id, "id", "Stage id");
        errors.require_text(&self.name, "name", "Stage name");
        errors.check(
            self.utilization_rate <= 100,
            "utilizationRate",
            "Utilization rate must be between 0 and 100",
        );
        errors.into_result()
    }
}

/// Ordered ids of `stages`, the workflow an order timeline follows
pub fn stage_sequence(stages: &[ProductionStage]) -> Vec<&str> {
    let mut ordered: Vec<&ProductionStage> = stages.iter().collect();
    ordered.sort_by_key(|s| s.sequence);
    ordered.into_iter().map(|s| s.id.as_str()).collect()
}

/// The five workshop stages a fresh installation starts with
pub fn default_stages() -> Vec<ProductionStage> {
    #[rustfmt::skip]
    let seed: [(&str, &str, u32, &str, &[&str], &str); 5] = [
        ("cutting", "Cutting", 100, "2.5 hours", &["John Doe", "Jane Smith"], "Fabric cutting and pattern preparation"),
        ("sewing", "Sewing", 80, "4 hours", &["Mike Johnson", "Sarah Wilson", "Tom Brown"], "Stitching and assembly operations"),
        ("printing", "Printing", 60, "1.5 hours", &["Lisa Garcia", "David Lee"], "Screen printing and design application"),
        ("quality", "Quality Control", 40, "30 minutes", &["Emma Davis", "Chris Taylor"], "Quality inspection and approval"),
        ("packaging", "Packaging", 50, "20 minutes", &["Alex Rodriguez", "Maria Martinez"], "Final packaging and labeling"),
    ];

    seed.iter()
        .zip(1u32..)
        .map(|(&(id, name, capacity, avg, operators, description), sequence)| ProductionStage {
            id: id.to_string(),
            name: name.to_string(),
            sequence,
            capacity,
            active_orders: 0,
            utilization_rate: 0,
            avg_processing_time: Some(avg.to_string()),
            status: StageStatus::OnTime,
            operators: operators.iter().map(|o| o.to_string()).collect(),
            description: Some(description.to_string()),
        })
        .collect()
}

impl AggregateRoot for ProductionStage {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn description(&self) -> String {
        self.name.clone()
    }

    fn aggregate_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "production_stages"
    }

    fn element_name() -> &'static str {
        "Production Stage"
    }

    fn list_name() -> &'static str {
        "Production Stages"
    }
}

impl ListRecord for ProductionStage {
    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::text(&self.id),
            "name" => FieldValue::text(&self.name),
            "sequence" => FieldValue::Number(f64::from(self.sequence)),
            "capacity" => FieldValue::Number(f64::from(self.capacity)),
            "activeOrders" => FieldValue::Number(f64::from(self.active_orders)),
            "utilizationRate" => FieldValue::Number(f64::from(self.utilization_rate)),
            "avgProcessingTime" => FieldValue::opt_text(self.avg_processing_time.as_ref()),
            "status" => FieldValue::text(self.status.code()),
            "operators" => FieldValue::list(&self.operators),
            "description" => FieldValue::opt_text(self.description.as_ref()),
            _ => FieldValue::Missing,
        }
    }

    fn search_fields() -> &'static [&'static str] {
        &["name", "description"]
    }
}
