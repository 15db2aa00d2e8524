use contracts::domain::a004_production_stage::aggregate::{default_stages, ProductionStage};
use contracts::enums::StageStatus;
use serde::{Deserialize, Serialize};

use crate::shared::data::row::{decode_row, encode_row, nullable, parse_enum, to_count};
use crate::shared::data::{RemoteStore, StoreRow};

pub const TABLE: &str = "production_stages";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionStageRow {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub sequence: f64,
    #[serde(deserialize_with = "nullable")]
    pub capacity: f64,
    #[serde(deserialize_with = "nullable")]
    pub active_orders: f64,
    #[serde(deserialize_with = "nullable")]
    pub utilization_rate: f64,
    pub avg_processing_time: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub operators: Vec<String>,
    pub description: Option<String>,
}

impl ProductionStageRow {
    pub fn to_domain(self) -> anyhow::Result<ProductionStage> {
        let status = if self.status.is_empty() {
            StageStatus::default()
        } else {
            parse_enum(TABLE, "status", &self.status, StageStatus::from_code)?
        };
        Ok(ProductionStage {
            id: self.id,
            name: self.name,
            sequence: to_count(self.sequence),
            capacity: to_count(self.capacity),
            active_orders: to_count(self.active_orders),
            utilization_rate: to_count(self.utilization_rate).min(100) as u8,
            avg_processing_time: self.avg_processing_time,
            status,
            operators: self.operators,
            description: self.description,
        })
    }

    pub fn from_domain(stage: &ProductionStage) -> Self {
        Self {
            id: stage.id.clone(),
            name: stage.name.clone(),
            sequence: f64::from(stage.sequence),
            capacity: f64::from(stage.capacity),
            active_orders: f64::from(stage.active_orders),
            utilization_rate: f64::from(stage.utilization_rate),
            avg_processing_time: stage.avg_processing_time.clone(),
            status: stage.status.code().to_string(),
            operators: stage.operators.clone(),
            description: stage.description.clone(),
        }
    }
}

fn to_stage(row: StoreRow) -> anyhow::Result<ProductionStage> {
    decode_row::<ProductionStageRow>(TABLE, row)?.to_domain()
}

/// Rows of the default workflow, ready for insertion
pub fn default_rows() -> Vec<StoreRow> {
    default_stages()
        .iter()
        .filter_map(|stage| encode_row(&ProductionStageRow::from_domain(stage)).ok())
        .collect()
}

pub async fn list_all(store: &dyn RemoteStore) -> anyhow::Result<Vec<ProductionStage>> {
    let mut stages = store
        .select_all(TABLE)
        .await?
        .into_iter()
        .map(to_stage)
        .collect::<anyhow::Result<Vec<_>>>()?;
    stages.sort_by_key(|s| s.sequence);
    Ok(stages)
}

pub async fn insert(store: &dyn RemoteStore, stage: &ProductionStage) -> anyhow::Result<ProductionStage> {
    let row = encode_row(&ProductionStageRow::from_domain(stage))?;
    to_stage(store.insert(TABLE, row).await?)
}

pub async fn update(store: &dyn RemoteStore, stage: &ProductionStage) -> anyhow::Result<ProductionStage> {
    let row = encode_row(&ProductionStageRow::from_domain(stage))?;
    to_stage(store.update(TABLE, &stage.id, row).await?)
}

pub async fn delete(store: &dyn RemoteStore, id: &str) -> anyhow::Result<bool> {
    store.delete(TABLE, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rows_map_back() {
        let rows = default_rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0]["status"], "on-time");
        let stage = to_stage(rows[1].clone()).unwrap();
        assert_eq!(stage.id, "sewing");
        assert_eq!(stage.operators.len(), 3);
    }

    #[test]
    fn test_unknown_stage_status_fails() {
        let row = serde_json::json!({"id": "cutting", "status": "paused"})
            .as_object()
            .cloned()
            .unwrap();
        assert!(to_stage(row).is_err());
    }
}
