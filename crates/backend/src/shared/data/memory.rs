use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::store::{merge_patch, row_id, stamp_new_row, RemoteStore, StoreRow};

/// In-process store for tests and the demo configuration
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<StoreRow>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the default production stages
    pub fn seeded() -> Self {
        let store = Self::new();
        let stages = crate::domain::a004_production_stage::repository::default_rows();
        if let Ok(mut tables) = store.tables.write() {
            let rows = stages
                .into_iter()
                .map(|mut row| {
                    stamp_new_row(&mut row);
                    row
                })
                .collect();
            tables.insert(
                crate::domain::a004_production_stage::repository::TABLE.to_string(),
                rows,
            );
        }
        store
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow::anyhow!("memory store lock poisoned")
}

fn created_at(row: &StoreRow) -> &str {
    row.get("created_at").and_then(Value::as_str).unwrap_or("")
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn select_all(&self, table: &str) -> anyhow::Result<Vec<StoreRow>> {
        let tables = self.tables.read().map_err(poisoned)?;
        // Newest first; rows inserted within the same instant keep reverse insertion order
        let mut rows: Vec<StoreRow> = tables
            .get(table)
            .map(|rows| rows.iter().rev().cloned().collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| created_at(b).cmp(created_at(a)));
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: StoreRow) -> anyhow::Result<StoreRow> {
        stamp_new_row(&mut row);
        let mut tables = self.tables.write().map_err(poisoned)?;
        let rows = tables.entry(table.to_string()).or_default();
        if let Some(id) = row_id(&row) {
            if rows.iter().any(|r| row_id(r) == Some(id)) {
                anyhow::bail!("duplicate key value: id '{}' already exists in {}", id, table);
            }
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, id: &str, patch: StoreRow) -> anyhow::Result<StoreRow> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(id)))
            .ok_or_else(|| anyhow::anyhow!("no row with id '{}' in {}", id, table))?;
        merge_patch(row, patch);
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|r| row_id(r) != Some(id));
        Ok(rows.len() < before)
    }
}
