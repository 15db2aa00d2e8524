//! Boundary to the hosted record store.
//!
//! Rows cross the boundary as snake_case JSON objects. The store assigns `id`
//! (UUID v4) and `created_at` (RFC 3339) on insert; `select_all` returns the
//! newest rows first.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::shared::config::{Config, StoreKind};

/// One store row: a JSON object keyed by snake_case column names
pub type StoreRow = Map<String, Value>;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All rows of `table`, ordered by creation time descending
    async fn select_all(&self, table: &str) -> anyhow::Result<Vec<StoreRow>>;

    /// Inserts `row` and returns it as stored, with `id` and `created_at`
    async fn insert(&self, table: &str, row: StoreRow) -> anyhow::Result<StoreRow>;

    /// Merges `patch` into the row with `id` and returns the stored row
    async fn update(&self, table: &str, id: &str, patch: StoreRow) -> anyhow::Result<StoreRow>;

    /// `false` when no row had that id
    async fn delete(&self, table: &str, id: &str) -> anyhow::Result<bool>;
}

static STORE: OnceCell<Arc<dyn RemoteStore>> = OnceCell::new();

/// Builds the store named by the configuration and installs it process-wide
pub async fn init_store(config: &Config) -> anyhow::Result<()> {
    let store: Arc<dyn RemoteStore> = match config.store.kind {
        StoreKind::Sqlite => {
            let path = crate::shared::config::get_database_path(config);
            let conn = super::db::initialize_database(&path).await?;
            Arc::new(super::record_storage::SqliteStore::new(conn))
        }
        StoreKind::Postgrest => Arc::new(super::postgrest::PostgrestStore::new(
            &config.store.url,
            &config.store.api_key,
        )?),
        StoreKind::Memory => Arc::new(super::memory::MemoryStore::seeded()),
    };
    install_store(store);
    tracing::info!("Record store ready: {:?}", config.store.kind);
    Ok(())
}

/// First installation wins; later calls keep the existing store
pub fn install_store(store: Arc<dyn RemoteStore>) {
    if STORE.set(store).is_err() {
        tracing::warn!("Record store already initialized");
    }
}

pub fn get_store() -> anyhow::Result<Arc<dyn RemoteStore>> {
    STORE
        .get()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Record store has not been initialized"))
}

/// Fills in the server-assigned columns of a row about to be inserted
pub(crate) fn stamp_new_row(row: &mut StoreRow) {
    let has_id = row
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    if !has_id {
        row.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
    }
    if row.get("created_at").map_or(true, Value::is_null) {
        row.insert("created_at".into(), Value::String(now_timestamp()));
    }
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// `id` column of a stored row
pub(crate) fn row_id(row: &StoreRow) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Patch application: every patch key replaces the stored value, `id` is kept
pub(crate) fn merge_patch(row: &mut StoreRow, patch: StoreRow) {
    for (key, value) in patch {
        if key != "id" {
            row.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stamp_new_row_keeps_existing_values() {
        let mut row = json!({"id": "fixed", "created_at": "2024-01-01T00:00:00Z"})
            .as_object()
            .cloned()
            .unwrap();
        stamp_new_row(&mut row);
        assert_eq!(row_id(&row), Some("fixed"));
        assert_eq!(row["created_at"], "2024-01-01T00:00:00Z");

        let mut fresh = StoreRow::new();
        fresh.insert("id".into(), json!(""));
        stamp_new_row(&mut fresh);
        assert_eq!(row_id(&fresh).map(str::len), Some(36));
        assert!(fresh["created_at"].is_string());
    }

    #[test]
    fn test_merge_patch_keeps_id() {
        let mut row = json!({"id": "a", "status": "pending"}).as_object().cloned().unwrap();
        let patch = json!({"id": "b", "status": "shipped"}).as_object().cloned().unwrap();
        merge_patch(&mut row, patch);
        assert_eq!(row["id"], "a");
        assert_eq!(row["status"], "shipped");
    }
}
