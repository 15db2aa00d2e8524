use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::store::{merge_patch, row_id, stamp_new_row, RemoteStore, StoreRow};

/// Every entity row is kept as a JSON document in one table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "store_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub table_name: String,
    pub data: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    fn row(&self) -> anyhow::Result<StoreRow> {
        match serde_json::from_str::<Value>(&self.data)? {
            Value::Object(row) => Ok(row),
            _ => anyhow::bail!("record {} is not a JSON object", self.id),
        }
    }
}

/// SQLite-backed record store
pub struct SqliteStore {
    conn: DatabaseConnection,
}

impl SqliteStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find(&self, table: &str, id: &str) -> anyhow::Result<Option<Model>> {
        Ok(Entity::find_by_id(id.to_string())
            .filter(Column::TableName.eq(table))
            .one(&self.conn)
            .await?)
    }
}

#[async_trait]
impl RemoteStore for SqliteStore {
    async fn select_all(&self, table: &str) -> anyhow::Result<Vec<StoreRow>> {
        Entity::find()
            .filter(Column::TableName.eq(table))
            .order_by_desc(Column::CreatedAt)
            .all(&self.conn)
            .await?
            .iter()
            .map(Model::row)
            .collect()
    }

    async fn insert(&self, table: &str, mut row: StoreRow) -> anyhow::Result<StoreRow> {
        stamp_new_row(&mut row);
        let id = row_id(&row).unwrap_or_default().to_string();
        let created_at = row
            .get("created_at")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let active = ActiveModel {
            id: Set(id.clone()),
            table_name: Set(table.to_string()),
            data: Set(serde_json::to_string(&row)?),
            created_at: Set(created_at),
        };
        active.insert(&self.conn).await?;

        tracing::debug!("Inserted {} row {}", table, id);
        Ok(row)
    }

    async fn update(&self, table: &str, id: &str, patch: StoreRow) -> anyhow::Result<StoreRow> {
        let model = self
            .find(table, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("no row with id '{}' in {}", id, table))?;
        let mut row = model.row()?;
        merge_patch(&mut row, patch);

        let mut active: ActiveModel = model.into();
        active.data = Set(serde_json::to_string(&row)?);
        active.update(&self.conn).await?;
        Ok(row)
    }

    async fn delete(&self, table: &str, id: &str) -> anyhow::Result<bool> {
        let result = Entity::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::TableName.eq(table))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect;
    use serde_json::json;

    async fn store() -> SqliteStore {
        SqliteStore::new(connect("sqlite::memory:").await.unwrap())
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = store().await;
        let inserted = store
            .insert(
                "customers",
                json!({"company_name": "Trendy Threads", "created_at": "2024-01-01T00:00:00Z"})
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await
            .unwrap();
        store
            .insert(
                "customers",
                json!({"company_name": "Urban Style", "created_at": "2024-03-01T00:00:00Z"})
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await
            .unwrap();
        let id = inserted["id"].as_str().unwrap();

        let rows = store.select_all("customers").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["company_name"], "Urban Style");

        let updated = store
            .update(
                "customers",
                id,
                json!({"account_status": "suspended"}).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(updated["company_name"], "Trendy Threads");
        assert_eq!(updated["account_status"], "suspended");

        assert!(store.select_all("orders").await.unwrap().is_empty());
        assert!(store.update("orders", id, StoreRow::new()).await.is_err());
        assert!(store.delete("customers", id).await.unwrap());
        assert_eq!(store.select_all("customers").await.unwrap().len(), 1);
    }
}
