use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;

use super::store::{RemoteStore, StoreRow};

/// Hosted PostgREST-compatible store (`/rest/v1/<table>`)
pub struct PostgrestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PostgrestStore {
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        if base_url.trim().is_empty() {
            anyhow::bail!("Store URL is required for the postgrest store (set DASHBOARD_STORE_URL)");
        }
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// `?id=eq.<id>` row filter
    fn row_url(&self, table: &str, id: &str) -> String {
        format!("{}?id=eq.{}", self.table_url(table), urlencoding::encode(id))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
    }

    async fn checked(response: Response, what: &str) -> anyhow::Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Store {} failed with status {}: {}", what, status, body);
        anyhow::bail!("Store {} failed with status {}: {}", what, status, body)
    }

    /// `return=representation` answers with an array of the affected rows
    async fn single_row(response: Response, what: &str) -> anyhow::Result<StoreRow> {
        let rows: Vec<StoreRow> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Store {} returned no row", what))
    }
}

#[async_trait]
impl RemoteStore for PostgrestStore {
    async fn select_all(&self, table: &str) -> anyhow::Result<Vec<StoreRow>> {
        let url = format!("{}?select=*&order=created_at.desc", self.table_url(table));
        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::checked(response, &format!("select on {}", table)).await?;
        Ok(response.json().await?)
    }

    async fn insert(&self, table: &str, row: StoreRow) -> anyhow::Result<StoreRow> {
        let what = format!("insert into {}", table);
        let response = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&[Value::Object(row)])
            .send()
            .await?;
        let response = Self::checked(response, &what).await?;
        Self::single_row(response, &what).await
    }

    async fn update(&self, table: &str, id: &str, patch: StoreRow) -> anyhow::Result<StoreRow> {
        let what = format!("update of {} {}", table, id);
        let response = self
            .authorized(self.client.patch(self.row_url(table, id)))
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        let response = Self::checked(response, &what).await?;
        Self::single_row(response, &what).await
    }

    async fn delete(&self, table: &str, id: &str) -> anyhow::Result<bool> {
        let what = format!("delete of {} {}", table, id);
        let response = self
            .authorized(self.client.delete(self.row_url(table, id)))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let response = Self::checked(response, &what).await?;
        let rows: Vec<StoreRow> = response.json().await?;
        Ok(!rows.is_empty())
    }
}
