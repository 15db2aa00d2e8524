use std::collections::BTreeMap;

use contracts::domain::a003_product::aggregate::Product;
use contracts::enums::Availability;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::data::row::{decode_row, encode_row, nullable, parse_timestamp, to_count};
use crate::shared::data::{RemoteStore, StoreRow};

pub const TABLE: &str = "products";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub sku: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub category: String,
    pub fabric_type: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub base_price: f64,
    #[serde(deserialize_with = "nullable")]
    pub stock_level: f64,
    /// Written for other readers of the table; recomputed on load
    pub availability: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub sizes: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub colors: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub variants: f64,
    #[serde(deserialize_with = "nullable")]
    pub minimum_order: f64,
    pub production_time: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub specifications: BTreeMap<String, Value>,
    #[serde(deserialize_with = "nullable")]
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ProductRow {
    pub fn to_domain(self, low_stock_threshold: u32) -> anyhow::Result<Product> {
        let stock_level = to_count(self.stock_level);
        // free-form values; non-text JSON keeps its literal form
        let specifications = self
            .specifications
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(text) => (key, text),
                other => (key, other.to_string()),
            })
            .collect();

        Ok(Product {
            id: self.id.unwrap_or_default(),
            sku: self.sku,
            name: self.name,
            category: self.category,
            fabric_type: self.fabric_type,
            base_price: self.base_price.max(0.0),
            stock_level,
            availability: Availability::from_stock(stock_level, low_stock_threshold),
            sizes: self.sizes,
            colors: self.colors,
            variants: to_count(self.variants),
            minimum_order: to_count(self.minimum_order),
            production_time: self.production_time,
            specifications,
            is_new: self.is_new,
            created_at: parse_timestamp(self.created_at.as_deref()),
        })
    }

    pub fn from_domain(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()).filter(|id| !id.is_empty()),
            sku: product.sku.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            fabric_type: product.fabric_type.clone(),
            base_price: product.base_price,
            stock_level: f64::from(product.stock_level),
            availability: Some(product.availability.code().to_string()),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
            variants: f64::from(product.variants),
            minimum_order: f64::from(product.minimum_order),
            production_time: product.production_time.clone(),
            specifications: product
                .specifications
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
            is_new: product.is_new,
            created_at: product.created_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

fn to_product(row: StoreRow, low_stock_threshold: u32) -> anyhow::Result<Product> {
    decode_row::<ProductRow>(TABLE, row)?.to_domain(low_stock_threshold)
}

fn write_row(product: &Product) -> anyhow::Result<StoreRow> {
    let mut row = ProductRow::from_domain(product);
    row.id = None;
    row.created_at = None;
    encode_row(&row)
}

pub async fn list_all(store: &dyn RemoteStore, low_stock_threshold: u32) -> anyhow::Result<Vec<Product>> {
    store
        .select_all(TABLE)
        .await?
        .into_iter()
        .map(|row| to_product(row, low_stock_threshold))
        .collect()
}

pub async fn insert(
    store: &dyn RemoteStore,
    product: &Product,
    low_stock_threshold: u32,
) -> anyhow::Result<Product> {
    to_product(store.insert(TABLE, write_row(product)?).await?, low_stock_threshold)
}

pub async fn update(
    store: &dyn RemoteStore,
    product: &Product,
    low_stock_threshold: u32,
) -> anyhow::Result<Product> {
    to_product(
        store.update(TABLE, &product.id, write_row(product)?).await?,
        low_stock_threshold,
    )
}

pub async fn delete(store: &dyn RemoteStore, id: &str) -> anyhow::Result<bool> {
    store.delete(TABLE, id).await
}
