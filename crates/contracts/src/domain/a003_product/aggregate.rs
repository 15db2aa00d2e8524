use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::import_row::{cell, cell_flag, cell_list, cell_number, cell_string};
use crate::domain::common::{AggregateRoot, FieldError, FieldErrors, ImportRow};
use crate::enums::Availability;
use crate::shared::list::{FieldValue, ListRecord, SortSpec};

/// Columns a product import file must carry
pub const IMPORT_REQUIRED_COLUMNS: &[&str] = &["sku", "name", "category", "base_price"];

/// Catalog categories offered by the filter panel ("All" is the match-all entry)
pub const CATEGORIES: &[&str] = &["Basic", "Premium", "Athletic", "Vintage", "Eco-Friendly"];

pub const FABRIC_TYPES: &[&str] = &[
    "100% Cotton",
    "Cotton Blend",
    "Polyester Blend",
    "Organic Cotton",
];

/// Default bounds of the price slider
pub const PRICE_RANGE: (f64, f64) = (0.0, 1000.0);

// ============================================================================
// Aggregate Root
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned UUID
    pub id: String,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub fabric_type: Option<String>,
    pub base_price: f64,
    pub stock_level: u32,
    /// Derived from `stock_level` when the record is loaded or written
    pub availability: Availability,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    pub variants: u32,
    pub minimum_order: u32,
    pub production_time: Option<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    pub is_new: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Catalog opens sorted by name
    pub fn default_sort() -> SortSpec {
        SortSpec::asc("name")
    }

    /// Sort presets of the catalog page: `name`, `price`, `stock`, `newest`
    pub fn sort_preset(code: &str) -> Option<SortSpec> {
        match code {
            "name" => Some(SortSpec::asc("name")),
            "price" => Some(SortSpec::asc("basePrice")),
            "stock" => Some(SortSpec::desc("stockLevel")),
            "newest" => Some(SortSpec::desc("createdAt")),
            _ => None,
        }
    }

    /// Re-derives availability after the stock level changed
    pub fn refresh_availability(&mut self, low_stock_threshold: u32) {
        self.availability = Availability::from_stock(self.stock_level, low_stock_threshold);
    }

    /// Relative base price change; `10.0` raises by ten percent. Never below zero.
    pub fn adjust_price(&mut self, percent: f64) {
        let adjusted = self.base_price * (1.0 + percent / 100.0);
        self.base_price = (adjusted.max(0.0) * 100.0).round() / 100.0;
    }

    /// Copy for the catalog: fresh identity, `-COPY` SKU suffix, flagged new
    pub fn duplicate(&self) -> Product {
        Product {
            id: String::new(),
            sku: format!("{}-COPY", self.sku),
            name: format!("{} (Copy)", self.name),
            is_new: true,
            created_at: None,
            ..self.clone()
        }
    }
}

impl AggregateRoot for Product {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn description(&self) -> String {
        format!("{} ({})", self.name, self.sku)
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "products"
    }

    fn element_name() -> &'static str {
        "Product"
    }

    fn list_name() -> &'static str {
        "Products"
    }
}

impl ListRecord for Product {
    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::text(&self.id),
            "sku" => FieldValue::text(&self.sku),
            "name" => FieldValue::text(&self.name),
            "category" => FieldValue::text(&self.category),
            "fabricType" => FieldValue::opt_text(self.fabric_type.as_ref()),
            "basePrice" | "price" => FieldValue::Number(self.base_price),
            "stockLevel" | "stock" => FieldValue::Number(f64::from(self.stock_level)),
            "availability" => FieldValue::text(self.availability.code()),
            "sizes" => FieldValue::list(&self.sizes),
            "colors" => FieldValue::list(&self.colors),
            "variants" => FieldValue::Number(f64::from(self.variants)),
            "minimumOrder" => FieldValue::Number(f64::from(self.minimum_order)),
            "productionTime" => FieldValue::opt_text(self.production_time.as_ref()),
            "isNew" => FieldValue::text(if self.is_new { "true" } else { "false" }),
            "createdAt" | "newest" => FieldValue::opt_timestamp(self.created_at),
            _ => FieldValue::Missing,
        }
    }

    fn search_fields() -> &'static [&'static str] {
        &["name", "sku", "category"]
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub fabric_type: Option<String>,
    pub base_price: f64,
    pub stock_level: f64,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    /// Defaults to sizes × colors
    pub variants: Option<f64>,
    pub minimum_order: Option<f64>,
    pub production_time: Option<String>,
    pub specifications: BTreeMap<String, String>,
    pub is_new: bool,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.require_text(&self.sku, "sku", "SKU");
        errors.require_text(&self.name, "name", "Product name");
        errors.require_text(&self.category, "category", "Category");
        errors.require_non_negative(self.base_price, "basePrice", "Base price");
        errors.require_count(self.stock_level, "stockLevel", "Stock level");
        if let Some(minimum) = self.minimum_order {
            errors.require_count(minimum, "minimumOrder", "Minimum order");
        }
        if let Some(variants) = self.variants {
            errors.require_count(variants, "variants", "Variants");
        }
        errors.into_result()
    }

    /// New product record; availability follows the stock level
    pub fn into_product(self, low_stock_threshold: u32) -> Product {
        let stock_level = self.stock_level.max(0.0) as u32;
        let variants = match self.variants {
            Some(v) => v.max(0.0) as u32,
            None => (self.sizes.len().max(1) * self.colors.len().max(1)) as u32,
        };
        Product {
            id: String::new(),
            sku: self.sku.trim().to_string(),
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            fabric_type: self
                .fabric_type
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty()),
            base_price: self.base_price.max(0.0),
            stock_level,
            availability: Availability::from_stock(stock_level, low_stock_threshold),
            sizes: self.sizes,
            colors: self.colors,
            variants,
            minimum_order: self.minimum_order.unwrap_or(0.0).max(0.0) as u32,
            production_time: self.production_time.filter(|p| !p.trim().is_empty()),
            specifications: self.specifications,
            is_new: self.is_new,
            created_at: None,
        }
    }

    pub fn apply_to(self, product: &Product, low_stock_threshold: u32) -> Product {
        let mut updated = self.into_product(low_stock_threshold);
        updated.id = product.id.clone();
        updated.created_at = product.created_at;
        updated
    }

    pub fn from_import_row(row: &ImportRow) -> Result<Self, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let base_price = cell_number(row, "base_price", &mut errors).unwrap_or(0.0);
        let stock_level = cell_number(row, "stock_level", &mut errors).unwrap_or(0.0);
        let variants = cell_number(row, "variants", &mut errors);
        let minimum_order = cell_number(row, "minimum_order", &mut errors);
        errors.into_result()?;

        // `key=value; key=value` free-form specification column
        let specifications = cell(row, "specifications")
            .map(|raw| {
                raw.split(';')
                    .filter_map(|pair| pair.split_once('='))
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                    .filter(|(k, _)| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            sku: cell_string(row, "sku").unwrap_or_default(),
            name: cell_string(row, "name").unwrap_or_default(),
            category: cell_string(row, "category").unwrap_or_default(),
            fabric_type: cell_string(row, "fabric_type"),
            base_price,
            stock_level,
            sizes: cell_list(row, "sizes"),
            colors: cell_list(row, "colors"),
            variants,
            minimum_order,
            production_time: cell_string(row, "production_time"),
            specifications,
            is_new: cell_flag(row, "is_new"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list::{filter_and_sort, FilterSpec};

    fn product(sku: &str, name: &str, category: &str, price: f64, stock: f64) -> Product {
        let mut p = ProductDraft {
            sku: sku.into(),
            name: name.into(),
            category: category.into(),
            base_price: price,
            stock_level: stock,
            sizes: vec!["S".into(), "M".into(), "L".into()],
            colors: vec!["Navy".into(), "White".into()],
            ..Default::default()
        }
        .into_product(100);
        p.id = sku.to_lowercase();
        p
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("TS-001", "Premium Cotton Tee", "Premium", 24.99, 450.0),
            product("TS-002", "Basic Crew Neck", "Basic", 9.99, 40.0),
            product("TS-003", "Athletic Dry Fit", "Athletic", 19.5, 0.0),
        ]
    }

    #[test]
    fn test_availability_is_derived() {
        let items = catalog();
        assert_eq!(items[0].availability, Availability::InStock);
        assert_eq!(items[1].availability, Availability::LowStock);
        assert_eq!(items[2].availability, Availability::OutOfStock);
        assert_eq!(items[0].variants, 6);
    }

    #[test]
    fn test_catalog_filters() {
        let items = catalog();
        let filter = FilterSpec::new()
            .equals("category", "All")
            .equals("fabricType", "")
            .range("basePrice", Some(PRICE_RANGE.0), Some(20.0));
        let names: Vec<&str> = filter_and_sort(&items, &filter, None)
            .iter()
            .map(|p| p.sku.as_str())
            .collect();
        assert_eq!(names, vec!["TS-002", "TS-003"]);

        let filter = FilterSpec::new().equals("availability", "Low Stock");
        assert_eq!(filter_and_sort(&items, &filter, None).len(), 1);

        let filter = FilterSpec::new().any_of("colors", vec!["navy".into()]);
        assert_eq!(filter_and_sort(&items, &filter, None).len(), 3);
    }

    #[test]
    fn test_sort_presets() {
        let items = catalog();
        let stock = Product::sort_preset("stock").unwrap();
        let visible = filter_and_sort(&items, &FilterSpec::new(), Some(&stock));
        assert_eq!(visible[0].sku, "TS-001");
        assert_eq!(visible[2].sku, "TS-003");

        let price = Product::sort_preset("price").unwrap();
        let visible = filter_and_sort(&items, &FilterSpec::new(), Some(&price));
        assert_eq!(visible[0].sku, "TS-002");
        assert!(Product::sort_preset("popularity").is_none());
    }

    #[test]
    fn test_adjust_price_and_duplicate() {
        let mut p = product("TS-001", "Premium Cotton Tee", "Premium", 20.0, 450.0);
        p.adjust_price(10.0);
        assert_eq!(p.base_price, 22.0);
        p.adjust_price(-200.0);
        assert_eq!(p.base_price, 0.0);

        let copy = p.duplicate();
        assert_eq!(copy.sku, "TS-001-COPY");
        assert!(copy.id.is_empty());
        assert!(copy.is_new);
    }

    #[test]
    fn test_validate_rejects_counts_beyond_u32() {
        let draft = ProductDraft {
            sku: "TS-009".into(),
            name: "Oversized Tee".into(),
            category: "Basic".into(),
            base_price: 12.0,
            stock_level: 5e9,
            minimum_order: Some(1e10),
            variants: Some(6.0),
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["stockLevel", "minimumOrder"]);
    }

    #[test]
    fn test_from_import_row() {
        let row: ImportRow = [
            ("sku", "TS-010"),
            ("name", "Vintage Wash"),
            ("category", "Vintage"),
            ("base_price", "18.75"),
            ("stock_level", "75"),
            ("sizes", "S,M"),
            ("specifications", "weight=180gsm; fit = regular"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let draft = ProductDraft::from_import_row(&row).unwrap();
        assert!(draft.validate().is_ok());
        assert_eq!(draft.specifications.get("fit").map(String::as_str), Some("regular"));
        let p = draft.into_product(100);
        assert_eq!(p.availability, Availability::LowStock);
        assert_eq!(p.variants, 2);
    }
}
