use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::import_row::{cell, cell_number, cell_string};
use crate::domain::common::{AggregateRoot, FieldError, FieldErrors, ImportRow};
use crate::enums::AccountStatus;
use crate::shared::list::{FieldValue, ListRecord, SortSpec};

/// Columns a customer import file must carry
pub const IMPORT_REQUIRED_COLUMNS: &[&str] = &["company_name", "contact_person", "email"];

// ============================================================================
// Nested records
// ============================================================================

/// Past order as listed on the customer profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderHistoryEntry {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub amount: f64,
    /// Free text; history keeps statuses such as `delivered` that orders no longer use
    pub status: String,
    #[serde(default)]
    pub items: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationKind {
    Email,
    Call,
    Meeting,
}

/// Contact log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: CommunicationKind,
    pub date: Option<NaiveDate>,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

// ============================================================================
// Aggregate Root
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Store-assigned UUID
    pub id: String,
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub account_status: AccountStatus,
    pub payment_terms: Option<String>,
    pub shipping_preference: Option<String>,
    pub total_orders: u32,
    pub total_revenue: f64,
    pub last_order_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(default)]
    pub order_history: Vec<OrderHistoryEntry>,
    #[serde(default)]
    pub communications: Vec<Communication>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Customer list opens with the most recent buyers first
    pub fn default_sort() -> SortSpec {
        SortSpec::desc("lastOrder")
    }

    pub fn average_order_value(&self) -> f64 {
        if self.total_orders == 0 {
            0.0
        } else {
            self.total_revenue / f64::from(self.total_orders)
        }
    }
}

impl AggregateRoot for Customer {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn description(&self) -> String {
        self.company_name.clone()
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "customers"
    }

    fn element_name() -> &'static str {
        "Customer"
    }

    fn list_name() -> &'static str {
        "Customers"
    }
}

impl ListRecord for Customer {
    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::text(&self.id),
            "companyName" => FieldValue::text(&self.company_name),
            "contactPerson" => FieldValue::text(&self.contact_person),
            "email" => FieldValue::text(&self.email),
            "phone" => FieldValue::opt_text(self.phone.as_ref()),
            "location" => FieldValue::opt_text(self.location.as_ref()),
            "address" => FieldValue::opt_text(self.address.as_ref()),
            "accountStatus" | "status" => FieldValue::text(self.account_status.code()),
            "paymentTerms" => FieldValue::opt_text(self.payment_terms.as_ref()),
            "shippingPreference" => FieldValue::opt_text(self.shipping_preference.as_ref()),
            "totalOrders" => FieldValue::Number(f64::from(self.total_orders)),
            "totalRevenue" => FieldValue::Number(self.total_revenue),
            "lastOrder" | "lastOrderDate" => FieldValue::opt_date(self.last_order_date),
            "notes" => FieldValue::opt_text(self.notes.as_ref()),
            "createdAt" => FieldValue::opt_timestamp(self.created_at),
            _ => FieldValue::Missing,
        }
    }

    fn search_fields() -> &'static [&'static str] {
        &["companyName", "contactPerson", "location"]
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerDraft {
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub account_status: Option<AccountStatus>,
    pub payment_terms: Option<String>,
    pub shipping_preference: Option<String>,
    pub notes: Option<String>,
    /// Only set by imports carrying history from another system
    pub total_orders: Option<f64>,
    pub total_revenue: Option<f64>,
    pub last_order_date: Option<NaiveDate>,
}

impl CustomerDraft {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.require_text(&self.company_name, "companyName", "Company name");
        errors.require_text(&self.contact_person, "contactPerson", "Contact person");
        errors.require_text(&self.email, "email", "Email");
        if !self.email.trim().is_empty() {
            let email = self.email.trim();
            let valid = email
                .split_once('@')
                .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
            errors.check(valid, "email", "Email address is not valid");
        }
        if let Some(orders) = self.total_orders {
            errors.require_non_negative(orders, "totalOrders", "Total orders");
        }
        if let Some(revenue) = self.total_revenue {
            errors.require_non_negative(revenue, "totalRevenue", "Total revenue");
        }
        errors.into_result()
    }

    /// New customer record; the store assigns the id
    pub fn into_customer(self) -> Customer {
        Customer {
            id: String::new(),
            company_name: self.company_name.trim().to_string(),
            contact_person: self.contact_person.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: non_empty(self.phone),
            location: non_empty(self.location),
            address: non_empty(self.address),
            account_status: self.account_status.unwrap_or_default(),
            payment_terms: non_empty(self.payment_terms),
            shipping_preference: non_empty(self.shipping_preference),
            total_orders: self.total_orders.unwrap_or(0.0).max(0.0) as u32,
            total_revenue: self.total_revenue.unwrap_or(0.0).max(0.0),
            last_order_date: self.last_order_date,
            notes: non_empty(self.notes),
            order_history: Vec::new(),
            communications: Vec::new(),
            created_at: None,
        }
    }

    /// Form fields onto a loaded customer; history and totals stay unless the
    /// draft carries them
    pub fn apply_to(self, customer: &Customer) -> Customer {
        let total_orders = self.total_orders;
        let total_revenue = self.total_revenue;
        let last_order_date = self.last_order_date;
        let mut updated = self.into_customer();
        updated.id = customer.id.clone();
        if total_orders.is_none() {
            updated.total_orders = customer.total_orders;
        }
        if total_revenue.is_none() {
            updated.total_revenue = customer.total_revenue;
        }
        if last_order_date.is_none() {
            updated.last_order_date = customer.last_order_date;
        }
        updated.order_history = customer.order_history.clone();
        updated.communications = customer.communications.clone();
        updated.created_at = customer.created_at;
        updated
    }

    pub fn from_import_row(row: &ImportRow) -> Result<Self, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let total_orders = cell_number(row, "total_orders", &mut errors);
        let total_revenue = cell_number(row, "total_revenue", &mut errors);
        let account_status = match cell(row, "account_status") {
            Some(code) => {
                let parsed = AccountStatus::from_code(&code.to_ascii_lowercase());
                errors.check(
                    parsed.is_some(),
                    "account_status",
                    &format!("Unknown account status '{}'", code),
                );
                parsed
            }
            None => None,
        };
        let last_order_date = match cell(row, "last_order_date") {
            Some(raw) => {
                let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
                errors.check(
                    parsed.is_some(),
                    "last_order_date",
                    &format!("'{}' is not a date", raw),
                );
                parsed
            }
            None => None,
        };
        errors.into_result()?;

        Ok(Self {
            company_name: cell_string(row, "company_name").unwrap_or_default(),
            contact_person: cell_string(row, "contact_person").unwrap_or_default(),
            email: cell_string(row, "email").unwrap_or_default(),
            phone: cell_string(row, "phone"),
            location: cell_string(row, "location"),
            address: cell_string(row, "address"),
            account_status,
            payment_terms: cell_string(row, "payment_terms"),
            shipping_preference: cell_string(row, "shipping_preference"),
            notes: cell_string(row, "notes"),
            total_orders,
            total_revenue,
            last_order_date,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
