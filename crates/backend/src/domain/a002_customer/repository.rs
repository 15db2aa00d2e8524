use contracts::domain::a002_customer::aggregate::{Communication, Customer, OrderHistoryEntry};
use contracts::enums::AccountStatus;
use serde::{Deserialize, Serialize};

use crate::shared::data::row::{
    decode_row, encode_row, format_date, nullable, parse_date, parse_enum, parse_timestamp,
    to_count,
};
use crate::shared::data::{RemoteStore, StoreRow};

pub const TABLE: &str = "customers";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub company_name: String,
    #[serde(deserialize_with = "nullable")]
    pub contact_person: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub account_status: String,
    pub payment_terms: Option<String>,
    pub shipping_preference: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub total_orders: f64,
    #[serde(deserialize_with = "nullable")]
    pub total_revenue: f64,
    pub last_order_date: Option<String>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub order_history: Vec<OrderHistoryEntry>,
    #[serde(deserialize_with = "nullable")]
    pub communications: Vec<Communication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl CustomerRow {
    pub fn to_domain(self) -> anyhow::Result<Customer> {
        let account_status = if self.account_status.is_empty() {
            AccountStatus::default()
        } else {
            parse_enum(TABLE, "account_status", &self.account_status, AccountStatus::from_code)?
        };
        Ok(Customer {
            id: self.id.unwrap_or_default(),
            company_name: self.company_name,
            contact_person: self.contact_person,
            email: self.email,
            phone: self.phone,
            location: self.location,
            address: self.address,
            account_status,
            payment_terms: self.payment_terms,
            shipping_preference: self.shipping_preference,
            total_orders: to_count(self.total_orders),
            total_revenue: self.total_revenue,
            last_order_date: parse_date(TABLE, "last_order_date", self.last_order_date.as_deref())?,
            notes: self.notes,
            order_history: self.order_history,
            communications: self.communications,
            created_at: parse_timestamp(self.created_at.as_deref()),
        })
    }

    pub fn from_domain(customer: &Customer) -> Self {
        Self {
            id: Some(customer.id.clone()).filter(|id| !id.is_empty()),
            company_name: customer.company_name.clone(),
            contact_person: customer.contact_person.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            location: customer.location.clone(),
            address: customer.address.clone(),
            account_status: customer.account_status.code().to_string(),
            payment_terms: customer.payment_terms.clone(),
            shipping_preference: customer.shipping_preference.clone(),
            total_orders: f64::from(customer.total_orders),
            total_revenue: customer.total_revenue,
            last_order_date: format_date(customer.last_order_date),
            notes: customer.notes.clone(),
            order_history: customer.order_history.clone(),
            communications: customer.communications.clone(),
            created_at: customer.created_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

fn to_customer(row: StoreRow) -> anyhow::Result<Customer> {
    decode_row::<CustomerRow>(TABLE, row)?.to_domain()
}

fn write_row(customer: &Customer) -> anyhow::Result<StoreRow> {
    let mut row = CustomerRow::from_domain(customer);
    row.id = None;
    row.created_at = None;
    encode_row(&row)
}

pub async fn list_all(store: &dyn RemoteStore) -> anyhow::Result<Vec<Customer>> {
    store
        .select_all(TABLE)
        .await?
        .into_iter()
        .map(to_customer)
        .collect()
}

pub async fn insert(store: &dyn RemoteStore, customer: &Customer) -> anyhow::Result<Customer> {
    to_customer(store.insert(TABLE, write_row(customer)?).await?)
}

pub async fn update(store: &dyn RemoteStore, customer: &Customer) -> anyhow::Result<Customer> {
    to_customer(store.update(TABLE, &customer.id, write_row(customer)?).await?)
}

pub async fn delete(store: &dyn RemoteStore, id: &str) -> anyhow::Result<bool> {
    store.delete(TABLE, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_with_nested_records() {
        let row = json!({
            "id": "c1",
            "company_name": "Fashion Forward Ltd",
            "contact_person": "Priya Sharma",
            "email": "priya@fashionforward.in",
            "account_status": "active",
            "total_orders": 45,
            "total_revenue": null,
            "last_order_date": "2024-01-10",
            "order_history": [{"id": "ORD-2024-001", "date": "2024-01-10", "amount": 6250.0, "status": "delivered", "items": 500}],
            "communications": [{"id": 1, "type": "call", "date": "2024-01-12", "subject": "Reorder", "duration": "15 min"}]
        })
        .as_object()
        .cloned()
        .unwrap();
        let customer = to_customer(row).unwrap();
        assert_eq!(customer.total_orders, 45);
        assert_eq!(customer.total_revenue, 0.0);
        assert_eq!(customer.order_history[0].status, "delivered");
        assert_eq!(customer.communications.len(), 1);
    }

    #[test]
    fn test_unknown_account_status_fails() {
        let row = json!({"id": "c1", "account_status": "vip"}).as_object().cloned().unwrap();
        assert!(to_customer(row).is_err());
    }
}
