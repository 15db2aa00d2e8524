use contracts::domain::a002_customer::aggregate::{Customer, CustomerDraft};
use contracts::domain::common::AggregateRoot;
use contracts::shared::summary::{customer_summary, CustomerSummary};

use super::repository;
use crate::shared::data::RemoteStore;
use crate::shared::error::AppError;

/// Download name of customers CSV exports
pub const EXPORT_NAME: &str = "customers-export";

pub async fn list(store: &dyn RemoteStore) -> Result<Vec<Customer>, AppError> {
    Ok(repository::list_all(store).await?)
}

pub async fn get(store: &dyn RemoteStore, id: &str) -> Result<Customer, AppError> {
    list(store)
        .await?
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::NotFound(format!("{} {}", Customer::element_name(), id)))
}

pub async fn create(store: &dyn RemoteStore, draft: CustomerDraft) -> Result<Customer, AppError> {
    draft.validate().map_err(AppError::ValidationFailure)?;
    let created = repository::insert(store, &draft.into_customer()).await?;
    tracing::info!("Created customer {} ({})", created.company_name, created.id);
    Ok(created)
}

pub async fn update(store: &dyn RemoteStore, id: &str, draft: CustomerDraft) -> Result<Customer, AppError> {
    draft.validate().map_err(AppError::ValidationFailure)?;
    let existing = get(store, id).await?;
    let updated = repository::update(store, &draft.apply_to(&existing)).await?;
    tracing::info!("Updated customer {}", updated.id);
    Ok(updated)
}

pub async fn save(store: &dyn RemoteStore, customer: &Customer) -> Result<Customer, AppError> {
    Ok(repository::update(store, customer).await?)
}

pub async fn delete(store: &dyn RemoteStore, id: &str) -> Result<(), AppError> {
    if !repository::delete(store, id).await? {
        return Err(AppError::NotFound(format!("{} {}", Customer::element_name(), id)));
    }
    tracing::info!("Deleted customer {}", id);
    Ok(())
}

pub async fn summary(store: &dyn RemoteStore) -> Result<CustomerSummary, AppError> {
    Ok(customer_summary(&list(store).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::memory::MemoryStore;
    use contracts::enums::AccountStatus;

    fn draft(company: &str, email: &str) -> CustomerDraft {
        CustomerDraft {
            company_name: company.into(),
            contact_person: "Rahul Mehta".into(),
            email: email.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let store = MemoryStore::new();
        let created = create(&store, draft("Urban Style Co", "rahul@urbanstyle.in")).await.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.account_status, AccountStatus::Active);

        let mut edit = draft("Urban Style Co", "orders@urbanstyle.in");
        edit.account_status = Some(AccountStatus::Inactive);
        let updated = update(&store, &created.id, edit).await.unwrap();
        assert_eq!(updated.email, "orders@urbanstyle.in");
        assert_eq!(updated.account_status, AccountStatus::Inactive);

        delete(&store, &created.id).await.unwrap();
        assert!(matches!(get(&store, &created.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_email_is_not_written() {
        let store = MemoryStore::new();
        let err = create(&store, draft("Urban Style Co", "not-an-email")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationFailure(_)));
        assert!(list(&store).await.unwrap().is_empty());
    }
}
