use std::sync::Arc;

use chrono::NaiveDate;
use contracts::domain::common::{FieldError, ImportRow};
use contracts::domain::{a001_order, a002_customer, a003_product};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_import_records::{ImportPreview, ImportRecords, ImportSummary};

use crate::domain::{a001_order as orders, a002_customer as customers, a003_product as products};
use crate::shared::data::RemoteStore;
use crate::shared::error::AppError;
use crate::shared::import::{parse_upload, validate_import_data, ImportedTable, UploadedFile};

/// Entity a file is imported into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportTarget {
    Orders,
    Customers,
    Products,
}

impl ImportTarget {
    pub fn code(&self) -> &'static str {
        match self {
            ImportTarget::Orders => "orders",
            ImportTarget::Customers => "customers",
            ImportTarget::Products => "products",
        }
    }

    /// snake_case headers the file must carry
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            ImportTarget::Orders => a001_order::aggregate::IMPORT_REQUIRED_COLUMNS,
            ImportTarget::Customers => a002_customer::aggregate::IMPORT_REQUIRED_COLUMNS,
            ImportTarget::Products => a003_product::aggregate::IMPORT_REQUIRED_COLUMNS,
        }
    }
}

/// Executor for importing CSV / Excel uploads
pub struct ImportExecutor {
    store: Arc<dyn RemoteStore>,
    preview_rows: usize,
}

impl ImportExecutor {
    pub fn new(store: Arc<dyn RemoteStore>, preview_rows: usize) -> Self {
        Self {
            store,
            preview_rows,
        }
    }

    /// Parses and checks the file without writing anything
    pub fn preview(&self, target: ImportTarget, file: &UploadedFile) -> Result<ImportPreview, AppError> {
        let table = self.read(target, file)?;
        Ok(table.to_preview(&file.name, self.preview_rows))
    }

    /// Inserts one record per data row. A row that fails validation or the
    /// store write is reported and the import moves on.
    pub async fn import(
        &self,
        target: ImportTarget,
        file: &UploadedFile,
        today: NaiveDate,
    ) -> Result<ImportSummary, AppError> {
        let table = self.read(target, file)?;
        let mut summary = ImportSummary::new(target.code(), table.rows.len());

        for (idx, row) in table.rows.iter().enumerate() {
            let row_number = idx + 1;
            match self.insert_row(target, row, today).await {
                Ok(()) => summary.inserted += 1,
                Err(e) => {
                    tracing::warn!("Import {} row {} skipped: {}", target.code(), row_number, e);
                    summary.fail(row_number, e.to_string());
                }
            }
        }

        tracing::info!(
            "{}: imported {} of {} {} rows from {}",
            ImportRecords::full_name(),
            summary.inserted,
            summary.total_rows,
            target.code(),
            file.name
        );
        Ok(summary)
    }

    fn read(&self, target: ImportTarget, file: &UploadedFile) -> Result<ImportedTable, AppError> {
        let table = parse_upload(file)?;
        validate_import_data(&table, target.required_columns())?;
        Ok(table)
    }

    async fn insert_row(&self, target: ImportTarget, row: &ImportRow, today: NaiveDate) -> Result<(), AppError> {
        let store = self.store.as_ref();
        match target {
            ImportTarget::Orders => {
                let draft = a001_order::aggregate::OrderDraft::from_import_row(row).map_err(invalid_row)?;
                orders::service::create(store, draft, today).await?;
            }
            ImportTarget::Customers => {
                let draft =
                    a002_customer::aggregate::CustomerDraft::from_import_row(row).map_err(invalid_row)?;
                customers::service::create(store, draft).await?;
            }
            ImportTarget::Products => {
                let draft =
                    a003_product::aggregate::ProductDraft::from_import_row(row).map_err(invalid_row)?;
                products::service::create(store, draft).await?;
            }
        }
        Ok(())
    }
}

fn invalid_row(errors: Vec<FieldError>) -> AppError {
    AppError::ValidationFailure(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::memory::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn executor() -> ImportExecutor {
        ImportExecutor::new(Arc::new(MemoryStore::new()), 5)
    }

    fn orders_csv() -> UploadedFile {
        let body = "customer_name,product_name,quantity,unit_price\n\
                    Trendy Threads,Vintage Tee,500,12.5\n\
                    ,Hoodie,10,20\n\
                    Urban Wear,Cap,abc,5\n\
                    Green Co,Polo,20,7\n";
        UploadedFile::new("orders.csv", body.as_bytes().to_vec())
    }

    #[test]
    fn test_preview_does_not_write() {
        let executor = executor();
        let preview = executor.preview(ImportTarget::Orders, &orders_csv()).unwrap();
        assert_eq!(preview.total_rows, 4);
        assert_eq!(preview.rows.len(), 4);
        assert_eq!(preview.headers[0], "customer_name");
    }

    #[tokio::test]
    async fn test_import_reports_row_failures() {
        let executor = executor();
        let summary = executor
            .import(ImportTarget::Orders, &orders_csv(), today())
            .await
            .unwrap();
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.failed.len(), 2);
        assert_eq!(summary.failed[0].row, 2);
        assert_eq!(summary.failed[1].row, 3);
        assert!(!summary.is_complete());

        let stored = orders::service::list(executor.store.as_ref()).await.unwrap();
        let mut numbers: Vec<&str> = stored.iter().map(|o| o.id.as_str()).collect();
        numbers.sort();
        assert_eq!(numbers, vec!["ORD-2024-001", "ORD-2024-002"]);
        let tee = stored.iter().find(|o| o.product_name == "Vintage Tee").unwrap();
        assert_eq!(tee.total_amount, 6250.0);
    }

    #[tokio::test]
    async fn test_import_rejects_missing_columns() {
        let executor = executor();
        let file = UploadedFile::new("customers.csv", b"company_name,email\nAcme,a@b.c\n".to_vec());
        let err = executor
            .import(ImportTarget::Customers, &file, today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingColumns(cols) if cols == vec!["contact_person"]));
    }

    #[tokio::test]
    async fn test_import_rejects_unsupported_file() {
        let executor = executor();
        let file = UploadedFile::new("products.json", b"[]".to_vec());
        let err = executor
            .import(ImportTarget::Products, &file, today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }
}
