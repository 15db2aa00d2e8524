use axum::extract::Path;
use axum::response::Response;
use chrono::Utc;
use contracts::usecases::u503_generate_report::ReportKind;

use super::common::artifact_response;
use crate::shared::data::get_store;
use crate::shared::error::AppError;
use crate::usecases::u503_generate_report::ReportExecutor;

/// GET /api/reports/:kind (sales, production, inventory)
pub async fn generate(Path(kind): Path<String>) -> Result<Response, AppError> {
    let kind = ReportKind::from_code(&kind)
        .ok_or_else(|| AppError::NotFound(format!("Report '{}'", kind)))?;
    let executor = ReportExecutor::new(get_store()?);
    Ok(artifact_response(executor.generate(kind, Utc::now()).await?))
}
