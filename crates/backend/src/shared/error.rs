use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use contracts::domain::common::FieldError;
use thiserror::Error;

/// Stable, machine-readable identifiers returned in the `error` field
pub mod error_code {
    pub const UNSUPPORTED_FORMAT: &str = "UNSUPPORTED_FORMAT";
    pub const PARSE_FAILURE: &str = "PARSE_FAILURE";
    pub const MISSING_COLUMNS: &str = "MISSING_COLUMNS";
    pub const VALIDATION_FAILURE: &str = "VALIDATION_FAILURE";
    pub const REMOTE_FAILURE: &str = "REMOTE_FAILURE";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const EXPORT_FAILURE: &str = "EXPORT_FAILURE";
}

/// Every failure an operation can surface. None of them is fatal; the user
/// retries the action.
///
/// ```json
/// {"error": "MISSING_COLUMNS", "message": "Missing required columns: quantity", "details": ["quantity"]}
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Upload extension is not csv, xlsx or xls
    #[error("Unsupported file type. Please upload .csv, .xlsx, or .xls")]
    UnsupportedFormat(String),

    /// File content could not be read
    #[error("{0}")]
    ParseFailure(String),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("{}", join_field_errors(.0))]
    ValidationFailure(Vec<FieldError>),

    /// Store read or write failed; carries the underlying message
    #[error("{0}")]
    RemoteFailure(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Download artifact could not be rendered
    #[error("Export failed: {0}")]
    ExportFailure(String),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    /// Single-field validation failure
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AppError::ValidationFailure(vec![FieldError::new(field, message)])
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::UnsupportedFormat(_) => error_code::UNSUPPORTED_FORMAT,
            AppError::ParseFailure(_) => error_code::PARSE_FAILURE,
            AppError::MissingColumns(_) => error_code::MISSING_COLUMNS,
            AppError::ValidationFailure(_) => error_code::VALIDATION_FAILURE,
            AppError::RemoteFailure(_) => error_code::REMOTE_FAILURE,
            AppError::NotFound(_) => error_code::NOT_FOUND,
            AppError::ExportFailure(_) => error_code::EXPORT_FAILURE,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedFormat(_)
            | AppError::ParseFailure(_)
            | AppError::MissingColumns(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RemoteFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ExportFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> serde_json::Value {
        match self {
            AppError::UnsupportedFormat(ext) => serde_json::json!({ "extension": ext }),
            AppError::MissingColumns(columns) => serde_json::json!(columns),
            AppError::ValidationFailure(errors) => serde_json::json!(errors),
            _ => serde_json::Value::Null,
        }
    }
}

/// Store plumbing reports through anyhow; at the service boundary that is a
/// remote failure
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::RemoteFailure(format!("{:#}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}: {}", self.error_code(), self);
        }
        let body = serde_json::json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "details": self.details(),
        });
        (status, axum::Json(body)).into_response()
    }
}
