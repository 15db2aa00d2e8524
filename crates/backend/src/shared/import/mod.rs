//! Uploaded spreadsheet → header-keyed rows.

pub mod parser;
pub mod types;

pub use parser::{parse_upload, validate_import_data};
pub use types::{FileFormat, ImportedTable, UploadedFile};
