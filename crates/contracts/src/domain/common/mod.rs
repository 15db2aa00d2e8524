//! Common types and traits for all aggregates

pub mod aggregate_root;
pub mod field_error;
pub mod import_row;

// Re-exports
pub use aggregate_root::AggregateRoot;
pub use field_error::{FieldError, FieldErrors};
pub use import_row::ImportRow;
