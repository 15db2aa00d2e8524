//! Types and pure logic shared by the dashboard backend and any front end:
//! entities, enumerations, the record-list pipeline, formatting and
//! summary statistics.

pub mod domain;
pub mod enums;
pub mod shared;
pub mod usecases;
