pub mod response;

pub use response::{ImportPreview, ImportSummary, RowFailure};

use crate::usecases::common::UseCaseMetadata;

pub struct ImportRecords;

impl UseCaseMetadata for ImportRecords {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "import_records"
    }

    fn display_name() -> &'static str {
        "Import from CSV / Excel"
    }

    fn description() -> &'static str {
        "Parses an uploaded .csv, .xlsx or .xls file and inserts one record per data row"
    }
}
