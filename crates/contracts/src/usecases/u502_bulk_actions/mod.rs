pub mod action;
pub mod request;
pub mod response;

pub use action::{CustomerBulkAction, OrderBulkAction, ProductBulkAction};
pub use request::BulkRequest;
pub use response::{BulkFailure, BulkOutcome};

use crate::usecases::common::UseCaseMetadata;

pub struct BulkActions;

impl UseCaseMetadata for BulkActions {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "bulk_actions"
    }

    fn display_name() -> &'static str {
        "Bulk actions"
    }

    fn description() -> &'static str {
        "Applies one action to every selected record and reports per-record failures"
    }
}
