//! Record-list pipeline shared by every list page: filter, sort, paginate,
//! and the page state that drives them.

pub mod field;
pub mod filter;
pub mod pagination;
pub mod sort;
pub mod state;
pub mod view;

pub use field::{FieldValue, ListRecord};
pub use filter::{DateWindow, FilterSpec, Predicate};
pub use pagination::{paginate, Page};
pub use sort::{compare_values, sort_records, SortDirection, SortSpec};
pub use state::{Effect, ListAction, ListState, LoadState, ModalState, SubmitState};
pub use view::{filter_and_sort, ListView};
