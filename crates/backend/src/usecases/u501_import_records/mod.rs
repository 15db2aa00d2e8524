pub mod executor;

pub use executor::{ImportExecutor, ImportTarget};
