pub mod db;
pub mod memory;
pub mod postgrest;
pub mod record_storage;
pub mod row;
pub mod store;

pub use store::{get_store, init_store, RemoteStore, StoreRow};
