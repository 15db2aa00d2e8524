pub mod a001_order;
pub mod a002_customer;
pub mod a003_product;
pub mod a004_production_stage;
pub mod common;
pub mod u503_reports;
