pub mod u501_import_records;
pub mod u502_bulk_actions;
pub mod u503_generate_report;
