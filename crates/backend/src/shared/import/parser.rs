use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use contracts::domain::common::ImportRow;

use super::types::{FileFormat, ImportedTable, UploadedFile};
use crate::shared::error::AppError;

/// Parses an uploaded file into header-keyed rows. The extension is checked
/// before any byte is read.
pub fn parse_upload(file: &UploadedFile) -> Result<ImportedTable, AppError> {
    let format = FileFormat::from_file_name(&file.name)?;
    let table = match format {
        FileFormat::Csv => parse_csv(&file.bytes)?,
        FileFormat::Xlsx | FileFormat::Xls => parse_workbook(&file.bytes)?,
    };
    tracing::info!(
        "Parsed {} ({:?}): {} columns, {} rows",
        file.name,
        format,
        table.headers.len(),
        table.rows.len()
    );
    Ok(table)
}

/// Rejects an empty table and reports required headers that are absent, in
/// the order they were required
pub fn validate_import_data(table: &ImportedTable, required: &[&str]) -> Result<(), AppError> {
    if table.rows.is_empty() {
        return Err(AppError::ParseFailure("Imported file contains no data.".into()));
    }
    let missing: Vec<String> = required
        .iter()
        .filter(|column| !table.headers.iter().any(|h| h == *column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingColumns(missing));
    }
    Ok(())
}

fn parse_csv(bytes: &[u8]) -> Result<ImportedTable, AppError> {
    // Strip UTF-8 BOM if present
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::ParseFailure(format!("Failed to read CSV headers: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| AppError::ParseFailure(format!("Failed to parse CSV: {}", e)))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        rows.push(keyed_row(&headers, record.iter().map(str::to_string)));
    }

    Ok(ImportedTable { headers, rows })
}

/// First worksheet of an .xlsx or .xls workbook
fn parse_workbook(bytes: &[u8]) -> Result<ImportedTable, AppError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::ParseFailure(format!("Failed to open workbook: {}", e)))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::ParseFailure("Workbook has no worksheets".into()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| AppError::ParseFailure(format!("Failed to read sheet '{}': {}", sheet, e)))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .map(|cells| cells.iter().map(|c| cell_text(c).trim().to_string()).collect())
        .unwrap_or_default();

    let rows = sheet_rows
        .map(|cells| cells.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|values| values.iter().any(|v| !v.trim().is_empty()))
        .map(|values| keyed_row(&headers, values.into_iter()))
        .collect();

    Ok(ImportedTable { headers, rows })
}

/// Pairs values with headers; unnamed columns are dropped, short rows padded
fn keyed_row(headers: &[String], mut values: impl Iterator<Item = String>) -> ImportRow {
    headers
        .iter()
        .map(|header| (header, values.next().unwrap_or_default()))
        .filter(|(header, _)| !header.is_empty())
        .map(|(header, value)| (header.clone(), value))
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(v) => v.clone(),
        Data::Float(v) => format_float(*v),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| format_float(v.as_f64())),
        Data::DateTimeIso(v) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| v.clone()),
        Data::DurationIso(v) => v.clone(),
        Data::Error(v) => format!("{v:?}"),
    }
}

/// Spreadsheets store every number as a float; whole values lose the `.0`
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_order::aggregate::IMPORT_REQUIRED_COLUMNS as ORDER_COLUMNS;

    fn csv_file(name: &str, text: &str) -> UploadedFile {
        UploadedFile::new(name, text.as_bytes().to_vec())
    }

    #[test]
    fn test_csv_headers_trimmed_and_blank_rows_skipped() {
        let file = csv_file(
            "products.csv",
            "\u{FEFF} sku , name ,base_price\nTS-1,\"Crew Tee, Navy\",8.5\n,,\nTS-2,Polo,12\n",
        );
        let table = parse_upload(&file).unwrap();
        assert_eq!(table.headers, vec!["sku", "name", "base_price"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["name"], "Crew Tee, Navy");
        assert_eq!(table.rows[1]["base_price"], "12");
    }

    #[test]
    fn test_ragged_csv_is_parse_failure() {
        let file = csv_file("orders.csv", "a,b\n1,2,3\n");
        assert!(matches!(parse_upload(&file), Err(AppError::ParseFailure(_))));
    }

    #[test]
    fn test_unsupported_extension_rejected_before_parsing() {
        let file = UploadedFile::new("orders.json", vec![0xff, 0x00]);
        assert!(matches!(parse_upload(&file), Err(AppError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_unreadable_workbook_is_parse_failure() {
        let file = UploadedFile::new("orders.xlsx", b"not a workbook".to_vec());
        assert!(matches!(parse_upload(&file), Err(AppError::ParseFailure(_))));
    }

    #[test]
    fn test_missing_quantity_column_rejects_file() {
        let file = csv_file(
            "orders.csv",
            "customer_name,product_name,unit_price\nTrendy Threads,Vintage Tee,12.5\n",
        );
        let table = parse_upload(&file).unwrap();
        match validate_import_data(&table, ORDER_COLUMNS) {
            Err(AppError::MissingColumns(missing)) => assert_eq!(missing, vec!["quantity"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_header_only_file_has_no_data() {
        let file = csv_file("orders.csv", "customer_name,product_name,quantity,unit_price\n");
        let table = parse_upload(&file).unwrap();
        let err = validate_import_data(&table, ORDER_COLUMNS).unwrap_err();
        assert_eq!(err.to_string(), "Imported file contains no data.");
    }

    #[test]
    fn test_missing_columns_in_required_order() {
        let table = ImportedTable {
            headers: vec!["unit_price".into()],
            rows: vec![ImportRow::new()],
        };
        match validate_import_data(&table, ORDER_COLUMNS) {
            Err(AppError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["customer_name", "product_name", "quantity"])
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(500.0), "500");
        assert_eq!(format_float(12.5), "12.5");
    }
}
