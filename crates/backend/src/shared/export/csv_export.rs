use serde::Serialize;
use serde_json::Value;

use super::{ExportArtifact, CSV_CONTENT_TYPE};
use crate::shared::error::AppError;

/// Writes `records` as CSV under `<name>.csv`.
///
/// Each record is serialized to a JSON object. The header row is `columns`
/// when given, else the first record's keys in declaration order. Arrays and
/// objects are written as compact JSON, null and absent keys as empty cells.
pub fn export_csv<T: Serialize>(
    records: &[T],
    name: &str,
    columns: Option<&[&str]>,
) -> Result<ExportArtifact, AppError> {
    let objects = records
        .iter()
        .map(|record| match serde_json::to_value(record) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(AppError::ExportFailure("record is not an object".into())),
            Err(e) => Err(AppError::ExportFailure(e.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let headers: Vec<String> = match columns {
        Some(columns) => columns.iter().map(|c| c.to_string()).collect(),
        None => objects
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default(),
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    if !headers.is_empty() {
        writer.write_record(&headers).map_err(export_failure)?;
    }
    for object in &objects {
        let cells = headers
            .iter()
            .map(|key| cell_text(object.get(key)));
        writer.write_record(cells).map_err(export_failure)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::ExportFailure(e.to_string()))?;

    tracing::info!("Exported {} records to {}.csv", objects.len(), name);
    Ok(ExportArtifact {
        file_name: format!("{}.csv", name),
        content_type: CSV_CONTENT_TYPE,
        bytes,
    })
}

fn export_failure(err: csv::Error) -> AppError {
    AppError::ExportFailure(err.to_string())
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(nested) => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Line {
        sku: String,
        unit_price: f64,
        sizes: Vec<String>,
        note: Option<String>,
    }

    fn line(sku: &str, note: Option<&str>) -> Line {
        Line {
            sku: sku.into(),
            unit_price: 8.5,
            sizes: vec!["S".into(), "M".into()],
            note: note.map(str::to_string),
        }
    }

    fn lines_of(artifact: &ExportArtifact) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(artifact.bytes.as_slice());
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_header_in_declaration_order_and_nested_json() {
        let artifact = export_csv(&[line("TS-1", Some("rush, \"gift\"")), line("TS-2", None)], "products", None).unwrap();
        assert_eq!(artifact.file_name, "products.csv");
        let rows = lines_of(&artifact);
        assert_eq!(rows[0], vec!["sku", "unitPrice", "sizes", "note"]);
        assert_eq!(rows[1], vec!["TS-1", "8.5", "[\"S\",\"M\"]", "rush, \"gift\""]);
        assert_eq!(rows[2][3], "");
    }

    #[test]
    fn test_caller_columns_select_and_order() {
        let artifact = export_csv(&[line("TS-1", None)], "products", Some(&["note", "sku", "missing"])).unwrap();
        let rows = lines_of(&artifact);
        assert_eq!(rows[0], vec!["note", "sku", "missing"]);
        assert_eq!(rows[1], vec!["", "TS-1", ""]);
    }

    #[test]
    fn test_export_reimports_cell_for_cell() {
        use crate::shared::import::{parse_upload, UploadedFile};

        let records = vec![
            line("TS-1", Some("rush, \"gift\"\nsecond line")),
            line("TS-2", None),
            line("TS-3", Some("plain")),
        ];
        let artifact = export_csv(&records, "products-export", None).unwrap();
        let table = parse_upload(&UploadedFile::new("products-export.csv", artifact.bytes)).unwrap();

        assert_eq!(table.headers, vec!["sku", "unitPrice", "sizes", "note"]);
        assert_eq!(table.rows.len(), records.len());
        for (row, record) in table.rows.iter().zip(&records) {
            let value = serde_json::to_value(record).unwrap();
            for header in &table.headers {
                assert_eq!(row[header], cell_text(value.get(header)), "column {}", header);
            }
        }
        assert_eq!(table.rows[0]["note"], "rush, \"gift\"\nsecond line");
    }

    #[test]
    fn test_empty_collection() {
        let none: [Line; 0] = [];
        assert!(export_csv(&none, "products", None).unwrap().bytes.is_empty());
        let header_only = export_csv(&none, "products", Some(&["sku"])).unwrap();
        assert_eq!(String::from_utf8(header_only.bytes).unwrap(), "sku\n");
    }
}
