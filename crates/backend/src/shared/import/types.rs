use contracts::domain::common::ImportRow;
use contracts::usecases::u501_import_records::ImportPreview;

use crate::shared::error::AppError;

/// File received from the upload boundary
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// Format from the text after the last dot, any case
    pub fn from_file_name(name: &str) -> Result<Self, AppError> {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "xls" => Ok(FileFormat::Xls),
            _ => Err(AppError::UnsupportedFormat(extension)),
        }
    }
}

/// Parsed file: trimmed headers plus one map per non-empty data row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedTable {
    pub headers: Vec<String>,
    pub rows: Vec<ImportRow>,
}

impl ImportedTable {
    /// First `n` data rows
    pub fn preview(&self, n: usize) -> &[ImportRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn to_preview(&self, file_name: &str, n: usize) -> ImportPreview {
        ImportPreview {
            file_name: file_name.to_string(),
            headers: self.headers.clone(),
            rows: self.preview(n).to_vec(),
            total_rows: self.rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_match() {
        assert_eq!(FileFormat::from_file_name("orders.CSV").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_file_name("q1.report.xlsx").unwrap(), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_file_name("legacy.Xls").unwrap(), FileFormat::Xls);
        assert!(matches!(
            FileFormat::from_file_name("orders.pdf"),
            Err(AppError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
        assert!(matches!(
            FileFormat::from_file_name("orders"),
            Err(AppError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_preview_is_bounded() {
        let table = ImportedTable {
            headers: vec!["sku".into()],
            rows: (0..3)
                .map(|i| ImportRow::from([("sku".to_string(), format!("TS-{i}"))]))
                .collect(),
        };
        assert_eq!(table.preview(5).len(), 3);
        assert_eq!(table.preview(2).len(), 2);
        let preview = table.to_preview("products.csv", 1);
        assert_eq!(preview.total_rows, 3);
        assert_eq!(preview.rows[0]["sku"], "TS-0");
    }
}
