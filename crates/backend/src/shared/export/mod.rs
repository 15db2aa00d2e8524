//! Download artifacts: CSV tables and titled PDF tables.

pub mod csv_export;
pub mod pdf_export;

pub use csv_export::export_csv;
pub use pdf_export::{export_pdf, ColumnValue, PdfColumn};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A rendered file ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name.replace('"', ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition() {
        let artifact = ExportArtifact {
            file_name: "orders-export.csv".into(),
            content_type: CSV_CONTENT_TYPE,
            bytes: Vec::new(),
        };
        assert_eq!(
            artifact.content_disposition(),
            "attachment; filename=\"orders-export.csv\""
        );
    }
}
