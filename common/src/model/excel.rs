use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body returned by `POST /excel/upload_excel` on success.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    pub rows_processed: u64,
    #[serde(default)]
    pub columns: Vec<String>,
}

/// A spreadsheet file stored on the server, as listed by `/excel/list-files`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub size_mb: f64,
    #[serde(default)]
    pub modified_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<UploadedFile>,
    #[serde(default)]
    pub count: u64,
}

/// One row imported from an uploaded spreadsheet. Columns are whatever the
/// backend stored for the row, keyed by column name, in the order sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    #[serde(flatten)]
    pub columns: Map<String, Value>,
}

/// One page of `/excel/data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub data: Vec<FileRecord>,
}

/// Body returned by the delete endpoints. Only the message is shown.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub deleted_records: Option<u64>,
    #[serde(default)]
    pub deleted_files: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_record_keeps_columns_besides_id() {
        let record: FileRecord = serde_json::from_str(
            r#"{"id":3,"column1":"a","column2":null,"file_name":"r.xlsx"}"#,
        )
        .unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.columns.len(), 3);
        assert!(!record.columns.contains_key("id"));
        let names: Vec<&str> = record.columns.keys().map(String::as_str).collect();
        assert_eq!(names, ["column1", "column2", "file_name"]);
    }
}
