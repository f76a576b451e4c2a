use common::model::excel::{DataPage, DeleteResponse, FileList, UploadResponse};

use crate::error::ClientResult;
use crate::http::{segment, ApiClient};

/// Multipart field the upload endpoint reads the spreadsheet from.
const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
pub struct ExcelApi {
    client: ApiClient,
}

impl ExcelApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<UploadResponse> {
        self.client
            .post("/excel/upload_excel")
            .file(UPLOAD_FIELD, file_name, bytes)
            .send()
            .await
    }

    pub async fn list_files(&self) -> ClientResult<FileList> {
        self.client.get("/excel/list-files").send().await
    }

    pub async fn data(&self, limit: u64, offset: u64) -> ClientResult<DataPage> {
        self.client
            .get("/excel/data")
            .query("limit", limit)
            .query("offset", offset)
            .send()
            .await
    }

    pub async fn delete_file(&self, file_name: &str) -> ClientResult<DeleteResponse> {
        self.client
            .delete(format!("/excel/file/{}", segment(file_name)))
            .send()
            .await
    }

    pub async fn delete_all(&self) -> ClientResult<DeleteResponse> {
        self.client.delete("/excel/data").send().await
    }

    /// Direct download location of an uploaded file.
    pub fn download_url(&self, file_name: &str) -> String {
        self.client
            .config()
            .endpoint(&format!("/uploads/{}", segment(file_name)))
    }
}
