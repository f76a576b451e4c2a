//! State behind the "manage files" tab: uploaded files plus a paged view of
//! the rows imported from them.

use std::cell::RefCell;
use std::rc::Rc;

use common::model::excel::{FileRecord, UploadedFile};
use log::{debug, info, warn};

use crate::api::ExcelApi;
use crate::error::ClientResult;
use crate::ports::UserPrompt;

pub const PAGE_SIZE: u64 = 10;
const MAX_PAGE_LINKS: u64 = 5;

const CONFIRM_DELETE_ALL: &str =
    "¿Seguro que deseas eliminar TODOS los datos? Esta acción no se puede deshacer.";

/// One entry of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(u64),
    Gap,
}

/// Result of a guarded delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

struct State {
    files: Vec<UploadedFile>,
    rows: Vec<FileRecord>,
    total: u64,
    current_page: u64,
    loading_files: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            rows: Vec::new(),
            total: 0,
            current_page: 1,
            loading_files: false,
        }
    }
}

#[derive(Clone)]
pub struct FileRecordBrowser {
    excel: ExcelApi,
    prompt: Rc<dyn UserPrompt>,
    state: Rc<RefCell<State>>,
}

impl FileRecordBrowser {
    pub fn new(excel: ExcelApi, prompt: Rc<dyn UserPrompt>) -> Self {
        Self {
            excel,
            prompt,
            state: Rc::new(RefCell::new(State::default())),
        }
    }

    pub fn files(&self) -> Vec<UploadedFile> {
        self.state.borrow().files.clone()
    }

    pub fn rows(&self) -> Vec<FileRecord> {
        self.state.borrow().rows.clone()
    }

    pub fn total(&self) -> u64 {
        self.state.borrow().total
    }

    pub fn current_page(&self) -> u64 {
        self.state.borrow().current_page
    }

    pub fn is_loading_files(&self) -> bool {
        self.state.borrow().loading_files
    }

    pub fn total_pages(&self) -> u64 {
        self.total().div_ceil(PAGE_SIZE)
    }

    /// Column headers for the data table: keys of the first row minus `id`.
    pub fn columns(&self) -> Vec<String> {
        self.state
            .borrow()
            .rows
            .first()
            .map(|row| row.columns.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Refreshes the file list, then the current data page when any file
    /// exists.
    pub async fn load_files(&self) -> ClientResult<()> {
        self.state.borrow_mut().loading_files = true;
        let result = self.excel.list_files().await;

        let has_files = {
            let mut state = self.state.borrow_mut();
            state.loading_files = false;
            match result {
                Ok(list) => {
                    debug!("{} uploaded files on the server", list.files.len());
                    state.files = list.files;
                    !state.files.is_empty()
                }
                Err(e) => {
                    warn!("could not list uploaded files: {}", e);
                    return Err(e);
                }
            }
        };

        if has_files {
            self.load_page().await?;
        }
        Ok(())
    }

    /// Fetches the rows of the current page.
    pub async fn load_page(&self) -> ClientResult<()> {
        let offset = (self.current_page() - 1) * PAGE_SIZE;
        let page = self.excel.data(PAGE_SIZE, offset).await.map_err(|e| {
            warn!("could not load data page at offset {}: {}", offset, e);
            e
        })?;

        let mut state = self.state.borrow_mut();
        state.rows = page.data;
        state.total = page.total;
        Ok(())
    }

    /// Moves to `page` and loads it. Pages outside `1..=total_pages` are
    /// ignored; returns whether the page changed.
    pub async fn change_page(&self, page: u64) -> ClientResult<bool> {
        if page == 0 || page > self.total_pages() {
            return Ok(false);
        }
        self.state.borrow_mut().current_page = page;
        self.load_page().await?;
        Ok(true)
    }

    /// Pagination bar: every page when there are few, otherwise a window of
    /// up to five pages around the current one with the first and last pages
    /// and gaps where pages are skipped.
    pub fn page_window(&self) -> Vec<PageLink> {
        page_window(self.current_page(), self.total_pages())
    }

    pub async fn delete_file(&self, file_name: &str) -> ClientResult<DeleteOutcome> {
        if !self
            .prompt
            .confirm(&format!("¿Seguro que deseas eliminar {}?", file_name))
        {
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(e) = self.excel.delete_file(file_name).await {
            warn!("could not delete {}: {}", file_name, e);
            self.prompt.alert("Error al eliminar archivo");
            return Err(e);
        }
        info!("deleted uploaded file {}", file_name);

        self.load_files().await?;
        Ok(DeleteOutcome::Deleted)
    }

    pub async fn delete_all(&self) -> ClientResult<DeleteOutcome> {
        if !self.prompt.confirm(CONFIRM_DELETE_ALL) {
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(e) = self.excel.delete_all().await {
            warn!("could not delete uploaded data: {}", e);
            self.prompt.alert("Error al eliminar datos");
            return Err(e);
        }
        info!("deleted all uploaded data");

        {
            let mut state = self.state.borrow_mut();
            state.files.clear();
            state.rows.clear();
            state.total = 0;
            state.current_page = 1;
        }
        self.load_files().await?;
        Ok(DeleteOutcome::Deleted)
    }
}

fn page_window(current: u64, total_pages: u64) -> Vec<PageLink> {
    if total_pages <= MAX_PAGE_LINKS {
        return (1..=total_pages).map(PageLink::Page).collect();
    }

    let start = current.saturating_sub(MAX_PAGE_LINKS / 2).max(1);
    let end = (start + MAX_PAGE_LINKS - 1).min(total_pages);

    let mut links = Vec::new();
    if start > 1 {
        links.push(PageLink::Page(1));
        if start > 2 {
            links.push(PageLink::Gap);
        }
    }
    links.extend((start..=end).map(PageLink::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            links.push(PageLink::Gap);
        }
        links.push(PageLink::Page(total_pages));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockUserPrompt;
    use crate::testing::{fixture, RecordingTransport};
    use serde_json::json;
    use PageLink::{Gap, Page};

    fn browser_with(prompt: MockUserPrompt) -> (Rc<RecordingTransport>, FileRecordBrowser) {
        let (transport, client) = fixture();
        let browser = FileRecordBrowser::new(ExcelApi::new(client), Rc::new(prompt));
        (transport, browser)
    }

    fn rows(total: u64, ids: std::ops::Range<i64>) -> String {
        let data: Vec<_> = ids
            .map(|id| json!({"id": id, "nombre": format!("fila {}", id), "file_name": "r.xlsx"}))
            .collect();
        json!({"total": total, "limit": 10, "offset": 0, "data": data}).to_string()
    }

    const ONE_FILE: &str =
        r#"{"files":[{"filename":"r.xlsx","size_bytes":2048,"size_mb":0.0,"modified_at":"2024-05-01T10:00:00"}],"count":1}"#;

    #[test]
    fn short_listings_show_every_page() {
        assert_eq!(page_window(1, 0), vec![]);
        assert_eq!(page_window(2, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(
            page_window(1, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
        );
    }

    #[test]
    fn long_listings_get_a_window_with_gaps() {
        assert_eq!(
            page_window(1, 12),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Gap, Page(12)]
        );
        assert_eq!(
            page_window(6, 12),
            vec![Page(1), Gap, Page(4), Page(5), Page(6), Page(7), Page(8), Gap, Page(12)]
        );
        assert_eq!(
            page_window(12, 12),
            vec![Page(1), Gap, Page(10), Page(11), Page(12)]
        );
    }

    #[test]
    fn adjacent_edges_need_no_gap() {
        assert_eq!(
            page_window(4, 7),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Page(7)]
        );
    }

    #[tokio::test]
    async fn load_files_fetches_the_first_page_when_files_exist() {
        let (transport, browser) = browser_with(MockUserPrompt::new());
        transport.respond(200, ONE_FILE);
        transport.respond(200, &rows(23, 1..11));

        browser.load_files().await.unwrap();

        assert_eq!(browser.files().len(), 1);
        assert_eq!(browser.rows().len(), 10);
        assert_eq!(browser.total_pages(), 3);
        assert_eq!(
            transport.last_request().url,
            "http://localhost:8000/excel/data?limit=10&offset=0"
        );
        assert_eq!(browser.columns(), vec!["nombre".to_string(), "file_name".to_string()]);
    }

    #[tokio::test]
    async fn columns_follow_the_backend_order() {
        let (transport, browser) = browser_with(MockUserPrompt::new());
        transport.respond(
            200,
            r#"{"total":1,"limit":10,"offset":0,"data":[{"id":1,"column2":"b","column10":"j","column1":"a"}]}"#,
        );

        browser.load_page().await.unwrap();

        assert_eq!(browser.columns(), vec!["column2", "column10", "column1"]);
    }

    #[tokio::test]
    async fn empty_file_list_skips_the_data_request() {
        let (transport, browser) = browser_with(MockUserPrompt::new());
        transport.respond(200, r#"{"files":[],"count":0}"#);

        browser.load_files().await.unwrap();

        assert_eq!(transport.request_count(), 1);
        assert!(browser.columns().is_empty());
        assert!(!browser.is_loading_files());
    }

    #[tokio::test]
    async fn change_page_ignores_out_of_range_pages() {
        let (transport, browser) = browser_with(MockUserPrompt::new());
        transport.respond(200, ONE_FILE);
        transport.respond(200, &rows(23, 1..11));
        browser.load_files().await.unwrap();
        let before = transport.request_count();

        assert!(!browser.change_page(0).await.unwrap());
        assert!(!browser.change_page(4).await.unwrap());
        assert_eq!(transport.request_count(), before);

        transport.respond(200, &rows(23, 21..24));
        assert!(browser.change_page(3).await.unwrap());
        assert_eq!(browser.current_page(), 3);
        assert_eq!(
            transport.last_request().url,
            "http://localhost:8000/excel/data?limit=10&offset=20"
        );
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let mut prompt = MockUserPrompt::new();
        prompt
            .expect_confirm()
            .withf(|q| q == "¿Seguro que deseas eliminar r.xlsx?")
            .return_const(false);
        let (transport, browser) = browser_with(prompt);

        let outcome = browser.delete_file("r.xlsx").await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn delete_file_refreshes_the_listing() {
        let mut prompt = MockUserPrompt::new();
        prompt.expect_confirm().return_const(true);
        let (transport, browser) = browser_with(prompt);
        transport.respond(200, r#"{"message":"Archivo r.xlsx eliminado"}"#);
        transport.respond(200, r#"{"files":[],"count":0}"#);

        assert_eq!(browser.delete_file("r.xlsx").await.unwrap(), DeleteOutcome::Deleted);

        let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:8000/excel/file/r.xlsx",
                "http://localhost:8000/excel/list-files",
            ]
        );
    }

    #[tokio::test]
    async fn failed_delete_all_alerts_and_keeps_rows() {
        let mut prompt = MockUserPrompt::new();
        prompt
            .expect_confirm()
            .withf(|q| q == CONFIRM_DELETE_ALL)
            .return_const(true);
        prompt
            .expect_alert()
            .withf(|m| m == "Error al eliminar datos")
            .times(1)
            .return_const(());
        let (transport, browser) = browser_with(prompt);
        transport.respond(200, ONE_FILE);
        transport.respond(200, &rows(3, 1..4));
        browser.load_files().await.unwrap();
        transport.respond(500, "{}");

        assert!(browser.delete_all().await.is_err());
        assert_eq!(browser.rows().len(), 3);
    }

    #[tokio::test]
    async fn delete_all_resets_paging() {
        let mut prompt = MockUserPrompt::new();
        prompt.expect_confirm().return_const(true);
        let (transport, browser) = browser_with(prompt);
        transport.respond(200, ONE_FILE);
        transport.respond(200, &rows(23, 1..11));
        browser.load_files().await.unwrap();
        transport.respond(200, &rows(23, 11..21));
        browser.change_page(2).await.unwrap();

        transport.respond(200, r#"{"message":"ok","deleted_records":23,"deleted_files":1}"#);
        transport.respond(200, r#"{"files":[],"count":0}"#);
        browser.delete_all().await.unwrap();

        assert_eq!(browser.current_page(), 1);
        assert_eq!(browser.total(), 0);
        assert!(browser.rows().is_empty());
        assert!(browser.files().is_empty());
    }
}
