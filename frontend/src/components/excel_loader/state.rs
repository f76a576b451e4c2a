use client::{FileRecordBrowser, UploadOrchestrator};
use yew::NodeRef;

use super::messages::Tab;

/// State of the loader page. View and update read the job and the file
/// listing straight from the client objects, which own them.
pub struct ExcelLoader {
    pub uploads: UploadOrchestrator,
    pub files: FileRecordBrowser,
    pub active_tab: Tab,
    /// A drag is hovering the drop zone.
    pub dragging: bool,
    /// The picked file is being read into memory.
    pub reading: bool,
    /// Hidden `<input type="file">` opened by the drop zone.
    pub file_input_ref: NodeRef,
}

impl ExcelLoader {
    pub fn new(uploads: UploadOrchestrator, files: FileRecordBrowser) -> Self {
        Self {
            uploads,
            files,
            active_tab: Tab::Upload,
            dragging: false,
            reading: false,
            file_input_ref: NodeRef::default(),
        }
    }
}
