use client::SelectedFile;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Upload,
    Files,
}

pub enum Msg {
    SetTab(Tab),
    /// A file came from the picker or a drop; `None` when nothing was chosen.
    FileChosen(Option<web_sys::File>),
    FileRead(SelectedFile),
    FileReadFailed(String),
    SetDragging(bool),
    ClearFile,
    Upload,
    UploadFinished(bool),
    JobChanged,
    Reset,
    LoadFiles,
    FilesChanged,
    ChangePage(u64),
    DeleteFile(String),
    DeleteAll,
    Download(String),
}
