//! Upload orchestrator: one spreadsheet upload at a time, with live progress.
//!
//! The upload request and the progress channel are independent signals. A
//! frame may land after the response or never at all, so progress is only
//! applied while the job is still uploading and the response alone decides
//! the terminal state.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use common::jobs::UploadStatus;
use log::{debug, info, warn};

use crate::api::ExcelApi;
use crate::error::{ClientResult, ValidationError};
use crate::progress::{ProgressChannel, Subscription};

const ACCEPTED_EXTENSIONS: [&str; 2] = [".xls", ".xlsx"];
const UPLOAD_FAILED: &str = "Error al cargar el archivo";

/// A file picked by the user, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }
}

/// Only spreadsheet extensions are accepted; the match is case-sensitive.
pub fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    if ACCEPTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedFileType)
    }
}

/// Human-readable size: `0 Bytes`, `1.5 KB`, `2.25 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut exponent = 0;
    let mut threshold: u64 = 1024;
    while exponent + 1 < UNITS.len() && bytes >= threshold {
        exponent += 1;
        threshold = threshold.saturating_mul(1024);
    }
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    format!("{} {}", (value * 100.0).round() / 100.0, UNITS[exponent])
}

/// Snapshot of the upload job as the view renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadJob {
    pub file_name: String,
    pub file_size: String,
    pub has_file: bool,
    pub status: UploadStatus,
    pub progress: u8,
    pub rows_processed: u64,
    pub error_message: String,
    pub success_message: String,
}

impl UploadJob {
    pub fn is_uploading(&self) -> bool {
        self.status == UploadStatus::Uploading
    }
}

#[derive(Default)]
struct State {
    job: UploadJob,
    file: Option<SelectedFile>,
    subscription: Option<Subscription>,
    torn_down: bool,
}

impl State {
    fn clear_selection(&mut self) {
        self.file = None;
        self.job.file_name.clear();
        self.job.file_size.clear();
        self.job.has_file = false;
    }
}

type ChangeListener = Rc<RefCell<Option<Rc<dyn Fn()>>>>;

fn notify(listener: &ChangeListener) {
    let callback = listener.borrow().clone();
    if let Some(callback) = callback {
        callback();
    }
}

#[derive(Clone)]
pub struct UploadOrchestrator {
    excel: ExcelApi,
    channel: ProgressChannel,
    state: Rc<RefCell<State>>,
    on_change: ChangeListener,
}

impl UploadOrchestrator {
    pub fn new(excel: ExcelApi, channel: ProgressChannel) -> Self {
        Self {
            excel,
            channel,
            state: Rc::new(RefCell::new(State::default())),
            on_change: Rc::new(RefCell::new(None)),
        }
    }

    /// Called after every asynchronous state change (progress frames and the
    /// final response), so the owning view can re-render.
    pub fn set_on_change(&self, callback: impl Fn() + 'static) {
        *self.on_change.borrow_mut() = Some(Rc::new(callback));
    }

    pub fn job(&self) -> UploadJob {
        self.state.borrow().job.clone()
    }

    pub fn channel(&self) -> &ProgressChannel {
        &self.channel
    }

    /// Validates and records the picked file. A rejected file leaves the
    /// previous selection in place and shows the validation message.
    pub fn select_file(&self, file: Option<SelectedFile>) -> Result<(), ValidationError> {
        let mut state = self.state.borrow_mut();
        let file = match file {
            Some(file) => file,
            None => {
                state.job.error_message = ValidationError::NoFileChosen.to_string();
                return Err(ValidationError::NoFileChosen);
            }
        };

        if let Err(e) = validate_file_name(&file.name) {
            debug!("rejected upload candidate {}", file.name);
            state.job.error_message = e.to_string();
            return Err(e);
        }

        state.job.file_name = file.name.clone();
        state.job.file_size = format_file_size(file.size);
        state.job.has_file = true;
        state.job.error_message.clear();
        state.file = Some(file);
        Ok(())
    }

    pub fn clear_file(&self) {
        self.state.borrow_mut().clear_selection();
    }

    /// Uploads the selected file and returns the number of imported rows.
    ///
    /// The job state is updated whatever the outcome; the returned result is
    /// for callers that want to chain on it.
    pub async fn upload(&self) -> ClientResult<u64> {
        let (name, bytes) = {
            let mut state = self.state.borrow_mut();
            if state.job.is_uploading() {
                return Err(ValidationError::UploadInProgress.into());
            }
            let (name, bytes) = match &state.file {
                Some(file) => (file.name.clone(), file.bytes.clone()),
                None => {
                    state.job.error_message = ValidationError::NoFileSelected.to_string();
                    return Err(ValidationError::NoFileSelected.into());
                }
            };
            state.job.status = UploadStatus::Uploading;
            state.job.progress = 0;
            state.job.rows_processed = 0;
            state.job.error_message.clear();
            state.job.success_message.clear();
            (name, bytes)
        };
        notify(&self.on_change);

        // Live progress is a nicety; the upload goes ahead without it.
        if let Err(e) = self.channel.connect() {
            warn!("uploading {} without live progress: {}", name, e);
        }
        let subscription = self.subscribe_progress();
        self.state.borrow_mut().subscription = Some(subscription);

        info!("uploading {}", name);
        let result = self.excel.upload(&name, bytes).await;
        self.finish(result.map(|response| response.rows_processed))
    }

    fn subscribe_progress(&self) -> Subscription {
        let state: Weak<RefCell<State>> = Rc::downgrade(&self.state);
        let on_change = self.on_change.clone();
        self.channel.subscribe(move |progress| {
            let Some(state) = state.upgrade() else {
                return;
            };
            let applied = {
                let mut state = state.borrow_mut();
                if state.job.is_uploading() && !state.torn_down {
                    state.job.progress = progress;
                    true
                } else {
                    false
                }
            };
            if applied {
                notify(&on_change);
            }
        })
    }

    fn finish(&self, result: ClientResult<u64>) -> ClientResult<u64> {
        let subscription = {
            let mut state = self.state.borrow_mut();
            if state.torn_down {
                debug!("upload finished after teardown; result ignored");
                return result;
            }
            match &result {
                Ok(rows) => {
                    info!("upload finished: {} rows processed", rows);
                    state.job.status = UploadStatus::Success;
                    state.job.rows_processed = *rows;
                    state.job.progress = 100;
                    state.job.success_message = format!(
                        "Archivo procesado exitosamente. {} filas procesadas.",
                        rows
                    );
                    state.clear_selection();
                }
                Err(e) => {
                    warn!("upload failed: {}", e);
                    state.job.status = UploadStatus::Error;
                    state.job.error_message = e.user_message(UPLOAD_FAILED);
                }
            }
            state.subscription.take()
        };

        drop(subscription);
        self.channel.disconnect();
        notify(&self.on_change);
        result
    }

    /// Acknowledges a finished job and returns to idle. Ignored while an
    /// upload is in flight.
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        if state.job.is_uploading() {
            debug!("reset ignored while uploading");
            return;
        }
        state.clear_selection();
        state.job = UploadJob::default();
    }

    /// Owning view is going away: stop listening, close the channel and
    /// ignore whatever the in-flight request eventually returns.
    pub fn teardown(&self) {
        let subscription = {
            let mut state = self.state.borrow_mut();
            state.torn_down = true;
            state.subscription.take()
        };
        drop(subscription);
        self.channel.disconnect();
        *self.on_change.borrow_mut() = None;
    }
}
