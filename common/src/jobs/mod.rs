use serde::{Deserialize, Serialize};

/// Lifecycle of a spreadsheet upload as tracked by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Success,
    Error,
}

/// Server-side processing phase reported next to the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingPhase {
    Processing,
    Completed,
}

/// Frame pushed by `ws://<host>/excel/ws/progress`. The server reports a
/// fractional percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressFrame {
    pub progress: f64,
    #[serde(default)]
    pub status: Option<ProcessingPhase>,
}

impl ProgressFrame {
    /// Percentage rounded to the nearest integer and clamped to `0..=100`.
    pub fn percent(&self) -> u8 {
        if self.progress.is_nan() {
            return 0;
        }
        self.progress.round().clamp(0.0, 100.0) as u8
    }
}
