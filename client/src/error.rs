//! Error types shared by every view-model.
//!
//! User-facing strings are Spanish, matching the rest of the UI; log output
//! stays English.

use serde_json::Value;

use crate::ports::StorageError;

/// Input rejected before any request leaves the client.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Por favor, complete todos los campos.")]
    MissingFields,
    #[error("Las contraseñas no coinciden.")]
    PasswordMismatch,
    #[error("La contraseña debe tener al menos {min} caracteres.")]
    PasswordTooShort { min: usize },
    #[error("El nombre del hábito es obligatorio.")]
    MissingHabitName,
    #[error("No se seleccionó ningún archivo")]
    NoFileChosen,
    #[error("Selecciona un archivo primero")]
    NoFileSelected,
    #[error("Solo se permiten archivos .xls o .xlsx")]
    UnsupportedFileType,
    #[error("Ya hay una carga en curso")]
    UploadInProgress,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend answered with a non-success status. `payload` is the
    /// decoded error body when it was JSON.
    #[error("request failed with status {status}")]
    Http { status: u16, payload: Option<Value> },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not encode request: {0}")]
    Encode(String),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Message to show the user: validation errors verbatim, the backend's
    /// `error` or `detail` field for HTTP failures, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation(err) => err.to_string(),
            ClientError::Http {
                payload: Some(payload),
                ..
            } => backend_message(payload).unwrap_or_else(|| fallback.to_string()),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn backend_message(payload: &Value) -> Option<String> {
    ["error", "detail"]
        .iter()
        .filter_map(|key| payload.get(*key))
        .find_map(|value| value.as_str().filter(|message| !message.is_empty()))
        .map(str::to_string)
}
