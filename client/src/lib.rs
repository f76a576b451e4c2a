//! View-model core of the habit tracker browser client.
//!
//! Everything that touches the browser (storage, HTTP, sockets, dialogs) is
//! reached through the traits in [`ports`], so this crate runs the same way
//! inside the Yew frontend and under native unit tests.

pub mod api;
pub mod config;
pub mod error;
pub mod file_records;
pub mod forms;
pub mod guards;
pub mod http;
pub mod notifications;
pub mod ports;
pub mod progress;
pub mod session;
pub mod stats;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiGateway, AuthApi, ExcelApi, HabitApi, NotificationApi, RecordApi};
pub use config::{ApiConfig, ConfigError};
pub use error::{ClientError, ClientResult, ValidationError};
pub use file_records::FileRecordBrowser;
pub use guards::{GuardOutcome, Route};
pub use notifications::{ActionOutcome, NotificationCenter};
pub use ports::{FileDownloader, HttpTransport, KeyValueStore, SocketConnector, UserPrompt};
pub use progress::{ChannelState, ProgressChannel};
pub use session::{MemoryStore, SessionStore};
pub use upload::{SelectedFile, UploadJob, UploadOrchestrator};
