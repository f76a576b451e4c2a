//! Browser implementations of the `client` ports.
//!
//! Each adapter is a thin shim over one browser API: `localStorage`, `fetch`
//! (through `gloo-net`), `WebSocket` (through `gloo-net`) and the window
//! dialogs. All behavior worth testing lives in `client`.

mod browser;
mod http;
mod socket;
mod storage;

pub use browser::{BrowserPrompt, LocationDownloader};
pub use http::GlooTransport;
pub use socket::GlooConnector;
pub use storage::session_storage;
