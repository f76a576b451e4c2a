//! Contracts between the view-model core and the browser.
//!
//! The frontend crate implements these over `web-sys`/`gloo`; tests use the
//! in-memory fakes and `mockall` mocks. All ports are single-threaded: the
//! client runs on the browser event loop, so nothing here is `Send`.

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::http::{HttpRequest, HttpResponse};
use crate::progress::{ChannelError, ChannelEvents};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is not available: {0}")]
    Unavailable(String),
    #[error("could not write key {key}: {reason}")]
    Write { key: String, reason: String },
    #[error("could not serialize value for key {key}: {reason}")]
    Serialize { key: String, reason: String },
}

/// Durable string key-value storage (browser `localStorage`).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

/// Sends one HTTP request and yields the raw response.
///
/// Non-success statuses are *not* errors at this level; only failures to get
/// any response at all are.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse>;
}

/// Opens duplex connections for the progress channel.
///
/// The connector reports everything that happens on the connection through
/// `events`; the returned handle is only used to close it.
pub trait SocketConnector {
    fn open(&self, url: &str, events: ChannelEvents)
        -> Result<Box<dyn SocketHandle>, ChannelError>;
}

pub trait SocketHandle {
    fn close(&mut self);
}

/// Blocking confirmation and alert dialogs.
#[cfg_attr(test, mockall::automock)]
pub trait UserPrompt {
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// Starts a browser download of `url`.
#[cfg_attr(test, mockall::automock)]
pub trait FileDownloader {
    fn download(&self, url: &str);
}
