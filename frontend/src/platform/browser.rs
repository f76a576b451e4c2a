use client::{FileDownloader, UserPrompt};
use log::warn;

pub struct BrowserPrompt;

impl UserPrompt for BrowserPrompt {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            window.alert_with_message(message).ok();
        }
    }
}

/// Starts a download by pointing the page at the file; the server answers
/// with an attachment so the page itself stays put.
pub struct LocationDownloader;

impl FileDownloader for LocationDownloader {
    fn download(&self, url: &str) {
        let result = web_sys::window()
            .map(|w| w.location().set_href(url))
            .unwrap_or(Ok(()));
        if let Err(e) = result {
            warn!("could not start download of {}: {:?}", url, e);
        }
    }
}
