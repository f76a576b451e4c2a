//! Long-lived client objects shared by every page.

use std::rc::Rc;

use client::config::DEFAULT_API_URL;
use client::http::ApiClient;
use client::{
    ApiConfig, ApiGateway, ConfigError, FileDownloader, FileRecordBrowser, NotificationCenter,
    ProgressChannel, SessionStore, UploadOrchestrator, UserPrompt,
};
use log::info;

use crate::platform::{
    session_storage, BrowserPrompt, GlooConnector, GlooTransport, LocationDownloader,
};

#[derive(Clone)]
pub struct AppServices {
    pub gateway: ApiGateway,
    pub notifications: NotificationCenter,
    pub prompt: Rc<dyn UserPrompt>,
    pub downloader: Rc<dyn FileDownloader>,
    config: Rc<ApiConfig>,
}

impl PartialEq for AppServices {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.config, &other.config)
    }
}

fn load_config() -> Result<ApiConfig, ConfigError> {
    let base = option_env!("HABITS_API_URL").unwrap_or(DEFAULT_API_URL);
    let origin = web_sys::window().and_then(|w| w.location().origin().ok());
    ApiConfig::from_base(base, origin.as_deref())
}

impl AppServices {
    pub fn init() -> Result<Self, ConfigError> {
        let config = load_config()?;
        info!("api at {}, progress at {}", config.api_url, config.ws_url);

        let session = SessionStore::new(session_storage());
        let client = ApiClient::new(config.clone(), session, Rc::new(GlooTransport));
        let gateway = ApiGateway::new(client);
        let prompt: Rc<dyn UserPrompt> = Rc::new(BrowserPrompt);
        let downloader: Rc<dyn FileDownloader> = Rc::new(LocationDownloader);
        let notifications = NotificationCenter::new(&gateway, prompt.clone(), downloader.clone());

        Ok(Self {
            gateway,
            notifications,
            prompt,
            downloader,
            config: Rc::new(config),
        })
    }

    pub fn session(&self) -> &SessionStore {
        self.gateway.session()
    }

    /// A fresh upload job over its own progress channel. Owned by one view
    /// and torn down with it.
    pub fn upload_orchestrator(&self) -> UploadOrchestrator {
        let channel = ProgressChannel::new(self.config.ws_url.clone(), Rc::new(GlooConnector));
        UploadOrchestrator::new(self.gateway.excel.clone(), channel)
    }

    pub fn file_browser(&self) -> FileRecordBrowser {
        FileRecordBrowser::new(self.gateway.excel.clone(), self.prompt.clone())
    }
}
