//! Typed gateway clients, one per backend resource.
//!
//! Each call issues exactly one HTTP request and resolves once with the
//! decoded payload or the backend's error. Callers enforce required fields;
//! nothing here retries.

mod auth;
mod excel;
mod habits;
mod notifications;
mod records;

pub use auth::AuthApi;
pub use excel::ExcelApi;
pub use habits::HabitApi;
pub use notifications::NotificationApi;
pub use records::RecordApi;

use crate::http::ApiClient;
use crate::session::SessionStore;

/// All gateway clients over one shared [`ApiClient`].
#[derive(Clone)]
pub struct ApiGateway {
    pub auth: AuthApi,
    pub habits: HabitApi,
    pub records: RecordApi,
    pub notifications: NotificationApi,
    pub excel: ExcelApi,
}

impl ApiGateway {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthApi::new(client.clone()),
            habits: HabitApi::new(client.clone()),
            records: RecordApi::new(client.clone()),
            notifications: NotificationApi::new(client.clone()),
            excel: ExcelApi::new(client),
        }
    }

    pub fn session(&self) -> &SessionStore {
        self.auth.session()
    }
}
