use yew::Properties;

use crate::services::AppServices;

pub mod auth;
pub mod calendar;
pub mod dashboard;
pub mod excel_loader;
pub mod habits;
pub mod navbar;
pub mod stats;

/// Properties shared by every page.
#[derive(Properties, PartialEq, Clone)]
pub struct PageProps {
    pub services: AppServices,
}
