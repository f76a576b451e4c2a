use crate::app::App;

mod app;
mod components;
mod helpers;
mod logger;
mod platform;
mod services;

fn main() {
    logger::init();
    yew::Renderer::<App>::new().render();
}
