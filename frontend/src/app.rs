//! Application shell: builds the shared services, follows the location hash
//! and renders the page the route guards allow.

use client::Route;
use log::{debug, error};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::{html, Component, Context, Html};

use crate::components::auth::{Login, Register};
use crate::components::calendar::Calendar;
use crate::components::dashboard::Dashboard;
use crate::components::excel_loader::ExcelLoader;
use crate::components::habits::{HabitForm, HabitList};
use crate::components::navbar::Navbar;
use crate::components::stats::Stats;
use crate::helpers::{current_hash, navigate};
use crate::services::AppServices;

pub enum Msg {
    LocationChanged,
}

pub struct App {
    services: Result<AppServices, String>,
    route: Route,
    on_hash_change: Option<Closure<dyn FnMut()>>,
}

impl App {
    fn resolve_location(&mut self) {
        let requested = Route::from_path(&current_hash());
        let route = match &self.services {
            Ok(services) => requested.resolve(services.session()),
            Err(_) => requested,
        };
        if route != requested || current_hash().is_empty() {
            debug!("redirecting {} to {}", requested, route);
            navigate(route);
        }
        self.route = route;
    }

    fn page(&self, services: &AppServices) -> Html {
        let services = services.clone();
        match self.route {
            Route::Login => html! { <Login {services} /> },
            Route::Register => html! { <Register {services} /> },
            Route::Dashboard => html! { <Dashboard {services} /> },
            Route::Habits => html! { <HabitList {services} /> },
            Route::NewHabit => html! { <HabitForm {services} habit_id={None::<i64>} /> },
            Route::EditHabit(id) => html! { <HabitForm {services} habit_id={Some(id)} /> },
            Route::Calendar => html! { <Calendar {services} /> },
            Route::Stats => html! { <Stats {services} /> },
            Route::ExcelLoader => html! { <ExcelLoader {services} /> },
        }
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let services = AppServices::init().map_err(|e| {
            error!("invalid client configuration: {}", e);
            e.to_string()
        });

        let link = ctx.link().clone();
        let on_hash_change =
            Closure::<dyn FnMut()>::new(move || link.send_message(Msg::LocationChanged));
        let registered = web_sys::window()
            .map(|w| {
                w.add_event_listener_with_callback(
                    "hashchange",
                    on_hash_change.as_ref().unchecked_ref(),
                )
                .is_ok()
            })
            .unwrap_or(false);

        let mut app = Self {
            services,
            route: Route::Login,
            on_hash_change: registered.then_some(on_hash_change),
        };
        app.resolve_location();
        app
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::LocationChanged => {
                let previous = self.route;
                self.resolve_location();
                previous != self.route
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        match &self.services {
            Ok(services) => html! {
                <div class="app">
                    <Navbar services={services.clone()} route={self.route} />
                    <main class="container">{ self.page(services) }</main>
                </div>
            },
            Err(reason) => html! {
                <div class="alert alert-danger">
                    { format!("Configuración inválida: {}", reason) }
                </div>
            },
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let (Some(window), Some(listener)) = (web_sys::window(), self.on_hash_change.take()) {
            window
                .remove_event_listener_with_callback("hashchange", listener.as_ref().unchecked_ref())
                .ok();
        }
    }
}
