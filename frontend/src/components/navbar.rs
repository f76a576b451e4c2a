//! Top bar with page links, the notification bell and the user menu.

use client::{ActionOutcome, Route};
use common::model::notification::{NotificationAction, NotificationActionType, NotificationItem};
use log::debug;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::helpers::{navigate, show_toast};
use crate::services::AppServices;

#[derive(Properties, PartialEq, Clone)]
pub struct NavbarProps {
    pub services: AppServices,
    /// Current page; a change re-renders the bar with fresh session state.
    pub route: Route,
}

pub enum Msg {
    Toggle,
    Refresh,
    Refreshed,
    MarkAsRead(i64),
    MarkAllAsRead,
    RunAction(NotificationAction, NotificationItem),
    Logout,
}

pub struct Navbar {
    open: bool,
}

impl Navbar {
    fn load(ctx: &Context<Self>) {
        let center = ctx.props().services.notifications.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            center.load_current_user().await.ok();
            link.send_message(Msg::Refreshed);
        });
    }

    fn item(&self, ctx: &Context<Self>, item: &NotificationItem) -> Html {
        let id = item.id;
        let class = classes!("notification", (!item.is_read).then_some("unread"));
        html! {
            <li key={id} {class}>
                <div onclick={ctx.link().callback(move |_| Msg::MarkAsRead(id))}>
                    <strong>{ item.title.clone() }</strong>
                    <p>{ item.message.clone() }</p>
                    <small>{ item.created_at.clone() }</small>
                </div>
                <div class="notification-actions">
                    { for item.actions.iter().map(|action| {
                        let action = action.clone();
                        let owner = item.clone();
                        let icon = match action.action_type {
                            NotificationActionType::Download => "download",
                            NotificationActionType::Delete => "delete",
                            NotificationActionType::Unknown => "help",
                        };
                        html! {
                            <button class="icon-btn" title={action.label.clone()}
                                onclick={ctx.link().callback(move |_| Msg::RunAction(action.clone(), owner.clone()))}>
                                <i class="material-icons">{ icon }</i>
                            </button>
                        }
                    }) }
                </div>
            </li>
        }
    }
}

impl Component for Navbar {
    type Message = Msg;
    type Properties = NavbarProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self::load(ctx);
        Self { open: false }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if old_props.route != ctx.props().route {
            self.open = false;
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let services = &ctx.props().services;
        let center = services.notifications.clone();
        let link = ctx.link().clone();
        match msg {
            Msg::Toggle => {
                if !services.session().is_authenticated() {
                    navigate(Route::Login);
                    return false;
                }
                self.open = !self.open;
                if self.open {
                    link.send_message(Msg::Refresh);
                }
                true
            }
            Msg::Refresh => {
                Self::load(ctx);
                true
            }
            Msg::Refreshed => true,
            Msg::MarkAsRead(id) => {
                spawn_local(async move {
                    if let Ok(true) = center.mark_as_read(id).await {
                        link.send_message(Msg::Refreshed);
                    }
                });
                false
            }
            Msg::MarkAllAsRead => {
                let Some(user_id) = services.session().get_user_id() else {
                    return false;
                };
                spawn_local(async move {
                    if center.mark_all_as_read(user_id).await.is_ok() {
                        link.send_message(Msg::Refreshed);
                    }
                });
                false
            }
            Msg::RunAction(action, item) => {
                spawn_local(async move {
                    match center.execute_action(&action, &item).await {
                        Ok(ActionOutcome::Deleted) => show_toast("Archivo eliminado"),
                        Ok(outcome) => debug!("notification action finished: {:?}", outcome),
                        Err(e) => debug!("notification action failed: {}", e),
                    }
                    link.send_message(Msg::Refreshed);
                });
                false
            }
            Msg::Logout => {
                services.session().logout();
                center.clear();
                self.open = false;
                navigate(Route::Login);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let services = &ctx.props().services;
        if !services.session().is_authenticated() {
            return html! {
                <nav class="navbar"><span class="brand">{ "Hábitos" }</span></nav>
            };
        }

        let link = ctx.link();
        let center = &services.notifications;
        let unread = center.unread_count();
        let current = ctx.props().route;
        let nav_link = |route: Route, label: &str| {
            let class = classes!("nav-link", (route == current).then_some("active"));
            html! { <a {class} href={format!("#{}", route.path())}>{ label.to_string() }</a> }
        };

        html! {
            <nav class="navbar">
                <span class="brand">{ "Hábitos" }</span>
                { nav_link(Route::Dashboard, "Inicio") }
                { nav_link(Route::Habits, "Hábitos") }
                { nav_link(Route::Calendar, "Calendario") }
                { nav_link(Route::Stats, "Estadísticas") }
                { nav_link(Route::ExcelLoader, "Cargar Excel") }
                <div class="notifications">
                    <button class="icon-btn" onclick={link.callback(|_| Msg::Toggle)}>
                        <i class="material-icons">{ "notifications" }</i>
                        if unread > 0 {
                            <span class="badge">{ unread }</span>
                        }
                    </button>
                    if self.open {
                        <div class="notification-panel">
                            <div class="panel-header">
                                <span>{ "Notificaciones" }</span>
                                <button disabled={unread == 0}
                                    onclick={link.callback(|_| Msg::MarkAllAsRead)}>
                                    { "Marcar todas como leídas" }
                                </button>
                            </div>
                            if center.is_loading() {
                                <p>{ "Cargando..." }</p>
                            } else if center.items().is_empty() {
                                <p>{ "No tienes notificaciones" }</p>
                            } else {
                                <ul>{ for center.items().iter().map(|item| self.item(ctx, item)) }</ul>
                            }
                        </div>
                    }
                </div>
                <span class="avatar">{ services.session().user_initial() }</span>
                <button onclick={link.callback(|_| Msg::Logout)}>{ "Salir" }</button>
            </nav>
        }
    }
}
