use client::Route;
use common::model::habit::Habit;
use log::{info, warn};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::PageProps;
use crate::helpers::{navigate, show_toast};

pub enum Msg {
    Reload,
    Loaded(Vec<Habit>),
    Failed(String),
    Delete(i64),
}

pub struct HabitList {
    habits: Vec<Habit>,
    loading: bool,
    error_message: String,
}

impl Component for HabitList {
    type Message = Msg;
    type Properties = PageProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Reload);
        Self {
            habits: Vec::new(),
            loading: true,
            error_message: String::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let services = &ctx.props().services;
        match msg {
            Msg::Reload => {
                self.loading = true;
                let habits = services.gateway.habits.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match habits.list().await {
                        Ok(list) => link.send_message(Msg::Loaded(list)),
                        Err(e) => {
                            warn!("could not load habits: {}", e);
                            link.send_message(Msg::Failed(
                                e.user_message("Error al cargar hábitos"),
                            ));
                        }
                    }
                });
                true
            }
            Msg::Loaded(habits) => {
                self.loading = false;
                self.error_message.clear();
                self.habits = habits;
                true
            }
            Msg::Failed(message) => {
                self.loading = false;
                self.error_message = message;
                true
            }
            Msg::Delete(id) => {
                let name = self
                    .habits
                    .iter()
                    .find(|h| h.id == id)
                    .map(|h| h.name.clone())
                    .unwrap_or_default();
                if !services
                    .prompt
                    .confirm(&format!("¿Seguro que deseas eliminar {}?", name))
                {
                    return false;
                }
                let habits = services.gateway.habits.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match habits.delete(id).await {
                        Ok(()) => {
                            info!("deleted habit {}", id);
                            show_toast("Hábito eliminado");
                            link.send_message(Msg::Reload);
                        }
                        Err(e) => show_toast(&e.user_message("Error al eliminar hábito")),
                    }
                });
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="habit-list">
                <div class="toolbar">
                    <h2>{ "Mis hábitos" }</h2>
                    <button onclick={Callback::from(|_: MouseEvent| navigate(Route::NewHabit))}>
                        { "Nuevo hábito" }
                    </button>
                </div>
                if self.loading {
                    <p>{ "Cargando..." }</p>
                }
                if !self.error_message.is_empty() {
                    <div class="alert alert-danger">{ self.error_message.clone() }</div>
                }
                <table class="table">
                    <thead>
                        <tr>
                            <th>{ "Nombre" }</th>
                            <th>{ "Descripción" }</th>
                            <th>{ "Frecuencia" }</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        { for self.habits.iter().map(|habit| {
                            let id = habit.id;
                            html! {
                                <tr key={id}>
                                    <td>{ habit.name.clone() }</td>
                                    <td>{ habit.description.clone().unwrap_or_default() }</td>
                                    <td>{ habit.frequency.clone() }</td>
                                    <td>
                                        <button onclick={Callback::from(move |_: MouseEvent| navigate(Route::EditHabit(id)))}>
                                            { "Editar" }
                                        </button>
                                        <button class="danger" onclick={link.callback(move |_| Msg::Delete(id))}>
                                            { "Eliminar" }
                                        </button>
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
            </div>
        }
    }
}
