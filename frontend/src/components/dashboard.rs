use chrono::NaiveDate;
use client::Route;
use common::model::habit::Habit;
use common::requests::RecordPayload;
use log::warn;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::PageProps;
use crate::helpers::{show_toast, today};

pub enum Msg {
    Loaded(Vec<Habit>),
    LoadFailed(String),
    CompleteToday(i64),
    Completed(i64),
}

pub struct Dashboard {
    habits: Vec<Habit>,
    completed_today: Vec<i64>,
    loading: bool,
    error_message: String,
}

fn load(ctx: &Context<Dashboard>) {
    let habits = ctx.props().services.gateway.habits.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        match habits.list().await {
            Ok(list) => link.send_message(Msg::Loaded(list)),
            Err(e) => {
                warn!("could not load habits: {}", e);
                link.send_message(Msg::LoadFailed(e.user_message("Error al cargar hábitos")));
            }
        }
    });
}

impl Component for Dashboard {
    type Message = Msg;
    type Properties = PageProps;

    fn create(ctx: &Context<Self>) -> Self {
        load(ctx);
        Self {
            habits: Vec::new(),
            completed_today: Vec::new(),
            loading: true,
            error_message: String::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(habits) => {
                self.loading = false;
                self.habits = habits;
                true
            }
            Msg::LoadFailed(message) => {
                self.loading = false;
                self.error_message = message;
                true
            }
            Msg::CompleteToday(habit_id) => {
                let records = ctx.props().services.gateway.records.clone();
                let link = ctx.link().clone();
                let payload = RecordPayload {
                    habit_id,
                    date: today(),
                    completed: true,
                    notes: None,
                };
                spawn_local(async move {
                    match records.create(habit_id, &payload).await {
                        Ok(_) => link.send_message(Msg::Completed(habit_id)),
                        Err(e) => show_toast(&e.user_message("No se pudo registrar el hábito")),
                    }
                });
                false
            }
            Msg::Completed(habit_id) => {
                self.completed_today.push(habit_id);
                show_toast("¡Hábito registrado para hoy!");
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let session = ctx.props().services.session();
        let username = session
            .get_user()
            .map(|u| u.username)
            .unwrap_or_default();
        let date: NaiveDate = today();

        html! {
            <div class="dashboard">
                <h2>{ format!("Hola, {}", username) }</h2>
                <p class="text-muted">{ date.format("%d/%m/%Y").to_string() }</p>
                if self.loading {
                    <p>{ "Cargando..." }</p>
                } else if !self.error_message.is_empty() {
                    <div class="alert alert-danger">{ self.error_message.clone() }</div>
                } else if self.habits.is_empty() {
                    <p>
                        { "Aún no tienes hábitos. " }
                        <a href={format!("#{}", Route::NewHabit.path())}>{ "Crea el primero" }</a>
                    </p>
                } else {
                    <ul class="habit-summary">
                        { for self.habits.iter().filter(|h| h.is_active).map(|habit| self.habit_row(ctx, habit)) }
                    </ul>
                }
            </div>
        }
    }
}

impl Dashboard {
    fn habit_row(&self, ctx: &Context<Self>, habit: &Habit) -> Html {
        let id = habit.id;
        let done = self.completed_today.contains(&id);
        html! {
            <li key={id}>
                <span>{ habit.name.clone() }</span>
                <button
                    disabled={done}
                    onclick={ctx.link().callback(move |_| Msg::CompleteToday(id))}
                >
                    { if done { "Hecho hoy" } else { "Marcar hoy" } }
                </button>
            </li>
        }
    }
}
