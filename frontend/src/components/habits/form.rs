use client::forms::validate_habit;
use client::Route;
use common::model::habit::Habit;
use log::{info, warn};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::helpers::{input_value, navigate, show_toast};
use crate::services::AppServices;

#[derive(Properties, PartialEq, Clone)]
pub struct HabitFormProps {
    pub services: AppServices,
    /// Habit being edited; `None` creates a new one.
    #[prop_or_default]
    pub habit_id: Option<i64>,
}

pub enum Msg {
    Loaded(Habit),
    SetName(String),
    SetDescription(String),
    SetFrequency(String),
    Submit,
    Saved,
    Failed(String),
}

pub struct HabitForm {
    name: String,
    description: String,
    frequency: String,
    error_message: String,
    saving: bool,
}

impl Component for HabitForm {
    type Message = Msg;
    type Properties = HabitFormProps;

    fn create(ctx: &Context<Self>) -> Self {
        if let Some(id) = ctx.props().habit_id {
            let habits = ctx.props().services.gateway.habits.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                match habits.get(id).await {
                    Ok(habit) => link.send_message(Msg::Loaded(habit)),
                    Err(e) => {
                        warn!("could not load habit {}: {}", id, e);
                        link.send_message(Msg::Failed(e.user_message("Hábito no encontrado")));
                    }
                }
            });
        }
        Self {
            name: String::new(),
            description: String::new(),
            frequency: "daily".to_string(),
            error_message: String::new(),
            saving: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(habit) => {
                self.name = habit.name;
                self.description = habit.description.unwrap_or_default();
                self.frequency = habit.frequency;
                true
            }
            Msg::SetName(value) => {
                self.name = value;
                false
            }
            Msg::SetDescription(value) => {
                self.description = value;
                false
            }
            Msg::SetFrequency(value) => {
                self.frequency = value;
                false
            }
            Msg::Submit => {
                let payload = match validate_habit(&self.name, &self.description, &self.frequency) {
                    Ok(payload) => payload,
                    Err(e) => {
                        self.error_message = e.to_string();
                        return true;
                    }
                };
                self.saving = true;
                self.error_message.clear();

                let habits = ctx.props().services.gateway.habits.clone();
                let editing = ctx.props().habit_id;
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = match editing {
                        Some(id) => habits.update(id, &payload).await,
                        None => habits.create(&payload).await,
                    };
                    match result {
                        Ok(habit) => {
                            info!("saved habit {}", habit.id);
                            link.send_message(Msg::Saved);
                        }
                        Err(e) => link.send_message(Msg::Failed(
                            e.user_message("Error al guardar el hábito"),
                        )),
                    }
                });
                true
            }
            Msg::Saved => {
                self.saving = false;
                show_toast("Hábito guardado");
                navigate(Route::Habits);
                false
            }
            Msg::Failed(message) => {
                self.saving = false;
                self.error_message = message;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let title = if ctx.props().habit_id.is_some() {
            "Editar hábito"
        } else {
            "Nuevo hábito"
        };
        let on_frequency = link.callback(|e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            Msg::SetFrequency(select.value())
        });

        html! {
            <div class="habit-form">
                <h2>{ title }</h2>
                <form onsubmit={link.callback(|e: SubmitEvent| { e.prevent_default(); Msg::Submit })}>
                    <input placeholder="Nombre" value={self.name.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetName(input_value(&e)))} />
                    <textarea placeholder="Descripción" value={self.description.clone()}
                        oninput={link.callback(|e: InputEvent| {
                            let area: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                            Msg::SetDescription(area.value())
                        })} />
                    <select onchange={on_frequency}>
                        <option value="daily" selected={self.frequency == "daily"}>{ "Diario" }</option>
                        <option value="weekly" selected={self.frequency == "weekly"}>{ "Semanal" }</option>
                        <option value="monthly" selected={self.frequency == "monthly"}>{ "Mensual" }</option>
                    </select>
                    if !self.error_message.is_empty() {
                        <div class="alert alert-danger">{ self.error_message.clone() }</div>
                    }
                    <button type="submit" disabled={self.saving}>{ "Guardar" }</button>
                    <button type="button" onclick={Callback::from(|_: MouseEvent| navigate(Route::Habits))}>
                        { "Cancelar" }
                    </button>
                </form>
            </div>
        }
    }
}
