use chrono::{Datelike, NaiveDate};
use client::stats::{month_grid, shift_month, CalendarDay, Week};
use common::model::habit::Habit;
use common::model::record::HabitRecord;
use common::requests::RecordPayload;
use log::warn;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::PageProps;
use crate::helpers::{show_toast, today};

const WEEKDAYS: [&str; 7] = ["Lun", "Mar", "Mié", "Jue", "Vie", "Sáb", "Dom"];
const MONTHS: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto", "Septiembre",
    "Octubre", "Noviembre", "Diciembre",
];

pub enum Msg {
    HabitsLoaded(Vec<Habit>),
    SelectHabit(i64),
    RecordsLoaded(Vec<HabitRecord>),
    ShiftMonth(i32),
    ToggleDay(NaiveDate),
    Failed(String),
}

pub struct Calendar {
    habits: Vec<Habit>,
    habit_id: Option<i64>,
    records: Vec<HabitRecord>,
    year: i32,
    month: u32,
    error_message: String,
}

impl Calendar {
    fn load_records(&self, ctx: &Context<Self>) {
        let Some(habit_id) = self.habit_id else {
            return;
        };
        let records = ctx.props().services.gateway.records.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            match records.list(habit_id).await {
                Ok(list) => link.send_message(Msg::RecordsLoaded(list)),
                Err(e) => link.send_message(Msg::Failed(e.user_message("Error al cargar registros"))),
            }
        });
    }

    fn day_cell(&self, ctx: &Context<Self>, day: Option<CalendarDay>) -> Html {
        match day {
            None => html! { <td class="empty"></td> },
            Some(day) => {
                let date = day.date;
                let class = classes!("day", day.completed.then_some("completed"));
                html! {
                    <td {class} onclick={ctx.link().callback(move |_| Msg::ToggleDay(date))}>
                        { date.day() }
                    </td>
                }
            }
        }
    }

    fn week_row(&self, ctx: &Context<Self>, week: &Week) -> Html {
        html! {
            <tr>{ for week.iter().map(|day| self.day_cell(ctx, *day)) }</tr>
        }
    }
}

impl Component for Calendar {
    type Message = Msg;
    type Properties = PageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let habits = ctx.props().services.gateway.habits.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            match habits.list().await {
                Ok(list) => link.send_message(Msg::HabitsLoaded(list)),
                Err(e) => link.send_message(Msg::Failed(e.user_message("Error al cargar hábitos"))),
            }
        });

        let now = today();
        Self {
            habits: Vec::new(),
            habit_id: None,
            records: Vec::new(),
            year: now.year(),
            month: now.month(),
            error_message: String::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::HabitsLoaded(habits) => {
                self.habit_id = habits.first().map(|h| h.id);
                self.habits = habits;
                self.load_records(ctx);
                true
            }
            Msg::SelectHabit(id) => {
                self.habit_id = Some(id);
                self.records.clear();
                self.load_records(ctx);
                true
            }
            Msg::RecordsLoaded(records) => {
                self.records = records;
                true
            }
            Msg::ShiftMonth(delta) => {
                (self.year, self.month) = shift_month(self.year, self.month, delta);
                true
            }
            Msg::ToggleDay(date) => {
                let Some(habit_id) = self.habit_id else {
                    return false;
                };
                let existing = self.records.iter().find(|r| r.date == date).map(|r| r.id);
                let records = ctx.props().services.gateway.records.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = match existing {
                        Some(record_id) => records.delete(habit_id, record_id).await,
                        None => {
                            let payload = RecordPayload {
                                habit_id,
                                date,
                                completed: true,
                                notes: None,
                            };
                            records.create(habit_id, &payload).await.map(|_| ())
                        }
                    };
                    match result {
                        Ok(()) => match records.list(habit_id).await {
                            Ok(list) => link.send_message(Msg::RecordsLoaded(list)),
                            Err(e) => warn!("could not refresh records: {}", e),
                        },
                        Err(e) => show_toast(&e.user_message("No se pudo actualizar el día")),
                    }
                });
                false
            }
            Msg::Failed(message) => {
                self.error_message = message;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let grid = month_grid(self.year, self.month, &self.records).unwrap_or_default();
        let month_name = MONTHS
            .get(self.month as usize - 1)
            .copied()
            .unwrap_or_default();
        let on_select = link.callback(|e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            match select.value().parse() {
                Ok(id) => Msg::SelectHabit(id),
                Err(_) => Msg::Failed("Hábito inválido".to_string()),
            }
        });

        html! {
            <div class="calendar">
                <select onchange={on_select}>
                    { for self.habits.iter().map(|h| html! {
                        <option value={h.id.to_string()} selected={Some(h.id) == self.habit_id}>
                            { h.name.clone() }
                        </option>
                    }) }
                </select>
                <div class="month-nav">
                    <button onclick={link.callback(|_| Msg::ShiftMonth(-1))}>{ "‹" }</button>
                    <span>{ format!("{} {}", month_name, self.year) }</span>
                    <button onclick={link.callback(|_| Msg::ShiftMonth(1))}>{ "›" }</button>
                </div>
                if !self.error_message.is_empty() {
                    <div class="alert alert-danger">{ self.error_message.clone() }</div>
                }
                <table class="month-grid">
                    <thead>
                        <tr>{ for WEEKDAYS.iter().map(|d| html! { <th>{ *d }</th> }) }</tr>
                    </thead>
                    <tbody>
                        { for grid.iter().map(|week| self.week_row(ctx, week)) }
                    </tbody>
                </table>
            </div>
        }
    }
}
