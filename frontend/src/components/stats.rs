use client::stats::HabitStats;
use common::model::habit::Habit;
use log::warn;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::PageProps;
use crate::helpers::today;

pub enum Msg {
    Loaded(Vec<(Habit, HabitStats)>),
    Failed(String),
}

pub struct Stats {
    rows: Vec<(Habit, HabitStats)>,
    loading: bool,
    error_message: String,
}

impl Component for Stats {
    type Message = Msg;
    type Properties = PageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let gateway = ctx.props().services.gateway.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let habits = match gateway.habits.list().await {
                Ok(habits) => habits,
                Err(e) => {
                    link.send_message(Msg::Failed(e.user_message("Error al cargar hábitos")));
                    return;
                }
            };

            let today = today();
            let mut rows = Vec::with_capacity(habits.len());
            for habit in habits {
                let records = gateway.records.list(habit.id).await.unwrap_or_else(|e| {
                    warn!("no records for habit {}: {}", habit.id, e);
                    Vec::new()
                });
                let stats = HabitStats::compute(&records, today);
                rows.push((habit, stats));
            }
            link.send_message(Msg::Loaded(rows));
        });

        Self {
            rows: Vec::new(),
            loading: true,
            error_message: String::new(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        self.loading = false;
        match msg {
            Msg::Loaded(rows) => self.rows = rows,
            Msg::Failed(message) => self.error_message = message,
        }
        true
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div class="stats">
                <h2>{ "Estadísticas" }</h2>
                if self.loading {
                    <p>{ "Cargando..." }</p>
                }
                if !self.error_message.is_empty() {
                    <div class="alert alert-danger">{ self.error_message.clone() }</div>
                }
                <table class="table">
                    <thead>
                        <tr>
                            <th>{ "Hábito" }</th>
                            <th>{ "Registros" }</th>
                            <th>{ "Completados" }</th>
                            <th>{ "Cumplimiento" }</th>
                            <th>{ "Racha actual" }</th>
                            <th>{ "Mejor racha" }</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for self.rows.iter().map(|(habit, stats)| html! {
                            <tr key={habit.id}>
                                <td>{ habit.name.clone() }</td>
                                <td>{ stats.total }</td>
                                <td>{ stats.completed }</td>
                                <td>{ format!("{}%", stats.completion_rate) }</td>
                                <td>{ stats.current_streak }</td>
                                <td>{ stats.best_streak }</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            </div>
        }
    }
}
