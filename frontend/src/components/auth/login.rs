use client::forms::validate_login;
use client::Route;
use log::warn;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::PageProps;
use crate::helpers::{input_value, navigate};

const LOGIN_FAILED: &str = "Credenciales inválidas. Inténtelo de nuevo.";

pub enum Msg {
    SetEmail(String),
    SetPassword(String),
    Submit,
    Failed(String),
    SignedIn,
}

pub struct Login {
    email: String,
    password: String,
    error_message: String,
    loading: bool,
}

impl Component for Login {
    type Message = Msg;
    type Properties = PageProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            error_message: String::new(),
            loading: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetEmail(email) => {
                self.email = email;
                false
            }
            Msg::SetPassword(password) => {
                self.password = password;
                false
            }
            Msg::Submit => {
                if self.loading {
                    return false;
                }
                let request = match validate_login(&self.email, &self.password) {
                    Ok(request) => request,
                    Err(e) => {
                        self.error_message = e.to_string();
                        return true;
                    }
                };

                self.loading = true;
                self.error_message.clear();
                let auth = ctx.props().services.gateway.auth.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match auth.sign_in(&request.email, &request.password).await {
                        Ok(_) => link.send_message(Msg::SignedIn),
                        Err(e) => {
                            warn!("login failed: {}", e);
                            link.send_message(Msg::Failed(LOGIN_FAILED.to_string()));
                        }
                    }
                });
                true
            }
            Msg::Failed(message) => {
                self.loading = false;
                self.error_message = message;
                true
            }
            Msg::SignedIn => {
                self.loading = false;
                let services = &ctx.props().services;
                let notifications = services.notifications.clone();
                spawn_local(async move {
                    notifications.load_current_user().await.ok();
                });
                navigate(Route::Dashboard);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="auth-card">
                <h2>{ "Iniciar sesión" }</h2>
                <form {onsubmit}>
                    <input
                        type="email"
                        placeholder="Correo electrónico"
                        value={self.email.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetEmail(input_value(&e)))}
                    />
                    <input
                        type="password"
                        placeholder="Contraseña"
                        value={self.password.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetPassword(input_value(&e)))}
                    />
                    if !self.error_message.is_empty() {
                        <div class="alert alert-danger">{ self.error_message.clone() }</div>
                    }
                    <button type="submit" disabled={self.loading}>
                        { if self.loading { "Ingresando..." } else { "Ingresar" } }
                    </button>
                </form>
                <p>
                    { "¿No tienes cuenta? " }
                    <a href={format!("#{}", Route::Register.path())}>{ "Regístrate" }</a>
                </p>
            </div>
        }
    }
}
