use client::forms::validate_register;
use client::Route;
use gloo_timers::future::TimeoutFuture;
use log::{info, warn};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::PageProps;
use crate::helpers::{input_value, navigate};

const REGISTER_FAILED: &str = "Error al registrar. Intente de nuevo.";
const REDIRECT_DELAY_MS: u32 = 2000;

pub enum Field {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

pub enum Msg {
    Set(Field, String),
    Submit,
    Registered,
    Failed(String),
}

#[derive(Default)]
pub struct Register {
    username: String,
    email: String,
    password: String,
    confirm_password: String,
    error_message: String,
    success_message: String,
    loading: bool,
}

impl Component for Register {
    type Message = Msg;
    type Properties = PageProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self::default()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Set(field, value) => {
                match field {
                    Field::Username => self.username = value,
                    Field::Email => self.email = value,
                    Field::Password => self.password = value,
                    Field::ConfirmPassword => self.confirm_password = value,
                }
                false
            }
            Msg::Submit => {
                if self.loading {
                    return false;
                }
                let request = match validate_register(
                    &self.username,
                    &self.email,
                    &self.password,
                    &self.confirm_password,
                ) {
                    Ok(request) => request,
                    Err(e) => {
                        self.error_message = e.to_string();
                        return true;
                    }
                };

                self.loading = true;
                self.error_message.clear();
                self.success_message.clear();
                let auth = ctx.props().services.gateway.auth.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match auth
                        .register(&request.username, &request.email, &request.password)
                        .await
                    {
                        Ok(user) => {
                            info!("registered user {}", user.id);
                            link.send_message(Msg::Registered);
                        }
                        Err(e) => {
                            warn!("registration failed: {}", e);
                            link.send_message(Msg::Failed(e.user_message(REGISTER_FAILED)));
                        }
                    }
                });
                true
            }
            Msg::Registered => {
                self.loading = false;
                self.success_message =
                    "¡Cuenta creada exitosamente! Redirigiendo al login...".to_string();
                spawn_local(async {
                    TimeoutFuture::new(REDIRECT_DELAY_MS).await;
                    navigate(Route::Login);
                });
                true
            }
            Msg::Failed(message) => {
                self.loading = false;
                self.error_message = message;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let field = |field: fn() -> Field| {
            link.callback(move |e: InputEvent| Msg::Set(field(), input_value(&e)))
        };

        html! {
            <div class="auth-card">
                <h2>{ "Crear cuenta" }</h2>
                <form onsubmit={link.callback(|e: SubmitEvent| { e.prevent_default(); Msg::Submit })}>
                    <input placeholder="Usuario" value={self.username.clone()}
                        oninput={field(|| Field::Username)} />
                    <input type="email" placeholder="Correo electrónico" value={self.email.clone()}
                        oninput={field(|| Field::Email)} />
                    <input type="password" placeholder="Contraseña" value={self.password.clone()}
                        oninput={field(|| Field::Password)} />
                    <input type="password" placeholder="Confirmar contraseña"
                        value={self.confirm_password.clone()}
                        oninput={field(|| Field::ConfirmPassword)} />
                    if !self.error_message.is_empty() {
                        <div class="alert alert-danger">{ self.error_message.clone() }</div>
                    }
                    if !self.success_message.is_empty() {
                        <div class="alert alert-success">{ self.success_message.clone() }</div>
                    }
                    <button type="submit" disabled={self.loading}>
                        { if self.loading { "Registrando..." } else { "Registrarse" } }
                    </button>
                </form>
                <p>
                    { "¿Ya tienes cuenta? " }
                    <a href={format!("#{}", Route::Login.path())}>{ "Inicia sesión" }</a>
                </p>
            </div>
        }
    }
}
