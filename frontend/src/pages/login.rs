use common::requests::LoginRequest;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::cache::query_client;
use crate::api::endpoints;
use crate::api::storage::session;
use crate::helpers::input_value;
use crate::pages::error_banner;
use crate::routes::Route;

pub enum Msg {
    SetEmail(String),
    SetPassword(String),
    Submit,
    LoggedIn(String),
    Failed(String),
}

pub struct LoginPage {
    email: String,
    password: String,
    error: Option<String>,
    submitting: bool,
}

impl Component for LoginPage {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            error: None,
            submitting: false,
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
                if self.submitting {
                    return false;
                }
                self.submitting = true;
                self.error = None;
                let credentials = LoginRequest {
                    username: self.email.clone(),
                    password: self.password.clone(),
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    match endpoints::login(credentials).await {
                        Ok(token) => link.send_message(Msg::LoggedIn(token.access_token)),
                        Err(err) => link.send_message(Msg::Failed(err.to_string())),
                    }
                });
                true
            }
            Msg::LoggedIn(token) => {
                session().store_token(&token);
                query_client(ctx).clear();
                if let Some(navigator) = ctx.link().navigator() {
                    navigator.push(&Route::Dashboard);
                }
                false
            }
            Msg::Failed(message) => {
                self.submitting = false;
                self.error = Some(message);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if session().is_authenticated() && !self.submitting {
            return html! { <Redirect<Route> to={Route::Dashboard} /> };
        }

        let link = ctx.link();
        let on_submit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="auth-page">
                <div class="card auth-card">
                    <h1>{"MedRec"}</h1>
                    <h2>{"Sign in to your account"}</h2>
                    <form onsubmit={on_submit}>
                        { error_banner(&self.error) }
                        <label for="email">{"Email address"}</label>
                        <input id="email" type="email" autocomplete="email"
                               oninput={link.callback(|e| Msg::SetEmail(input_value(e)))} />
                        <label for="password">{"Password"}</label>
                        <input id="password" type="password" autocomplete="current-password"
                               oninput={link.callback(|e| Msg::SetPassword(input_value(e)))} />
                        <button class="button primary" type="submit" disabled={self.submitting}>
                            { if self.submitting { "Signing in…" } else { "Sign in" } }
                        </button>
                    </form>
                    <p class="muted">
                        {"No account yet? "}
                        <Link<Route> to={Route::Register}>{"Create one"}</Link<Route>>
                    </p>
                </div>
            </div>
        }
    }
}
