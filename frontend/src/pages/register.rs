use common::requests::{non_blank, RegisterRequest};
use common::validation::{confirm_password, Validate};
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::endpoints;
use crate::api::storage::session;
use crate::helpers::{input_value, select_value};
use crate::pages::error_banner;
use crate::routes::Route;

const SPECIALTIES: [&str; 6] = [
    "Clinical Pharmacist",
    "Community Pharmacist",
    "Hospital Pharmacist",
    "Ambulatory Care Pharmacist",
    "Geriatric Pharmacist",
    "Other",
];

#[derive(Clone, Copy)]
pub enum Field {
    Name,
    Email,
    Password,
    Confirmation,
    License,
    Specialty,
    Practice,
}

pub enum Msg {
    Set(Field, String),
    Submit,
    Registered,
    Failed(String),
}

#[derive(Default)]
pub struct RegisterPage {
    name: String,
    email: String,
    password: String,
    confirmation: String,
    license_number: String,
    specialty: String,
    practice_name: String,
    error: Option<String>,
    submitting: bool,
    registered: bool,
}

impl RegisterPage {
    fn request(&self) -> RegisterRequest {
        RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            license_number: non_blank(&self.license_number),
            specialty: non_blank(&self.specialty),
            practice_name: non_blank(&self.practice_name),
        }
    }
}

impl Component for RegisterPage {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self::default()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Set(field, value) => {
                let slot = match field {
                    Field::Name => &mut self.name,
                    Field::Email => &mut self.email,
                    Field::Password => &mut self.password,
                    Field::Confirmation => &mut self.confirmation,
                    Field::License => &mut self.license_number,
                    Field::Specialty => &mut self.specialty,
                    Field::Practice => &mut self.practice_name,
                };
                *slot = value;
                false
            }
            Msg::Submit => {
                if self.submitting {
                    return false;
                }
                let request = self.request();
                let checked = confirm_password(&self.password, &self.confirmation)
                    .and_then(|_| request.validate());
                if let Err(err) = checked {
                    self.error = Some(err.to_string());
                    return true;
                }
                self.submitting = true;
                self.error = None;
                let link = ctx.link().clone();
                spawn_local(async move {
                    match endpoints::register(request).await {
                        Ok(_) => link.send_message(Msg::Registered),
                        Err(err) => link.send_message(Msg::Failed(err.to_string())),
                    }
                });
                true
            }
            Msg::Registered => {
                self.submitting = false;
                self.registered = true;
                true
            }
            Msg::Failed(message) => {
                self.submitting = false;
                self.error = Some(message);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if session().is_authenticated() {
            return html! { <Redirect<Route> to={Route::Dashboard} /> };
        }
        if self.registered {
            return html! {
                <div class="auth-page">
                    <div class="card auth-card centered">
                        <h2>{"Registration successful"}</h2>
                        <p class="muted">{"Your account has been created. You can now sign in."}</p>
                        <Link<Route> to={Route::Login} classes={classes!("button", "primary")}>{"Sign in"}</Link<Route>>
                    </div>
                </div>
            };
        }

        let link = ctx.link();
        let input = |field: Field, id: &'static str, label: &'static str, kind: &'static str| {
            html! {
                <>
                    <label for={id}>{ label }</label>
                    <input id={id} type={kind}
                           oninput={link.callback(move |e| Msg::Set(field, input_value(e)))} />
                </>
            }
        };
        let on_submit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="auth-page">
                <div class="card auth-card">
                    <h1>{"MedRec"}</h1>
                    <h2>{"Create your account"}</h2>
                    <form onsubmit={on_submit}>
                        { error_banner(&self.error) }
                        { input(Field::Name, "name", "Full name", "text") }
                        { input(Field::Email, "email", "Email address", "email") }
                        { input(Field::License, "license", "License number", "text") }
                        <label for="specialty">{"Specialty"}</label>
                        <select id="specialty"
                                onchange={link.callback(|e| Msg::Set(Field::Specialty, select_value(e)))}>
                            <option value="">{"Select specialty"}</option>
                            { for SPECIALTIES.iter().map(|s| html! { <option value={*s}>{ *s }</option> }) }
                        </select>
                        { input(Field::Practice, "practice", "Practice name", "text") }
                        { input(Field::Password, "password", "Password", "password") }
                        { input(Field::Confirmation, "confirmation", "Confirm password", "password") }
                        <button class="button primary" type="submit" disabled={self.submitting}>
                            { if self.submitting { "Creating account…" } else { "Create account" } }
                        </button>
                    </form>
                    <p class="muted">
                        {"Already registered? "}
                        <Link<Route> to={Route::Login}>{"Sign in"}</Link<Route>>
                    </p>
                </div>
            </div>
        }
    }
}
