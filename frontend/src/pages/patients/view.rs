use yew::html::Scope;
use yew::prelude::*;

use super::messages::{Msg, PatientField};
use super::state::PatientsPage;
use crate::components::modal::Modal;
use crate::helpers::{input_value, today};
use crate::pages::error_banner;

pub fn view(page: &PatientsPage, ctx: &Context<PatientsPage>) -> Html {
    let link = ctx.link();
    let title = if page.editing.is_some() { "Edit Patient" } else { "Add Patient" };

    html! {
        <div class="page patients">
            <div class="page-header">
                <div>
                    <h1>{"Patients"}</h1>
                    <p class="muted">{"Manage patient records and demographics"}</p>
                </div>
                <button class="button primary" onclick={link.callback(|_| Msg::OpenCreate)}>
                    {"Add Patient"}
                </button>
            </div>

            <input class="search" type="search"
                   placeholder="Search patients by name, MRN, or email…"
                   value={page.search.clone()}
                   oninput={link.callback(|e| Msg::SetSearch(input_value(e)))} />

            { error_banner(&page.error) }
            { build_table(page, link) }

            <Modal title={title} open={page.form_open} on_close={link.callback(|_| Msg::CloseForm)}>
                { build_form(page, link) }
            </Modal>
        </div>
    }
}

fn build_table(page: &PatientsPage, link: &Scope<PatientsPage>) -> Html {
    if page.loading && page.patients.is_empty() {
        return html! { <p class="muted">{"Loading patients…"}</p> };
    }
    let patients = page.filtered();
    if patients.is_empty() {
        let message = if page.search.trim().is_empty() {
            "No patients yet. Add your first patient to get started."
        } else {
            "No patients match your search."
        };
        return html! { <p class="empty">{ message }</p> };
    }

    let today = today();
    html! {
        <table class="table">
            <thead>
                <tr>
                    <th>{"Patient"}</th>
                    <th>{"Date of birth"}</th>
                    <th>{"Contact"}</th>
                    <th>{"MRN"}</th>
                    <th />
                </tr>
            </thead>
            <tbody>
                { for patients.into_iter().map(|patient| {
                    let id = patient.id;
                    html! {
                        <tr key={id}>
                            <td>
                                <strong>{ patient.full_name() }</strong>
                                <div class="muted">{ format!("Age {}", patient.age_on(today)) }</div>
                            </td>
                            <td>{ patient.date_of_birth.format("%Y-%m-%d").to_string() }</td>
                            <td>
                                <div>{ patient.phone.clone().unwrap_or_else(|| "No phone".to_string()) }</div>
                                <div class="muted">{ patient.email.clone().unwrap_or_default() }</div>
                            </td>
                            <td>{ patient.mrn.clone().unwrap_or_else(|| "No MRN".to_string()) }</td>
                            <td class="actions">
                                <button class="button link" onclick={link.callback(move |_| Msg::OpenEdit(id))}>
                                    {"Edit"}
                                </button>
                                <button class="button link danger" onclick={link.callback(move |_| Msg::Delete(id))}>
                                    {"Delete"}
                                </button>
                            </td>
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}

fn field(
    link: &Scope<PatientsPage>,
    field: PatientField,
    label: &'static str,
    kind: &'static str,
    value: &str,
) -> Html {
    html! {
        <label class="field">
            <span>{ label }</span>
            <input type={kind}
                   value={value.to_string()}
                   oninput={link.callback(move |e| Msg::SetField(field, input_value(e)))} />
        </label>
    }
}

fn build_form(page: &PatientsPage, link: &Scope<PatientsPage>) -> Html {
    let form = &page.form;
    let on_submit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::Save
    });

    html! {
        <form class="form" onsubmit={on_submit}>
            { error_banner(&page.form_error) }
            <div class="form-row">
                { field(link, PatientField::FirstName, "First name *", "text", &form.first_name) }
                { field(link, PatientField::LastName, "Last name *", "text", &form.last_name) }
            </div>
            { field(link, PatientField::DateOfBirth, "Date of birth *", "date", &form.date_of_birth) }
            <div class="form-row">
                { field(link, PatientField::Phone, "Phone", "tel", &form.phone) }
                { field(link, PatientField::Email, "Email", "email", &form.email) }
            </div>
            { field(link, PatientField::Mrn, "Medical record number", "text", &form.mrn) }
            <div class="form-actions">
                <button type="button" class="button secondary" onclick={link.callback(|_| Msg::CloseForm)}>
                    {"Cancel"}
                </button>
                <button type="submit" class="button primary" disabled={page.saving}>
                    { if page.saving { "Saving…" } else if page.editing.is_some() { "Update Patient" } else { "Add Patient" } }
                </button>
            </div>
        </form>
    }
}
