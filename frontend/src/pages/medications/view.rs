use common::model::patient::patient_name;
use yew::html::Scope;
use yew::prelude::*;

use super::form::MedicationField;
use super::{MedicationsPage, Msg};
use crate::components::badges::{confidence_badge, source_badge};
use crate::components::modal::Modal;
use crate::helpers::{format_date, input_value, select_value};
use crate::pages::error_banner;

pub fn view(page: &MedicationsPage, ctx: &Context<MedicationsPage>) -> Html {
    let link = ctx.link();
    let title = if page.editing.is_some() { "Edit Medication" } else { "Add Medication" };
    let on_filter = link.callback(|e: Event| Msg::SetPatientFilter(select_value(e).parse().ok()));

    html! {
        <div class="page medications">
            <div class="page-header">
                <div>
                    <h1>{"Medications"}</h1>
                    <p class="muted">{"Track every medication across sources"}</p>
                </div>
                <button class="button primary" onclick={link.callback(|_| Msg::OpenCreate)}>
                    {"Add Medication"}
                </button>
            </div>

            <div class="toolbar">
                <input class="search" type="search"
                       placeholder="Search medications by name, generic name, NDC, or source…"
                       value={page.search.clone()}
                       oninput={link.callback(|e| Msg::SetSearch(input_value(e)))} />
                <select onchange={on_filter}>
                    <option value="" selected={page.patient_filter.is_none()}>{"All Patients"}</option>
                    { for page.patients.iter().map(|p| html! {
                        <option value={p.id.to_string()} selected={page.patient_filter == Some(p.id)}>
                            { p.full_name() }
                        </option>
                    }) }
                </select>
            </div>

            { error_banner(&page.error) }
            { build_table(page, link) }

            <Modal title={title} open={page.form_open} on_close={link.callback(|_| Msg::CloseForm)}>
                { build_form(page, link) }
            </Modal>
        </div>
    }
}

fn build_table(page: &MedicationsPage, link: &Scope<MedicationsPage>) -> Html {
    if page.loading && page.medications.is_empty() {
        return html! { <p class="muted">{"Loading medications…"}</p> };
    }
    let medications = page.filtered();
    if medications.is_empty() {
        let hint = if page.search.trim().is_empty() && page.patient_filter.is_none() {
            "Get started by adding a medication."
        } else {
            "Try adjusting your search or filter."
        };
        return html! {
            <div class="empty">
                <h3>{"No medications found"}</h3>
                <p class="muted">{ hint }</p>
            </div>
        };
    }

    html! {
        <table class="table">
            <thead>
                <tr>
                    <th>{"Medication"}</th>
                    <th>{"Patient"}</th>
                    <th>{"Dosage & Frequency"}</th>
                    <th>{"Source"}</th>
                    <th>{"Last Filled"}</th>
                    <th />
                </tr>
            </thead>
            <tbody>
                { for medications.into_iter().map(|m| {
                    let id = m.id;
                    let schedule = match (&m.dosage, &m.frequency) {
                        (None, None) => html! { <span class="muted">{"Not specified"}</span> },
                        (dosage, frequency) => html! {
                            <>
                                <div>{ dosage.clone().unwrap_or_default() }</div>
                                <div class="muted">{ frequency.clone().unwrap_or_default() }</div>
                            </>
                        },
                    };
                    html! {
                        <tr key={id} class={classes!((!m.is_active).then_some("inactive"))}>
                            <td>
                                <strong>{ &m.name }</strong>
                                if let Some(generic) = &m.generic_name {
                                    <div class="muted">{ format!("Generic: {}", generic) }</div>
                                }
                                if let Some(ndc) = &m.ndc_number {
                                    <div class="muted small">{ format!("NDC: {}", ndc) }</div>
                                }
                            </td>
                            <td>{ patient_name(&page.patients, m.patient_id) }</td>
                            <td>{ schedule }</td>
                            <td>
                                { source_badge(m.source) }
                                if let Some(confidence) = m.ocr_confidence {
                                    { confidence_badge(confidence) }
                                }
                            </td>
                            <td>
                                { if m.last_filled.is_some() { format_date(m.last_filled) } else { "Not specified".to_string() } }
                            </td>
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

fn build_form(page: &MedicationsPage, link: &Scope<MedicationsPage>) -> Html {
    let patients: Vec<(i64, String)> = page.patients.iter().map(|p| (p.id, p.full_name())).collect();
    let on_change = link.callback(|(field, value): (MedicationField, String)| Msg::SetField(field, value));
    let on_submit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::Save
    });

    html! {
        <form class="form" onsubmit={on_submit}>
            { error_banner(&page.form_error) }
            { page.form.fields(&patients, &on_change) }
            <div class="form-actions">
                <button type="button" class="button secondary" onclick={link.callback(|_| Msg::CloseForm)}>
                    {"Cancel"}
                </button>
                <button type="submit" class="button primary" disabled={page.saving}>
                    { if page.saving { "Saving…" } else if page.editing.is_some() { "Update Medication" } else { "Add Medication" } }
                </button>
            </div>
        </form>
    }
}
