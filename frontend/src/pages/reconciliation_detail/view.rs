use common::model::medication::Medication;
use yew::html::Scope;
use yew::prelude::*;
use yew_router::prelude::*;

use super::messages::Msg;
use super::state::ReconciliationDetailPage;
use crate::components::badges::{confidence_badge, source_badge, status_badge};
use crate::helpers::{format_date, format_timestamp, input_value, textarea_value};
use crate::pages::error_banner;
use crate::pages::medications::form::MedicationField;
use crate::routes::Route;

pub fn view(page: &ReconciliationDetailPage, ctx: &Context<ReconciliationDetailPage>) -> Html {
    let link = ctx.link();
    let Some(detail) = &page.detail else {
        return html! {
            <div class="page">
                if page.loading {
                    <p class="muted">{"Loading reconciliation…"}</p>
                } else {
                    <div class="alert error">
                        { page.error.clone().unwrap_or_else(|| "Error loading reconciliation details. Please try again.".to_string()) }
                    </div>
                }
            </div>
        };
    };
    let rec = &detail.reconciliation;

    html! {
        <div class="page reconciliation-detail">
            <div class="page-header">
                <div>
                    <Link<Route> to={Route::Reconciliations} classes={classes!("back-link")}>{"← Reconciliations"}</Link<Route>>
                    <h1>{ format!("Reconciliation #{}", rec.id) }</h1>
                    <p class="muted">{"Review and approve patient medications"}</p>
                </div>
                { status_badge(rec.status) }
            </div>

            <div class="columns">
                <section class="card column wide">
                    <h2>{"Patient Information"}</h2>
                    <dl class="details">
                        <dt>{"Patient"}</dt><dd>{ &detail.patient_name }</dd>
                        <dt>{"Provider"}</dt><dd>{ &detail.provider_name }</dd>
                        <dt>{"Started"}</dt><dd>{ format_timestamp(rec.created_at) }</dd>
                        <dt>{"Status"}</dt><dd>{ rec.status.label() }</dd>
                        if let Some(completed_at) = rec.completed_at {
                            <dt>{"Completed"}</dt><dd>{ format_timestamp(completed_at) }</dd>
                        }
                    </dl>
                </section>
                { build_progress(page) }
            </div>

            <section class="card">
                <h2>{"Medication Review"}</h2>
                if page.medications.is_empty() {
                    <p class="empty">{"This patient has no medications to review."}</p>
                }
                { for page.medications.iter().map(|m| build_medication(page, link, m)) }
            </section>

            <section class="card">
                <h2>{"Reconciliation Notes"}</h2>
                <textarea rows="4"
                          placeholder="Add notes about this reconciliation…"
                          value={page.notes.clone()}
                          oninput={link.callback(|e| Msg::SetNotes(textarea_value(e)))} />
                { error_banner(&page.action_error) }
                <div class="form-actions">
                    <Link<Route> to={Route::Reconciliations} classes={classes!("button", "secondary")}>
                        {"Save & Return Later"}
                    </Link<Route>>
                    <button class="button success"
                            disabled={!page.can_complete()}
                            onclick={link.callback(|_| Msg::Complete)}>
                        { if page.completing { "Completing…" } else { "Complete Reconciliation" } }
                    </button>
                </div>
            </section>
        </div>
    }
}

fn build_progress(page: &ReconciliationDetailPage) -> Html {
    let total = page.medications.len();
    let (reviewed_pct, approved_pct) = page.review.progress(total);
    let bar = |label: &'static str, count: usize, pct: f64, class: &'static str| {
        html! {
            <div class="progress">
                <div class="row-between">
                    <span>{ label }</span>
                    <span>{ format!("{}/{}", count, total) }</span>
                </div>
                <div class="hbar-track">
                    <div class={classes!("hbar-fill", class)} style={format!("width: {:.0}%", pct)} />
                </div>
            </div>
        }
    };

    html! {
        <section class="card column">
            <h2>{"Progress"}</h2>
            { bar("Medications Reviewed", page.review.reviewed_count(), reviewed_pct, "reviewed") }
            { bar("Approved", page.review.approved_count(), approved_pct, "completed") }
            if page.review.total_conflicts() > 0 {
                <p class="warning">{ format!("{} conflicts found", page.review.total_conflicts()) }</p>
            }
        </section>
    }
}

fn build_medication(
    page: &ReconciliationDetailPage,
    link: &Scope<ReconciliationDetailPage>,
    medication: &Medication,
) -> Html {
    let id = medication.id;
    let review = page.review.review(id);
    let conflicts = page.conflicts_for(medication);
    let approved = review.map(|r| r.approved);
    let not_specified = |value: &Option<String>| value.clone().unwrap_or_else(|| "Not specified".to_string());

    html! {
        <article key={id} class={classes!("medication-review", approved.map(|a| if a { "approved" } else { "rejected" }))}>
            <div class="row-between">
                <div>
                    <h3>
                        { &medication.name }
                        { source_badge(medication.source) }
                        if let Some(confidence) = medication.ocr_confidence {
                            { confidence_badge(confidence) }
                        }
                        if review.is_some_and(|r| r.modified) {
                            <span class="badge modified">{"Edited"}</span>
                        }
                    </h3>
                    <dl class="details compact">
                        <dt>{"Dosage"}</dt><dd>{ not_specified(&medication.dosage) }</dd>
                        <dt>{"Frequency"}</dt><dd>{ not_specified(&medication.frequency) }</dd>
                        <dt>{"Generic"}</dt><dd>{ medication.generic_name.clone().unwrap_or_else(|| "N/A".to_string()) }</dd>
                        <dt>{"Last Filled"}</dt>
                        <dd>{ if medication.last_filled.is_some() { format_date(medication.last_filled) } else { "N/A".to_string() } }</dd>
                    </dl>
                </div>
                <div class="review-actions">
                    <button class="button link" title="Edit medication"
                            onclick={link.callback(move |_| Msg::StartEdit(id))}>
                        {"Edit"}
                    </button>
                    <button class={classes!("button", "approve", (approved == Some(true)).then_some("selected"))}
                            title="Approve medication"
                            onclick={link.callback(move |_| Msg::Decide(id, true))}>
                        {"Approve"}
                    </button>
                    <button class={classes!("button", "reject", (approved == Some(false)).then_some("selected"))}
                            title="Reject medication"
                            onclick={link.callback(move |_| Msg::Decide(id, false))}>
                        {"Reject"}
                    </button>
                </div>
            </div>

            if !conflicts.is_empty() {
                <div class="alert warning">
                    <h4>{"Potential Issues"}</h4>
                    <ul>
                        { for conflicts.iter().map(|c| html! { <li>{ c.to_string() }</li> }) }
                    </ul>
                </div>
            }
            if let Some(notes) = medication.notes.as_ref().filter(|n| !n.is_empty()) {
                <p class="muted small">{ notes }</p>
            }
            if let Some(review) = review {
                <label class="field">
                    {"Review note"}
                    <input value={review.notes.clone()}
                           placeholder="Optional note for this medication"
                           oninput={link.callback(move |e: InputEvent| Msg::SetReviewNote(id, input_value(e)))} />
                </label>
            }
            if page.editing == Some(id) {
                { build_edit_form(page, link) }
            }
        </article>
    }
}

fn build_edit_form(page: &ReconciliationDetailPage, link: &Scope<ReconciliationDetailPage>) -> Html {
    let on_change = link.callback(|(field, value): (MedicationField, String)| Msg::SetEditField(field, value));
    let on_submit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::SaveEdit
    });
    html! {
        <form class="form inline-edit" onsubmit={on_submit}>
            <h4>{"Edit Medication"}</h4>
            { error_banner(&page.edit_error) }
            { page.edit_form.review_fields(&on_change) }
            <div class="form-actions">
                <button type="button" class="button secondary" onclick={link.callback(|_| Msg::CancelEdit)}>
                    {"Cancel"}
                </button>
                <button type="submit" class="button primary" disabled={page.saving_edit}>
                    { if page.saving_edit { "Saving…" } else { "Save" } }
                </button>
            </div>
        </form>
    }
}
