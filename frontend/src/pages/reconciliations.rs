//! Reconciliation sessions: status counts, search by patient or id, status
//! filter and the form that opens a new session.

use common::model::patient::{patient_name, Patient};
use common::model::reconciliation::{Reconciliation, ReconciliationStatus};
use common::query::{QueryFamily, QueryKey};
use common::requests::{non_blank, ReconciliationCreate, ReconciliationQuery};
use common::validation::Validate;
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::cache::query_client;
use crate::api::{endpoints, ApiError};
use crate::components::badges::status_badge;
use crate::components::modal::Modal;
use crate::helpers::{format_timestamp, input_value, select_value, show_toast, textarea_value};
use crate::pages::error_banner;
use crate::routes::Route;

pub enum Msg {
    Load,
    Loaded(Result<(Vec<Reconciliation>, Vec<Patient>), ApiError>),
    SetSearch(String),
    SetStatusFilter(Option<ReconciliationStatus>),
    OpenForm,
    CloseForm,
    SetPatient(String),
    SetNotes(String),
    Create,
    Created(Result<Reconciliation, ApiError>),
}

pub struct ReconciliationsPage {
    reconciliations: Vec<Reconciliation>,
    patients: Vec<Patient>,
    loading: bool,
    error: Option<String>,
    search: String,
    status_filter: Option<ReconciliationStatus>,
    form_open: bool,
    form_patient: String,
    form_notes: String,
    form_error: Option<String>,
    saving: bool,
}

/// Search hits the patient's name or the session id; the status filter is exact.
fn matches(
    rec: &Reconciliation,
    patient_name: &str,
    term: &str,
    status: Option<ReconciliationStatus>,
) -> bool {
    let term = term.trim().to_lowercase();
    let hit = term.is_empty()
        || patient_name.to_lowercase().contains(&term)
        || rec.id.to_string().contains(&term);
    hit && status.is_none_or(|s| rec.status == s)
}

impl ReconciliationsPage {
    fn filtered(&self) -> Vec<(&Reconciliation, String)> {
        self.reconciliations
            .iter()
            .map(|rec| (rec, patient_name(&self.patients, rec.patient_id)))
            .filter(|(rec, name)| matches(rec, name, &self.search, self.status_filter))
            .collect()
    }

    fn count(&self, status: ReconciliationStatus) -> usize {
        self.reconciliations.iter().filter(|r| r.status == status).count()
    }
}

impl Component for ReconciliationsPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Load);
        Self {
            reconciliations: Vec::new(),
            patients: Vec::new(),
            loading: true,
            error: None,
            search: String::new(),
            status_filter: None,
            form_open: false,
            form_patient: String::new(),
            form_notes: String::new(),
            form_error: None,
            saving: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Load => {
                self.loading = true;
                let client = query_client(ctx);
                let link = ctx.link().clone();
                spawn_local(async move {
                    let reconciliations = client
                        .fetch(QueryKey::Reconciliations, || {
                            endpoints::list_reconciliations(ReconciliationQuery::default())
                        })
                        .await;
                    let result = match reconciliations {
                        Ok(recs) => client
                            .fetch(QueryKey::Patients, endpoints::list_patients)
                            .await
                            .map(|patients| (recs, patients)),
                        Err(err) => Err(err),
                    };
                    link.send_message(Msg::Loaded(result));
                });
                true
            }
            Msg::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok((reconciliations, patients)) => {
                        self.reconciliations = reconciliations;
                        self.patients = patients;
                        self.error = None;
                    }
                    Err(err) => self.error = Some(err.to_string()),
                }
                true
            }
            Msg::SetSearch(term) => {
                self.search = term;
                true
            }
            Msg::SetStatusFilter(status) => {
                self.status_filter = status;
                true
            }
            Msg::OpenForm => {
                self.form_patient.clear();
                self.form_notes.clear();
                self.form_error = None;
                self.form_open = true;
                true
            }
            Msg::CloseForm => {
                self.form_open = false;
                self.saving = false;
                true
            }
            Msg::SetPatient(value) => {
                self.form_patient = value;
                false
            }
            Msg::SetNotes(value) => {
                self.form_notes = value;
                false
            }
            Msg::Create => {
                if self.saving {
                    return false;
                }
                let request = ReconciliationCreate {
                    patient_id: self.form_patient.parse().unwrap_or(0),
                    notes: non_blank(&self.form_notes),
                };
                if let Err(err) = request.validate() {
                    self.form_error = Some(err.to_string());
                    return true;
                }
                self.saving = true;
                self.form_error = None;
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Created(endpoints::create_reconciliation(request).await));
                });
                true
            }
            Msg::Created(Ok(rec)) => {
                show_toast(&format!("Reconciliation #{} started", rec.id));
                self.saving = false;
                self.form_open = false;
                query_client(ctx).invalidate(QueryFamily::Reconciliations);
                ctx.link().send_message(Msg::Load);
                true
            }
            Msg::Created(Err(err)) => {
                self.saving = false;
                self.form_error = Some(err.to_string());
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_status = link.callback(|e: Event| Msg::SetStatusFilter(select_value(e).parse().ok()));

        html! {
            <div class="page reconciliations">
                <div class="page-header">
                    <div>
                        <h1>{"Reconciliations"}</h1>
                        <p class="muted">{"Review and reconcile patient medication lists"}</p>
                    </div>
                    <button class="button primary" onclick={link.callback(|_| Msg::OpenForm)}>
                        {"Start New Reconciliation"}
                    </button>
                </div>

                <div class="metrics">
                    { for [ReconciliationStatus::Pending, ReconciliationStatus::InProgress, ReconciliationStatus::Completed]
                        .into_iter()
                        .map(|status| html! {
                            <div class="card metric-card">
                                <span class="metric-title">{ status.label() }</span>
                                <strong class="metric-value">{ self.count(status) }</strong>
                            </div>
                        }) }
                    <div class="card metric-card">
                        <span class="metric-title">{"Total"}</span>
                        <strong class="metric-value">{ self.reconciliations.len() }</strong>
                    </div>
                </div>

                <div class="toolbar">
                    <input class="search" type="search"
                           placeholder="Search by patient name or reconciliation ID…"
                           value={self.search.clone()}
                           oninput={link.callback(|e| Msg::SetSearch(input_value(e)))} />
                    <select onchange={on_status}>
                        <option value="" selected={self.status_filter.is_none()}>{"All Status"}</option>
                        { for ReconciliationStatus::ALL.iter().map(|s| html! {
                            <option value={s.as_str()} selected={self.status_filter == Some(*s)}>
                                { s.label() }
                            </option>
                        }) }
                    </select>
                </div>

                { error_banner(&self.error) }
                { self.build_table() }

                <Modal title="Start New Reconciliation" open={self.form_open}
                       on_close={link.callback(|_| Msg::CloseForm)}>
                    { self.build_form(link) }
                </Modal>
            </div>
        }
    }
}

impl ReconciliationsPage {
    fn build_table(&self) -> Html {
        if self.loading && self.reconciliations.is_empty() {
            return html! { <p class="muted">{"Loading reconciliations…"}</p> };
        }
        let rows = self.filtered();
        if rows.is_empty() {
            let hint = if self.search.trim().is_empty() && self.status_filter.is_none() {
                "Start your first reconciliation to review a patient's medications."
            } else {
                "Try adjusting your search or filter."
            };
            return html! {
                <div class="empty">
                    <h3>{"No reconciliations found"}</h3>
                    <p class="muted">{ hint }</p>
                </div>
            };
        }

        html! {
            <table class="table">
                <thead>
                    <tr>
                        <th>{"Reconciliation"}</th>
                        <th>{"Patient"}</th>
                        <th>{"Status"}</th>
                        <th>{"Progress"}</th>
                        <th>{"Created"}</th>
                        <th />
                    </tr>
                </thead>
                <tbody>
                    { for rows.into_iter().map(|(rec, name)| {
                        let progress = if rec.total_medications > 0 {
                            f64::from(rec.approved_medications) / f64::from(rec.total_medications) * 100.0
                        } else {
                            0.0
                        };
                        html! {
                            <tr key={rec.id}>
                                <td>
                                    <strong>{ format!("Reconciliation #{}", rec.id) }</strong>
                                    <div class="muted">{ format!("{} medications", rec.total_medications) }</div>
                                </td>
                                <td>{ name }</td>
                                <td>{ status_badge(rec.status) }</td>
                                <td>
                                    <div class="hbar-track inline">
                                        <div class="hbar-fill" style={format!("width: {:.0}%", progress)} />
                                    </div>
                                    <span class="muted small">
                                        { format!("{}/{}", rec.approved_medications, rec.total_medications) }
                                    </span>
                                </td>
                                <td>{ format_timestamp(rec.created_at) }</td>
                                <td class="actions">
                                    <Link<Route> to={Route::ReconciliationDetail { id: rec.id }}>
                                        { if rec.status.is_active() { "Continue" } else { "View" } }
                                    </Link<Route>>
                                </td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
        }
    }

    fn build_form(&self, link: &Scope<Self>) -> Html {
        let on_submit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Create
        });
        html! {
            <form class="form" onsubmit={on_submit}>
                { error_banner(&self.form_error) }
                <label class="field">
                    <span>{"Select patient *"}</span>
                    <select onchange={link.callback(|e| Msg::SetPatient(select_value(e)))}>
                        <option value="">{"Choose a patient"}</option>
                        { for self.patients.iter().map(|p| html! {
                            <option value={p.id.to_string()}>
                                { format!("{}{}", p.full_name(), p.mrn.as_ref().map(|m| format!(" (MRN: {})", m)).unwrap_or_default()) }
                            </option>
                        }) }
                    </select>
                </label>
                <label class="field">
                    <span>{"Notes"}</span>
                    <textarea rows="3"
                              placeholder="Add any initial notes about this reconciliation…"
                              oninput={link.callback(|e| Msg::SetNotes(textarea_value(e)))} />
                </label>
                <div class="form-actions">
                    <button type="button" class="button secondary" onclick={link.callback(|_| Msg::CloseForm)}>
                        {"Cancel"}
                    </button>
                    <button type="submit" class="button primary" disabled={self.saving}>
                        { if self.saving { "Starting…" } else { "Start Reconciliation" } }
                    </button>
                </div>
            </form>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rec(id: i64, status: ReconciliationStatus) -> Reconciliation {
        Reconciliation {
            id,
            patient_id: 1,
            provider_id: 1,
            status,
            total_medications: 3,
            approved_medications: 0,
            conflicts_found: 0,
            notes: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn search_matches_patient_name_or_id() {
        let r = rec(42, ReconciliationStatus::Pending);
        assert!(matches(&r, "Ada Lovelace", "lovelace", None));
        assert!(matches(&r, "Ada Lovelace", "42", None));
        assert!(matches(&r, "Ada Lovelace", "", None));
        assert!(!matches(&r, "Ada Lovelace", "turing", None));
    }

    #[test]
    fn status_filter_is_exact() {
        let r = rec(7, ReconciliationStatus::InProgress);
        assert!(matches(&r, "x", "", Some(ReconciliationStatus::InProgress)));
        assert!(!matches(&r, "x", "", Some(ReconciliationStatus::Pending)));
    }
}
