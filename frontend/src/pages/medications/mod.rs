//! Medication list across patients with a patient filter, free-text search
//! and the add/edit form.

pub mod form;
mod view;

use common::model::medication::Medication;
use common::model::patient::Patient;
use common::model::MessageResponse;
use common::query::{QueryFamily, QueryKey};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::cache::query_client;
use crate::api::{endpoints, ApiError};
use crate::helpers::{confirm, show_toast};
use form::{MedicationField, MedicationForm};

pub enum Msg {
    Load,
    Loaded(Result<(Vec<Medication>, Vec<Patient>), ApiError>),
    SetSearch(String),
    SetPatientFilter(Option<i64>),
    OpenCreate,
    OpenEdit(i64),
    CloseForm,
    SetField(MedicationField, String),
    Save,
    Saved(Result<Medication, ApiError>),
    Delete(i64),
    Deleted(Result<MessageResponse, ApiError>),
}

pub struct MedicationsPage {
    medications: Vec<Medication>,
    patients: Vec<Patient>,
    loading: bool,
    error: Option<String>,
    search: String,
    patient_filter: Option<i64>,
    form: MedicationForm,
    form_open: bool,
    editing: Option<i64>,
    form_error: Option<String>,
    saving: bool,
}

impl MedicationsPage {
    fn filtered(&self) -> Vec<&Medication> {
        self.medications
            .iter()
            .filter(|m| m.matches(&self.search))
            .collect()
    }
}

impl Component for MedicationsPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Load);
        Self {
            medications: Vec::new(),
            patients: Vec::new(),
            loading: true,
            error: None,
            search: String::new(),
            patient_filter: None,
            form: MedicationForm::default(),
            form_open: false,
            editing: None,
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
                let patient_id = self.patient_filter;
                spawn_local(async move {
                    let medications = client
                        .fetch(QueryKey::Medications(patient_id), || {
                            endpoints::list_medications(patient_id)
                        })
                        .await;
                    let result = match medications {
                        Ok(medications) => client
                            .fetch(QueryKey::Patients, endpoints::list_patients)
                            .await
                            .map(|patients| (medications, patients)),
                        Err(err) => Err(err),
                    };
                    link.send_message(Msg::Loaded(result));
                });
                true
            }
            Msg::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok((medications, patients)) => {
                        self.medications = medications;
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
            Msg::SetPatientFilter(patient_id) => {
                self.patient_filter = patient_id;
                ctx.link().send_message(Msg::Load);
                false
            }
            Msg::OpenCreate => {
                self.form = MedicationForm::for_patient(self.patient_filter);
                self.editing = None;
                self.form_error = None;
                self.form_open = true;
                true
            }
            Msg::OpenEdit(medication_id) => {
                let Some(medication) = self.medications.iter().find(|m| m.id == medication_id) else {
                    return false;
                };
                self.form = MedicationForm::from_medication(medication);
                self.editing = Some(medication_id);
                self.form_error = None;
                self.form_open = true;
                true
            }
            Msg::CloseForm => {
                self.form_open = false;
                self.saving = false;
                true
            }
            Msg::SetField(field, value) => {
                self.form.set(field, value);
                // Only the select-driven fields change what is rendered.
                matches!(field, MedicationField::Source | MedicationField::Patient)
            }
            Msg::Save => {
                if self.saving {
                    return false;
                }
                let link = ctx.link().clone();
                let prepared = match self.editing {
                    Some(id) => self.form.to_update().map(|change| {
                        spawn_local(async move {
                            link.send_message(Msg::Saved(endpoints::update_medication(id, change).await));
                        })
                    }),
                    None => self.form.to_create().map(|medication| {
                        spawn_local(async move {
                            link.send_message(Msg::Saved(endpoints::create_medication(medication).await));
                        })
                    }),
                };
                match prepared {
                    Ok(()) => {
                        self.saving = true;
                        self.form_error = None;
                    }
                    Err(err) => self.form_error = Some(err.to_string()),
                }
                true
            }
            Msg::Saved(Ok(medication)) => {
                show_toast(&format!(
                    "{} {}",
                    medication.name,
                    if self.editing.is_some() { "updated" } else { "added" }
                ));
                self.saving = false;
                self.form_open = false;
                query_client(ctx).invalidate(QueryFamily::Medications);
                ctx.link().send_message(Msg::Load);
                true
            }
            Msg::Saved(Err(err)) => {
                self.saving = false;
                self.form_error = Some(err.to_string());
                true
            }
            Msg::Delete(medication_id) => {
                if !confirm("Are you sure you want to delete this medication?") {
                    return false;
                }
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Deleted(endpoints::delete_medication(medication_id).await));
                });
                false
            }
            Msg::Deleted(Ok(response)) => {
                show_toast(&response.message);
                query_client(ctx).invalidate(QueryFamily::Medications);
                ctx.link().send_message(Msg::Load);
                false
            }
            Msg::Deleted(Err(err)) => {
                show_toast(&err.to_string());
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
