//! OCR upload: pick a patient and a label photo, review the extracted
//! medications, then save the approved ones as photo-sourced records.

use common::model::patient::Patient;
use common::model::upload::{check_upload, ImageUploadResponse};
use common::query::{QueryFamily, QueryKey};
use gloo_file::ObjectUrl;
use web_sys::File;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::cache::query_client;
use crate::api::{endpoints, ApiError};
use crate::helpers::show_toast;

mod state;
mod view;

pub use state::{SuggestionField, UploadPage};
use state::ReviewedSuggestion;

pub enum Msg {
    PatientsLoaded(Result<Vec<Patient>, ApiError>),
    SelectPatient(Option<i64>),
    PickFile(File),
    Dragging(bool),
    Process,
    Processed(Result<ImageUploadResponse, ApiError>),
    EditSuggestion(usize, SuggestionField, String),
    ToggleApproved(usize),
    RemoveSuggestion(usize),
    Save,
    Saved { created: usize, failures: Vec<String> },
    Reset,
}

impl Component for UploadPage {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let client = query_client(ctx);
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = client.fetch(QueryKey::Patients, endpoints::list_patients).await;
            link.send_message(Msg::PatientsLoaded(result));
        });
        UploadPage::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::PatientsLoaded(Ok(patients)) => {
                self.patients = patients;
                true
            }
            Msg::PatientsLoaded(Err(err)) => {
                self.error = Some(err.to_string());
                true
            }
            Msg::SelectPatient(patient_id) => {
                self.patient_id = patient_id;
                true
            }
            Msg::Dragging(dragging) => {
                self.dragging = dragging;
                true
            }
            Msg::PickFile(file) => {
                self.dragging = false;
                self.error = None;
                self.response = None;
                self.suggestions.clear();
                if let Err(rejection) = check_upload(&file.type_(), file.size() as u64) {
                    self.file = None;
                    self.preview = None;
                    self.error = Some(rejection.to_string());
                    return true;
                }
                self.preview = Some(ObjectUrl::from(gloo_file::Blob::from(web_sys::Blob::from(
                    file.clone(),
                ))));
                self.file = Some(file);
                true
            }
            Msg::Process => {
                let Some(file) = self.file.clone() else {
                    self.error = Some("Please select an image first".to_string());
                    return true;
                };
                if self.processing {
                    return false;
                }
                self.processing = true;
                self.error = None;
                let link = ctx.link().clone();
                // No patient id: the server extracts text but creates nothing.
                spawn_local(async move {
                    link.send_message(Msg::Processed(endpoints::upload_image(file, None).await));
                });
                true
            }
            Msg::Processed(Ok(response)) => {
                self.processing = false;
                match &response.ocr_result {
                    Some(result) if !result.suggested_medications.is_empty() => {
                        self.suggestions = result
                            .suggested_medications
                            .iter()
                            .cloned()
                            .map(ReviewedSuggestion::new)
                            .collect();
                        show_toast(&format!("Found {} medication(s)", self.suggestions.len()));
                    }
                    Some(_) => self.error = Some("No medications were recognised in this image".to_string()),
                    None => self.error = Some("Text could not be extracted from this image".to_string()),
                }
                self.response = Some(response);
                true
            }
            Msg::Processed(Err(err)) => {
                self.processing = false;
                self.error = Some(err.to_string());
                true
            }
            Msg::EditSuggestion(index, field, value) => {
                if let Some(item) = self.suggestions.get_mut(index) {
                    item.set(field, value);
                }
                false
            }
            Msg::ToggleApproved(index) => {
                if let Some(item) = self.suggestions.get_mut(index) {
                    item.approved = !item.approved;
                }
                true
            }
            Msg::RemoveSuggestion(index) => {
                if index < self.suggestions.len() {
                    self.suggestions.remove(index);
                }
                true
            }
            Msg::Save => {
                let Some(patient_id) = self.patient_id else {
                    self.error = Some("Please select a patient".to_string());
                    return true;
                };
                let creates = self.approved_medications(patient_id);
                if creates.is_empty() {
                    self.error = Some("Approve at least one medication to save".to_string());
                    return true;
                }
                if self.saving {
                    return false;
                }
                self.saving = true;
                self.error = None;
                let link = ctx.link().clone();
                spawn_local(async move {
                    let mut created = 0;
                    let mut failures = Vec::new();
                    for medication in creates {
                        let name = medication.name.clone();
                        match endpoints::create_medication(medication).await {
                            Ok(_) => created += 1,
                            Err(err) => failures.push(format!("{}: {}", name, err)),
                        }
                    }
                    link.send_message(Msg::Saved { created, failures });
                });
                true
            }
            Msg::Saved { created, failures } => {
                self.saving = false;
                if created > 0 {
                    query_client(ctx).invalidate(QueryFamily::Medications);
                    show_toast(&format!("Saved {} medication(s)", created));
                }
                if failures.is_empty() {
                    ctx.link().send_message(Msg::Reset);
                } else {
                    self.error = Some(failures.join("; "));
                }
                true
            }
            Msg::Reset => {
                let patients = std::mem::take(&mut self.patients);
                let patient_id = self.patient_id;
                *self = UploadPage::new();
                self.patients = patients;
                self.patient_id = patient_id;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
