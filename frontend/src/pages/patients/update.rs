use common::query::{QueryFamily, QueryKey};
use common::validation::Validate;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::messages::Msg;
use super::state::{PatientForm, PatientsPage};
use crate::api::cache::query_client;
use crate::api::endpoints;
use crate::helpers::{confirm, show_toast};

pub fn update(page: &mut PatientsPage, ctx: &Context<PatientsPage>, msg: Msg) -> bool {
    match msg {
        Msg::Load => {
            page.loading = true;
            let client = query_client(ctx);
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = client.fetch(QueryKey::Patients, endpoints::list_patients).await;
                link.send_message(Msg::Loaded(result));
            });
            true
        }
        Msg::Loaded(result) => {
            page.loading = false;
            match result {
                Ok(patients) => {
                    page.patients = patients;
                    page.error = None;
                }
                Err(err) => page.error = Some(err.to_string()),
            }
            true
        }
        Msg::SetSearch(term) => {
            page.search = term;
            true
        }
        Msg::OpenCreate => {
            page.form = PatientForm::default();
            page.editing = None;
            page.form_error = None;
            page.form_open = true;
            true
        }
        Msg::OpenEdit(patient_id) => {
            let Some(patient) = page.patients.iter().find(|p| p.id == patient_id) else {
                return false;
            };
            page.form = PatientForm::from_patient(patient);
            page.editing = Some(patient_id);
            page.form_error = None;
            page.form_open = true;
            true
        }
        Msg::CloseForm => {
            page.form_open = false;
            page.saving = false;
            true
        }
        Msg::SetField(field, value) => {
            page.form.set(field, value);
            false
        }
        Msg::Save => {
            if page.saving {
                return false;
            }
            let link = ctx.link().clone();
            match page.editing {
                Some(patient_id) => {
                    let change = match page.form.to_update().and_then(|c| c.validate().map(|_| c)) {
                        Ok(change) => change,
                        Err(err) => {
                            page.form_error = Some(err.to_string());
                            return true;
                        }
                    };
                    spawn_local(async move {
                        let result = endpoints::update_patient(patient_id, change).await;
                        link.send_message(Msg::Saved(result));
                    });
                }
                None => {
                    let patient = match page.form.to_create().and_then(|p| p.validate().map(|_| p)) {
                        Ok(patient) => patient,
                        Err(err) => {
                            page.form_error = Some(err.to_string());
                            return true;
                        }
                    };
                    spawn_local(async move {
                        let result = endpoints::create_patient(patient).await;
                        link.send_message(Msg::Saved(result));
                    });
                }
            }
            page.saving = true;
            page.form_error = None;
            true
        }
        Msg::Saved(Ok(patient)) => {
            show_toast(&format!(
                "{} {}",
                patient.full_name(),
                if page.editing.is_some() { "updated" } else { "added" }
            ));
            page.saving = false;
            page.form_open = false;
            query_client(ctx).invalidate(QueryFamily::Patients);
            ctx.link().send_message(Msg::Load);
            true
        }
        Msg::Saved(Err(err)) => {
            page.saving = false;
            page.form_error = Some(err.to_string());
            true
        }
        Msg::Delete(patient_id) => {
            if !confirm("Are you sure you want to delete this patient?") {
                return false;
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = endpoints::delete_patient(patient_id).await;
                link.send_message(Msg::Deleted(result));
            });
            false
        }
        Msg::Deleted(Ok(response)) => {
            show_toast(&response.message);
            // Medications and reconciliations of the patient are deleted with it.
            query_client(ctx).invalidate_all(&[
                QueryFamily::Patients,
                QueryFamily::Medications,
                QueryFamily::Reconciliations,
            ]);
            ctx.link().send_message(Msg::Load);
            false
        }
        Msg::Deleted(Err(err)) => {
            show_toast(&err.to_string());
            false
        }
    }
}
