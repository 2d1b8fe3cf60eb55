use common::query::{QueryFamily, QueryKey};
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use super::messages::Msg;
use super::state::ReconciliationDetailPage;
use crate::api::cache::query_client;
use crate::api::{endpoints, ApiError};
use crate::helpers::show_toast;
use crate::pages::medications::form::MedicationForm;
use crate::routes::Route;

pub fn update(
    page: &mut ReconciliationDetailPage,
    ctx: &Context<ReconciliationDetailPage>,
    msg: Msg,
) -> bool {
    let reconciliation_id = ctx.props().id;
    match msg {
        Msg::Load => {
            page.loading = true;
            let client = query_client(ctx);
            let link = ctx.link().clone();
            spawn_local(async move {
                let detail = client
                    .fetch(QueryKey::Reconciliation(reconciliation_id), || {
                        endpoints::get_reconciliation(reconciliation_id)
                    })
                    .await;
                let result = match detail {
                    Ok(detail) => {
                        let patient_id = detail.reconciliation.patient_id;
                        client
                            .fetch(QueryKey::Medications(Some(patient_id)), || {
                                endpoints::list_medications(Some(patient_id))
                            })
                            .await
                            .map(|medications| (detail, medications))
                    }
                    Err(err) => Err(err),
                };
                link.send_message(Msg::Loaded(result));
            });
            true
        }
        Msg::Loaded(result) => {
            page.loading = false;
            match result {
                Ok((detail, medications)) => {
                    if page.detail.is_none() {
                        page.notes = detail.reconciliation.notes.clone().unwrap_or_default();
                    }
                    page.detail = Some(detail);
                    page.medications = medications;
                    page.error = None;
                }
                Err(err) => page.error = Some(err.to_string()),
            }
            true
        }
        Msg::Decide(medication_id, approved) => {
            let Some(medication) = page.medications.iter().find(|m| m.id == medication_id) else {
                return false;
            };
            page.review.record_decision(medication, &page.medications, approved);
            true
        }
        Msg::StartEdit(medication_id) => {
            if page.editing == Some(medication_id) {
                page.editing = None;
                return true;
            }
            let Some(medication) = page.medications.iter().find(|m| m.id == medication_id) else {
                return false;
            };
            page.edit_form = MedicationForm::from_medication(medication);
            page.editing = Some(medication_id);
            page.edit_error = None;
            true
        }
        Msg::CancelEdit => {
            page.editing = None;
            page.saving_edit = false;
            true
        }
        Msg::SetEditField(field, value) => {
            page.edit_form.set(field, value);
            false
        }
        Msg::SaveEdit => {
            let Some(medication_id) = page.editing else {
                return false;
            };
            if page.saving_edit {
                return false;
            }
            let change = match page.edit_form.to_update() {
                Ok(change) => change,
                Err(err) => {
                    page.edit_error = Some(err.to_string());
                    return true;
                }
            };
            page.saving_edit = true;
            page.edit_error = None;
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::EditSaved(
                    endpoints::update_medication(medication_id, change).await,
                ));
            });
            true
        }
        Msg::EditSaved(Ok(medication)) => {
            page.saving_edit = false;
            page.editing = None;
            page.review.mark_modified(medication.id);
            show_toast(&format!("{} updated", medication.name));
            if let Some(slot) = page.medications.iter_mut().find(|m| m.id == medication.id) {
                *slot = medication;
            }
            query_client(ctx).invalidate(QueryFamily::Medications);
            true
        }
        Msg::EditSaved(Err(err)) => {
            page.saving_edit = false;
            page.edit_error = Some(err.to_string());
            true
        }
        Msg::SetNotes(notes) => {
            page.notes = notes;
            false
        }
        Msg::SetReviewNote(medication_id, note) => {
            page.review.set_notes(medication_id, note);
            false
        }
        Msg::Complete => {
            if !page.can_complete() {
                return false;
            }
            page.completing = true;
            page.action_error = None;
            let stats = page.review.completion_update(&page.notes, &page.medications);
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = async {
                    endpoints::update_reconciliation(reconciliation_id, stats).await?;
                    endpoints::complete_reconciliation(reconciliation_id).await?;
                    Ok::<(), ApiError>(())
                }
                .await;
                link.send_message(Msg::Completed(result));
            });
            true
        }
        Msg::Completed(Ok(())) => {
            page.completing = false;
            query_client(ctx).invalidate(QueryFamily::Reconciliations);
            show_toast("Reconciliation completed successfully");
            if let Some(navigator) = ctx.link().navigator() {
                navigator.push(&Route::Reconciliations);
            }
            false
        }
        Msg::Completed(Err(err)) => {
            page.completing = false;
            page.action_error = Some(err.to_string());
            true
        }
    }
}
