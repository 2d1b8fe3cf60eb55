use common::model::medication::Medication;
use common::model::reconciliation::ReconciliationDetail;

use crate::api::ApiError;
use crate::pages::medications::form::MedicationField;

pub enum Msg {
    Load,
    Loaded(Result<(ReconciliationDetail, Vec<Medication>), ApiError>),
    /// Approve (`true`) or reject (`false`) one medication.
    Decide(i64, bool),
    StartEdit(i64),
    CancelEdit,
    SetEditField(MedicationField, String),
    SaveEdit,
    EditSaved(Result<Medication, ApiError>),
    SetNotes(String),
    /// Note attached to one reviewed medication.
    SetReviewNote(i64, String),
    Complete,
    Completed(Result<(), ApiError>),
}
