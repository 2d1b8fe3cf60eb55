use common::model::patient::Patient;
use common::model::MessageResponse;

use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatientField {
    FirstName,
    LastName,
    DateOfBirth,
    Phone,
    Email,
    Mrn,
}

pub enum Msg {
    Load,
    Loaded(Result<Vec<Patient>, ApiError>),
    SetSearch(String),
    OpenCreate,
    OpenEdit(i64),
    CloseForm,
    SetField(PatientField, String),
    Save,
    Saved(Result<Patient, ApiError>),
    Delete(i64),
    Deleted(Result<MessageResponse, ApiError>),
}
