use crate::auth::CurrentProvider;
use crate::error::ApiError;
use crate::services::patch;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::patient::Patient;
use common::requests::PatientUpdate;
use common::validation::Validate;
use rusqlite::params;

/// Handler for `PUT /api/v1/patients/{patient_id}`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    patient_id: web::Path<i64>,
    payload: web::Json<PatientUpdate>,
) -> Result<HttpResponse, ApiError> {
    let patient = update_patient(&state, *patient_id, &payload)?;
    Ok(HttpResponse::Ok().json(patient))
}

pub fn update_patient(
    state: &AppState,
    patient_id: i64,
    changes: &PatientUpdate,
) -> Result<Patient, ApiError> {
    changes.validate()?;
    let conn = state.connect()?;
    let current = super::find(&conn, patient_id)?;

    let first_name = changes
        .first_name
        .as_deref()
        .map_or(current.first_name, |v| v.trim().to_string());
    let last_name = changes
        .last_name
        .as_deref()
        .map_or(current.last_name, |v| v.trim().to_string());

    conn.execute(
        "UPDATE patients SET first_name = ?1, last_name = ?2, date_of_birth = ?3,
                phone = ?4, email = ?5, mrn = ?6
         WHERE id = ?7",
        params![
            first_name,
            last_name,
            changes.date_of_birth.unwrap_or(current.date_of_birth),
            patch(current.phone, changes.phone.as_ref()),
            patch(current.email, changes.email.as_ref()),
            patch(current.mrn, changes.mrn.as_ref()),
            patient_id,
        ],
    )?;

    super::find(&conn, patient_id)
}
