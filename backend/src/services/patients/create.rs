use crate::auth::CurrentProvider;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::patient::Patient;
use common::requests::{non_blank, PatientCreate};
use common::validation::Validate;
use rusqlite::params;

/// Handler for `POST /api/v1/patients/`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    payload: web::Json<PatientCreate>,
) -> Result<HttpResponse, ApiError> {
    let patient = create_patient(&state, &payload)?;
    Ok(HttpResponse::Ok().json(patient))
}

pub fn create_patient(state: &AppState, request: &PatientCreate) -> Result<Patient, ApiError> {
    request.validate()?;
    let conn = state.connect()?;
    let optional = |value: &Option<String>| value.as_deref().and_then(non_blank);

    conn.execute(
        "INSERT INTO patients (first_name, last_name, date_of_birth, phone, email, mrn, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            request.first_name.trim(),
            request.last_name.trim(),
            request.date_of_birth,
            optional(&request.phone),
            optional(&request.email),
            optional(&request.mrn),
            Utc::now(),
        ],
    )?;

    super::find(&conn, conn.last_insert_rowid())
}
