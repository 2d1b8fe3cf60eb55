use crate::auth::CurrentProvider;
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::medication::Medication;
use common::requests::{non_blank, MedicationCreate};
use common::validation::Validate;
use rusqlite::{params, Connection};

/// Handler for `POST /api/v1/medications/`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    payload: web::Json<MedicationCreate>,
) -> Result<HttpResponse, ApiError> {
    let medication = create_medication(&state, &payload)?;
    Ok(HttpResponse::Ok().json(medication))
}

pub fn create_medication(
    state: &AppState,
    request: &MedicationCreate,
) -> Result<Medication, ApiError> {
    request.validate()?;
    let conn = state.connect()?;
    if !db::exists(&conn, "patients", request.patient_id)? {
        return Err(ApiError::not_found("Patient"));
    }
    let id = insert_medication(&conn, request)?;
    super::find(&conn, id)
}

/// Writes a validated medication for an existing patient and returns its id.
/// Also used by the upload service for OCR suggestions.
pub fn insert_medication(conn: &Connection, request: &MedicationCreate) -> rusqlite::Result<i64> {
    let optional = |value: &Option<String>| value.as_deref().and_then(non_blank);
    conn.execute(
        "INSERT INTO medications (patient_id, name, generic_name, dosage, frequency, source,
                ndc_number, last_filled, is_active, notes, image_path, ocr_confidence, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10, ?11, ?12)",
        params![
            request.patient_id,
            request.name.trim(),
            optional(&request.generic_name),
            optional(&request.dosage),
            optional(&request.frequency),
            request.source.as_str(),
            optional(&request.ndc_number),
            request.last_filled,
            optional(&request.notes),
            optional(&request.image_path),
            request.ocr_confidence,
            Utc::now(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
