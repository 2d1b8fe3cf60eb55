use crate::auth::CurrentProvider;
use crate::error::ApiError;
use crate::services::patch;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::medication::Medication;
use common::requests::MedicationUpdate;
use common::validation::Validate;
use rusqlite::params;

/// Handler for `PUT /api/v1/medications/{medication_id}`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    medication_id: web::Path<i64>,
    payload: web::Json<MedicationUpdate>,
) -> Result<HttpResponse, ApiError> {
    let medication = update_medication(&state, *medication_id, &payload)?;
    Ok(HttpResponse::Ok().json(medication))
}

pub fn update_medication(
    state: &AppState,
    medication_id: i64,
    changes: &MedicationUpdate,
) -> Result<Medication, ApiError> {
    changes.validate()?;
    let conn = state.connect()?;
    let current = super::find(&conn, medication_id)?;

    let name = changes
        .name
        .as_deref()
        .map_or(current.name, |v| v.trim().to_string());
    let source = changes.source.unwrap_or(current.source);

    conn.execute(
        "UPDATE medications SET name = ?1, generic_name = ?2, dosage = ?3, frequency = ?4,
                source = ?5, ndc_number = ?6, last_filled = ?7, notes = ?8, is_active = ?9
         WHERE id = ?10",
        params![
            name,
            patch(current.generic_name, changes.generic_name.as_ref()),
            patch(current.dosage, changes.dosage.as_ref()),
            patch(current.frequency, changes.frequency.as_ref()),
            source.as_str(),
            patch(current.ndc_number, changes.ndc_number.as_ref()),
            changes.last_filled.or(current.last_filled),
            patch(current.notes, changes.notes.as_ref()),
            changes.is_active.unwrap_or(current.is_active),
            medication_id,
        ],
    )?;

    super::find(&conn, medication_id)
}
