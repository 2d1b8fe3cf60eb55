use crate::auth::CurrentProvider;
use crate::db::rows;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::medication::Medication;
use common::requests::MedicationQuery;
use rusqlite::params;

/// Handler for `GET /api/v1/medications/`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    query: web::Query<MedicationQuery>,
) -> Result<HttpResponse, ApiError> {
    let medications = list_medications(&state, &query)?;
    Ok(HttpResponse::Ok().json(medications))
}

pub fn list_medications(
    state: &AppState,
    query: &MedicationQuery,
) -> Result<Vec<Medication>, ApiError> {
    let conn = state.connect()?;
    // A NULL filter matches every patient.
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM medications
         WHERE (?1 IS NULL OR patient_id = ?1)
         ORDER BY id LIMIT ?2 OFFSET ?3",
        rows::MEDICATION_COLUMNS
    ))?;
    let medications = stmt
        .query_map(params![query.patient_id, query.limit, query.skip], rows::medication)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(medications)
}
