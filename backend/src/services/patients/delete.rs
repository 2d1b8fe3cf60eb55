use crate::auth::CurrentProvider;
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::MessageResponse;
use log::info;
use rusqlite::params;

/// Handler for `DELETE /api/v1/patients/{patient_id}`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    patient_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    delete_patient(&state, *patient_id)?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Patient deleted successfully")))
}

/// Foreign keys cascade the delete to the patient's medications and reconciliations.
pub fn delete_patient(state: &AppState, patient_id: i64) -> Result<(), ApiError> {
    let conn = state.connect()?;
    if !db::exists(&conn, "patients", patient_id)? {
        return Err(ApiError::not_found("Patient"));
    }
    conn.execute("DELETE FROM patients WHERE id = ?1", params![patient_id])?;
    info!("Deleted patient {}", patient_id);
    Ok(())
}
