use crate::auth::CurrentProvider;
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::reconciliation::{Reconciliation, ReconciliationStatus};
use common::requests::{non_blank, ReconciliationCreate};
use common::validation::Validate;
use log::info;
use rusqlite::params;

/// Handler for `POST /api/v1/reconciliations/`.
pub async fn process(
    state: web::Data<AppState>,
    provider: CurrentProvider,
    payload: web::Json<ReconciliationCreate>,
) -> Result<HttpResponse, ApiError> {
    let reconciliation = start_reconciliation(&state, provider.0.id, &payload)?;
    Ok(HttpResponse::Ok().json(reconciliation))
}

/// Opens a session in progress, sized to the patient's active medications.
pub fn start_reconciliation(
    state: &AppState,
    provider_id: i64,
    request: &ReconciliationCreate,
) -> Result<Reconciliation, ApiError> {
    request.validate()?;
    let conn = state.connect()?;
    if !db::exists(&conn, "patients", request.patient_id)? {
        return Err(ApiError::not_found("Patient"));
    }

    let active: u32 = conn.query_row(
        "SELECT COUNT(*) FROM medications WHERE patient_id = ?1 AND is_active = 1",
        params![request.patient_id],
        |row| row.get(0),
    )?;

    conn.execute(
        "INSERT INTO reconciliations (patient_id, provider_id, status, total_medications, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            request.patient_id,
            provider_id,
            ReconciliationStatus::InProgress.as_str(),
            active,
            request.notes.as_deref().and_then(non_blank),
            Utc::now(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    info!(
        "Provider {} started reconciliation {} for patient {}",
        provider_id, id, request.patient_id
    );

    super::find(&conn, id)
}
