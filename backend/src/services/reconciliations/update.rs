use crate::auth::CurrentProvider;
use crate::error::ApiError;
use crate::services::patch;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::reconciliation::{Reconciliation, ReconciliationStatus};
use common::requests::ReconciliationUpdate;
use rusqlite::params;

/// Handler for `PUT /api/v1/reconciliations/{reconciliation_id}`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    reconciliation_id: web::Path<i64>,
    payload: web::Json<ReconciliationUpdate>,
) -> Result<HttpResponse, ApiError> {
    let reconciliation = update_reconciliation(&state, *reconciliation_id, &payload)?;
    Ok(HttpResponse::Ok().json(reconciliation))
}

pub fn update_reconciliation(
    state: &AppState,
    reconciliation_id: i64,
    changes: &ReconciliationUpdate,
) -> Result<Reconciliation, ApiError> {
    let conn = state.connect()?;
    let current = super::find(&conn, reconciliation_id)?;

    let status = changes.status.unwrap_or(current.status);
    let completed_at = match (status, current.completed_at) {
        (ReconciliationStatus::Completed, None) => Some(Utc::now()),
        (_, stamped) => stamped,
    };

    conn.execute(
        "UPDATE reconciliations SET status = ?1, notes = ?2, approved_medications = ?3,
                conflicts_found = ?4, completed_at = ?5
         WHERE id = ?6",
        params![
            status.as_str(),
            patch(current.notes, changes.notes.as_ref()),
            changes.approved_medications.unwrap_or(current.approved_medications),
            changes.conflicts_found.unwrap_or(current.conflicts_found),
            completed_at,
            reconciliation_id,
        ],
    )?;

    super::find(&conn, reconciliation_id)
}
