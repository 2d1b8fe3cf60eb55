use crate::auth::CurrentProvider;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::reconciliation::ReconciliationStatus;
use common::model::MessageResponse;
use log::info;
use rusqlite::params;

/// Handler for `POST /api/v1/reconciliations/{reconciliation_id}/complete`.
pub async fn process(
    state: web::Data<AppState>,
    provider: CurrentProvider,
    reconciliation_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    complete_reconciliation(&state, *reconciliation_id)?;
    info!(
        "Provider {} completed reconciliation {}",
        provider.0.id, *reconciliation_id
    );
    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "Reconciliation completed successfully",
    )))
}

pub fn complete_reconciliation(state: &AppState, reconciliation_id: i64) -> Result<(), ApiError> {
    let conn = state.connect()?;
    let changed = conn.execute(
        "UPDATE reconciliations SET status = ?1, completed_at = ?2 WHERE id = ?3",
        params![
            ReconciliationStatus::Completed.as_str(),
            Utc::now(),
            reconciliation_id
        ],
    )?;
    if changed == 0 {
        return Err(ApiError::not_found("Reconciliation"));
    }
    Ok(())
}
