use crate::auth::CurrentProvider;
use crate::db::rows;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::reconciliation::Reconciliation;
use common::requests::ReconciliationQuery;
use rusqlite::params;

/// Handler for `GET /api/v1/reconciliations/`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    query: web::Query<ReconciliationQuery>,
) -> Result<HttpResponse, ApiError> {
    let reconciliations = list_reconciliations(&state, &query)?;
    Ok(HttpResponse::Ok().json(reconciliations))
}

pub fn list_reconciliations(
    state: &AppState,
    query: &ReconciliationQuery,
) -> Result<Vec<Reconciliation>, ApiError> {
    let conn = state.connect()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM reconciliations
         WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR patient_id = ?2)
         ORDER BY created_at DESC, id DESC LIMIT ?3 OFFSET ?4",
        rows::RECONCILIATION_COLUMNS
    ))?;
    let status = query.status.map(|s| s.as_str());
    let reconciliations = stmt
        .query_map(
            params![status, query.patient_id, query.limit, query.skip],
            rows::reconciliation,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(reconciliations)
}
