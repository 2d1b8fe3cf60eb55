use crate::auth::CurrentProvider;
use crate::db::rows;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::medication::MedicationBrief;
use common::model::reconciliation::ReconciliationDetail;
use rusqlite::{params, OptionalExtension};

/// Handler for `GET /api/v1/reconciliations/{reconciliation_id}`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    reconciliation_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let detail = reconciliation_detail(&state, *reconciliation_id)?;
    Ok(HttpResponse::Ok().json(detail))
}

pub fn reconciliation_detail(
    state: &AppState,
    reconciliation_id: i64,
) -> Result<ReconciliationDetail, ApiError> {
    let conn = state.connect()?;
    let reconciliation = super::find(&conn, reconciliation_id)?;

    let patient_name: Option<String> = conn
        .query_row(
            "SELECT first_name || ' ' || last_name FROM patients WHERE id = ?1",
            params![reconciliation.patient_id],
            |row| row.get(0),
        )
        .optional()?;
    let provider_name: Option<String> = conn
        .query_row(
            "SELECT name FROM providers WHERE id = ?1",
            params![reconciliation.provider_id],
            |row| row.get(0),
        )
        .optional()?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM medications WHERE patient_id = ?1 AND is_active = 1 ORDER BY id",
        rows::MEDICATION_COLUMNS
    ))?;
    let medications = stmt
        .query_map(params![reconciliation.patient_id], rows::medication)?
        .map(|row| row.map(|m| MedicationBrief::from(&m)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReconciliationDetail {
        reconciliation,
        patient_name: patient_name.unwrap_or_else(|| "Unknown".to_string()),
        provider_name: provider_name.unwrap_or_else(|| "Unknown".to_string()),
        medications,
    })
}
