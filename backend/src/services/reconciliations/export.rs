//! CSV export of every reconciliation, joined with the patient's name.

use crate::auth::CurrentProvider;
use crate::db::rows;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use common::model::reconciliation::Reconciliation;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ExportRow {
    id: i64,
    patient_id: i64,
    patient_name: String,
    status: &'static str,
    total_medications: u32,
    approved_medications: u32,
    conflicts_found: u32,
    created_at: String,
    completed_at: String,
    notes: String,
}

impl ExportRow {
    fn new(rec: Reconciliation, patient_name: Option<String>) -> Self {
        Self {
            id: rec.id,
            patient_id: rec.patient_id,
            patient_name: patient_name.unwrap_or_default(),
            status: rec.status.as_str(),
            total_medications: rec.total_medications,
            approved_medications: rec.approved_medications,
            conflicts_found: rec.conflicts_found,
            created_at: rec.created_at.to_rfc3339(),
            completed_at: rec.completed_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            notes: rec.notes.unwrap_or_default(),
        }
    }
}

/// Handler for `GET /api/v1/reconciliations/export`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
) -> Result<HttpResponse, ApiError> {
    let csv = export_csv(&state)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename("reconciliations.csv".to_string())],
        })
        .body(csv))
}

pub fn export_csv(state: &AppState) -> Result<Vec<u8>, ApiError> {
    let conn = state.connect()?;
    let columns = rows::RECONCILIATION_COLUMNS
        .split(", ")
        .map(|c| format!("r.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT {}, p.first_name || ' ' || p.last_name
         FROM reconciliations r LEFT JOIN patients p ON p.id = r.patient_id
         ORDER BY r.id",
        columns
    ))?;
    let records = stmt
        .query_map([], |row| Ok(ExportRow::new(rows::reconciliation(row)?, row.get(10)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| ApiError::Internal(format!("csv export failed: {}", e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("csv export failed: {}", e)))
}
