use crate::auth::CurrentProvider;
use crate::db::rows;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::patient::Patient;
use common::requests::PageQuery;
use rusqlite::params;

/// Handler for `GET /api/v1/patients/`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
    let patients = list_patients(&state, &query)?;
    Ok(HttpResponse::Ok().json(patients))
}

pub fn list_patients(state: &AppState, page: &PageQuery) -> Result<Vec<Patient>, ApiError> {
    let conn = state.connect()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM patients ORDER BY id LIMIT ?1 OFFSET ?2",
        rows::PATIENT_COLUMNS
    ))?;
    let patients = stmt
        .query_map(params![page.limit, page.skip], rows::patient)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(patients)
}
