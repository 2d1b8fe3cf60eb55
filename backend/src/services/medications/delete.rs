use crate::auth::CurrentProvider;
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::MessageResponse;
use rusqlite::params;

/// Handler for `DELETE /api/v1/medications/{medication_id}`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    medication_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let conn = state.connect()?;
    if !db::exists(&conn, "medications", *medication_id)? {
        return Err(ApiError::not_found("Medication"));
    }
    conn.execute("DELETE FROM medications WHERE id = ?1", params![*medication_id])?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Medication deleted successfully")))
}
