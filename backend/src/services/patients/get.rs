use crate::auth::CurrentProvider;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Handler for `GET /api/v1/patients/{patient_id}`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    patient_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let conn = state.connect()?;
    let patient = super::find(&conn, *patient_id)?;
    Ok(HttpResponse::Ok().json(patient))
}
