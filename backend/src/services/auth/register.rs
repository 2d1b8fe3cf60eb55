use crate::auth::password;
use crate::db::rows;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::user::User;
use common::requests::{non_blank, RegisterRequest};
use common::validation::Validate;
use rusqlite::{params, ErrorCode};

/// Handler for `POST /api/v1/auth/register`.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    let user = web::block(move || register(&state, &request)).await??;
    Ok(HttpResponse::Ok().json(user))
}

/// Creates the provider. The case-insensitive unique index on `email` decides
/// duplicates, so two concurrent registrations cannot both succeed.
pub fn register(state: &AppState, request: &RegisterRequest) -> Result<User, ApiError> {
    request.validate()?;
    let password_hash = password::hash_password(&request.password)?;
    let conn = state.connect()?;

    let optional = |value: &Option<String>| value.as_deref().and_then(non_blank);
    let inserted = conn.execute(
        "INSERT INTO providers (name, email, password_hash, license_number, specialty, practice_name, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            request.name.trim(),
            request.email.trim(),
            password_hash,
            optional(&request.license_number),
            optional(&request.specialty),
            optional(&request.practice_name),
            Utc::now(),
        ],
    );
    match inserted {
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            return Err(ApiError::BadRequest("Email already registered".to_string()));
        }
        other => other?,
    };

    Ok(conn.query_row(
        &format!("SELECT {} FROM providers WHERE id = ?1", rows::USER_COLUMNS),
        params![conn.last_insert_rowid()],
        rows::user,
    )?)
}
