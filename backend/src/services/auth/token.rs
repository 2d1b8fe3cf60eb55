use crate::auth::{password, tokens};
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::requests::{LoginRequest, TokenResponse};
use log::info;
use rusqlite::{params, OptionalExtension};

/// Handler for `POST /api/v1/auth/token`.
pub async fn process(
    state: web::Data<AppState>,
    form: web::Form<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let credentials = form.into_inner();
    let token = web::block(move || login(&state, &credentials)).await??;
    Ok(HttpResponse::Ok().json(token))
}

/// Checks the credentials and issues a bearer token valid for the configured lifetime.
pub fn login(state: &AppState, credentials: &LoginRequest) -> Result<TokenResponse, ApiError> {
    let rejected = || ApiError::Unauthorized("Incorrect username or password".to_string());
    let conn = state.connect()?;

    let (provider_id, stored_hash): (i64, String) = conn
        .query_row(
            "SELECT id, password_hash FROM providers WHERE lower(email) = lower(?1) AND is_active = 1",
            params![credentials.username.trim()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .ok_or_else(rejected)?;

    if !password::verify_password(&credentials.password, &stored_hash) {
        return Err(rejected());
    }

    let access_token = tokens::issue(&conn, provider_id, state.token_ttl(), Utc::now())?;
    info!("Provider {} signed in", provider_id);

    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    })
}
