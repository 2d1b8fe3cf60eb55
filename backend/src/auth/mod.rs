//! Provider authentication: password hashing, bearer tokens and the
//! [`CurrentProvider`] extractor guarding every authenticated route.

pub mod password;
pub mod tokens;

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::Utc;
use common::model::user::User;
use futures_util::future::{ready, Ready};

/// The provider identified by the request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentProvider(pub User);

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<CurrentProvider, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("application state is not registered".to_string()))?;
    let token = bearer_token(req).ok_or_else(ApiError::credentials)?;

    let conn = state.connect()?;
    tokens::resolve(&conn, token, Utc::now())?
        .map(CurrentProvider)
        .ok_or_else(ApiError::credentials)
}

impl FromRequest for CurrentProvider {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
