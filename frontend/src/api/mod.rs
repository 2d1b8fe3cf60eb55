//! REST client for `/api/v1`.
//!
//! Every call attaches the stored bearer token. A 401 on an authenticated
//! call drops the token and sends the browser to the login page. Reads are
//! retried once on network and server errors; mutations are never retried.

pub mod cache;
pub mod endpoints;
pub mod storage;

use common::model::ErrorDetail;
use common::query::{RequestKind, RetryPolicy};
use common::session::{AuthOutcome, LOGIN_PATH};
use common::validation::ValidationError;
use gloo_net::http::{Method, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use web_sys::FormData;

use storage::session;

pub const API_BASE: &str = "/api/v1";

pub type Query = Vec<(&'static str, String)>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Your session has expired, please sign in again")]
    Unauthorized,
    #[error("{detail}")]
    Http { status: u16, detail: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Could not encode request: {0}")]
    Encode(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[derive(Clone)]
enum Body {
    Empty,
    Json(String),
    Form(String),
    Multipart(FormData),
}

struct Call {
    method: Method,
    path: String,
    query: Query,
    body: Body,
    kind: RequestKind,
}

impl Call {
    fn new(method: Method, path: &str) -> Self {
        let kind = if method == Method::GET {
            RequestKind::Read
        } else {
            RequestKind::Mutation
        };
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: Body::Empty,
            kind,
        }
    }

    fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    fn build(&self) -> Result<Request, gloo_net::Error> {
        let mut builder = RequestBuilder::new(&format!("{}{}", API_BASE, self.path))
            .method(self.method.clone())
            .query(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        if let Some(authorization) = session().authorization() {
            builder = builder.header("Authorization", &authorization);
        }

        match &self.body {
            Body::Empty => builder.build(),
            Body::Json(json) => builder
                .header("Content-Type", "application/json")
                .body(json.as_str()),
            Body::Form(form) => builder
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(form.as_str()),
            Body::Multipart(data) => builder.body(data.clone()),
        }
    }

    async fn send(self) -> Result<Response, ApiError> {
        let policy = RetryPolicy::default();
        let mut attempt = 1;
        loop {
            let result = self.attempt().await;
            match result {
                Err(err) if err.is_retryable() && policy.should_retry(self.kind, attempt) => {
                    gloo_console::warn!(format!("retrying {} {}: {}", self.method, self.path, err));
                    attempt += 1;
                }
                other => {
                    if let Err(err) = &other {
                        gloo_console::error!(format!("{} {} failed: {}", self.method, self.path, err));
                    }
                    return other;
                }
            }
        }
    }

    async fn attempt(&self) -> Result<Response, ApiError> {
        let request = self.build().map_err(|e| ApiError::Network(e.to_string()))?;
        let authenticated = session().is_authenticated();
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check(response, authenticated).await
    }
}

/// Maps a response to an error unless it is a 2xx. Only a 401 on a call that
/// carried a token ends the session; the login form sees its own 401 detail.
async fn check(response: Response, authenticated: bool) -> Result<Response, ApiError> {
    let status = response.status();
    if authenticated && session().observe_status(status) == AuthOutcome::RedirectToLogin {
        redirect_to_login();
        return Err(ApiError::Unauthorized);
    }
    if response.ok() {
        return Ok(response);
    }

    let detail = match response.json::<ErrorDetail>().await {
        Ok(body) => body.detail,
        Err(_) => response.status_text(),
    };
    Err(ApiError::Http { status, detail })
}

pub fn redirect_to_login() {
    if let Some(window) = web_sys::window() {
        window.location().set_href(LOGIN_PATH).ok();
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn json_body<B: Serialize>(body: &B) -> Result<Body, ApiError> {
    serde_json::to_string(body)
        .map(Body::Json)
        .map_err(|e| ApiError::Encode(e.to_string()))
}

pub(crate) async fn get<T: DeserializeOwned>(path: &str, query: Query) -> Result<T, ApiError> {
    decode(Call::new(Method::GET, path).query(query).send().await?).await
}

pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    let call = Call::new(Method::POST, path).body(json_body(body)?);
    decode(call.send().await?).await
}

pub(crate) async fn post_empty<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    decode(Call::new(Method::POST, path).send().await?).await
}

pub(crate) async fn post_form<T: DeserializeOwned>(path: &str, form: String) -> Result<T, ApiError> {
    let call = Call::new(Method::POST, path).body(Body::Form(form));
    decode(call.send().await?).await
}

pub(crate) async fn post_multipart<T: DeserializeOwned>(
    path: &str,
    query: Query,
    data: FormData,
) -> Result<T, ApiError> {
    let call = Call::new(Method::POST, path)
        .query(query)
        .body(Body::Multipart(data));
    decode(call.send().await?).await
}

pub(crate) async fn put<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    let call = Call::new(Method::PUT, path).body(json_body(body)?);
    decode(call.send().await?).await
}

pub(crate) async fn delete<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    decode(Call::new(Method::DELETE, path).send().await?).await
}

pub(crate) async fn download(path: &str) -> Result<Vec<u8>, ApiError> {
    let response = Call::new(Method::GET, path).send().await?;
    response
        .binary()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_failures_are_retried() {
        assert!(ApiError::Network("offline".into()).is_retryable());
        assert!(ApiError::Http { status: 503, detail: "down".into() }.is_retryable());
        assert!(!ApiError::Http { status: 404, detail: "Patient not found".into() }.is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
    }

    #[test]
    fn http_errors_display_the_server_detail() {
        let err = ApiError::Http { status: 400, detail: "Email already registered".into() };
        assert_eq!(err.to_string(), "Email already registered");
        let err: ApiError = ValidationError::Required("First name").into();
        assert_eq!(err.to_string(), "First name is required");
    }
}
