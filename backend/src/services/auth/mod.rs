//! # Authentication Service Module
//!
//! Routes under `/api/v1/auth`:
//!
//! *   **`POST /token`** (`token::process`): form-encoded `username` (the
//!     provider's email) and `password`; answers a bearer token or 401.
//! *   **`POST /register`** (`register::process`): creates a provider account;
//!     400 when the email is already registered.
//! *   **`GET /me`** (`me::process`): the provider owning the bearer token.

mod me;
mod register;
mod token;

use super::API_V1;
use actix_web::web::{get, post, scope};
use actix_web::Scope;

pub fn configure_routes() -> Scope {
    scope(&format!("{}/auth", API_V1))
        .route("/token", post().to(token::process))
        .route("/register", post().to(register::process))
        .route("/me", get().to(me::process))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{init_app, TestContext};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use common::model::user::User;
    use common::requests::{RegisterRequest, TokenResponse};

    fn registration() -> RegisterRequest {
        RegisterRequest {
            name: "Dr. Ada Lovelace".to_string(),
            email: "ada@clinic.test".to_string(),
            password: "secret1".to_string(),
            specialty: Some("Pharmacy".to_string()),
            ..RegisterRequest::default()
        }
    }

    #[actix_web::test]
    async fn register_login_and_read_profile() {
        let ctx = TestContext::new();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(registration())
            .to_request();
        let user: User = test::call_and_read_body_json(&app, req).await;
        assert_eq!(user.email, "ada@clinic.test");
        assert!(user.is_active);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/token")
            .set_form([("username", "ada@clinic.test"), ("password", "secret1")])
            .to_request();
        let token: TokenResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(token.token_type, "bearer");

        let req = test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(("Authorization", format!("Bearer {}", token.access_token)))
            .to_request();
        let me: User = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me.id, user.id);
        assert_eq!(me.specialty.as_deref(), Some("Pharmacy"));
    }

    #[actix_web::test]
    async fn duplicate_email_is_rejected() {
        let ctx = TestContext::new();
        let app = init_app!(ctx);

        for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
            let req = test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(registration())
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), expected);
        }
    }

    #[actix_web::test]
    async fn duplicate_email_ignores_case() {
        let ctx = TestContext::new();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(registration())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(RegisterRequest {
                email: " ADA@Clinic.test".to_string(),
                ..registration()
            })
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["detail"], "Email already registered");
    }

    #[actix_web::test]
    async fn bad_credentials_and_tokens_are_unauthorized() {
        let ctx = TestContext::new();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/token")
            .set_form([("username", "nobody@clinic.test"), ("password", "secret1")])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(("Authorization", "Bearer forged"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers().get("WWW-Authenticate").unwrap(), "Bearer");
    }

    #[actix_web::test]
    async fn short_password_is_unprocessable() {
        let ctx = TestContext::new();
        let app = init_app!(ctx);
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(RegisterRequest {
                password: "123".to_string(),
                ..registration()
            })
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
