//! # Patient Service Module
//!
//! CRUD over the `patients` table, under `/api/v1/patients`. Every route
//! requires a bearer token.
//!
//! *   **`GET /`**: paged list (`skip`, `limit`).
//! *   **`POST /`**: creates a patient from a `PatientCreate` body.
//! *   **`GET /{patient_id}`**, **`PUT /{patient_id}`**: read and partial update.
//! *   **`DELETE /{patient_id}`**: removes the patient together with their
//!     medications and reconciliations.

mod create;
mod delete;
mod get;
mod list;
mod update;

use super::API_V1;
use crate::db::rows;
use crate::error::ApiError;
use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;
use common::model::patient::Patient;
use rusqlite::{params, Connection, OptionalExtension};

pub fn configure_routes() -> Scope {
    scope(&format!("{}/patients", API_V1))
        .route("", get().to(list::process))
        .route("/", get().to(list::process))
        .route("", post().to(create::process))
        .route("/", post().to(create::process))
        .route("/{patient_id}", get().to(get::process))
        .route("/{patient_id}", put().to(update::process))
        .route("/{patient_id}", delete().to(delete::process))
}

/// Loads one patient or answers 404.
pub(crate) fn find(conn: &Connection, patient_id: i64) -> Result<Patient, ApiError> {
    conn.query_row(
        &format!("SELECT {} FROM patients WHERE id = ?1", rows::PATIENT_COLUMNS),
        params![patient_id],
        rows::patient,
    )
    .optional()?
    .ok_or_else(|| ApiError::not_found("Patient"))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{init_app, TestContext};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::NaiveDate;
    use common::model::medication::Medication;
    use common::model::patient::Patient;
    use common::requests::{MedicationCreate, PatientCreate, PatientUpdate};
    use serde_json::json;

    fn jane() -> PatientCreate {
        PatientCreate {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1960, 4, 2).unwrap(),
            phone: None,
            email: Some("jane@example.com".to_string()),
            mrn: Some("MRN-1".to_string()),
        }
    }

    #[actix_web::test]
    async fn create_read_update_list() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/patients/")
            .insert_header(auth.clone())
            .set_json(jane())
            .to_request();
        let created: Patient = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.full_name(), "Jane Doe");
        assert!(created.created_at.is_some());

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/patients/{}", created.id))
            .insert_header(auth.clone())
            .set_json(PatientUpdate {
                phone: Some("555-0100".to_string()),
                mrn: Some(String::new()),
                ..PatientUpdate::default()
            })
            .to_request();
        let updated: Patient = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert_eq!(updated.mrn, None);
        assert_eq!(updated.first_name, "Jane");

        let req = test::TestRequest::get()
            .uri("/api/v1/patients/?skip=0&limit=10")
            .insert_header(auth)
            .to_request();
        let list: Vec<Patient> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(list, vec![updated]);
    }

    #[actix_web::test]
    async fn missing_first_name_is_unprocessable() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/patients/")
            .insert_header(auth)
            .set_json(json!({"first_name": "", "last_name": "Doe", "date_of_birth": "1960-04-02"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["detail"], "First name is required");
    }

    #[actix_web::test]
    async fn malformed_input_answers_json_detail() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/patients/")
            .insert_header(auth.clone())
            .set_json(json!({"first_name": "A", "last_name": "B"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert!(body["detail"].as_str().unwrap().contains("date_of_birth"));

        let req = test::TestRequest::get()
            .uri("/api/v1/patients/abc")
            .insert_header(auth.clone())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert!(body["detail"].is_string());

        let req = test::TestRequest::get()
            .uri("/api/v1/patients/?limit=many")
            .insert_header(auth)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert!(body["detail"].is_string());
    }

    #[actix_web::test]
    async fn delete_removes_patient_medications() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/patients/")
            .insert_header(auth.clone())
            .set_json(jane())
            .to_request();
        let patient: Patient = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/medications/")
            .insert_header(auth.clone())
            .set_json(MedicationCreate {
                patient_id: patient.id,
                name: "Metformin".to_string(),
                ..MedicationCreate::default()
            })
            .to_request();
        let med: Medication = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/patients/{}", patient.id))
            .insert_header(auth.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        for uri in [
            format!("/api/v1/patients/{}", patient.id),
            format!("/api/v1/medications/{}", med.id),
        ] {
            let req = test::TestRequest::get()
                .uri(&uri)
                .insert_header(auth.clone())
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
        }
    }

    #[actix_web::test]
    async fn requires_token() {
        let ctx = TestContext::new();
        let app = init_app!(ctx);
        let req = test::TestRequest::get().uri("/api/v1/patients/").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}
