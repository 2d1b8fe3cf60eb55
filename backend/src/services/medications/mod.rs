//! # Medication Service Module
//!
//! Routes under `/api/v1/medications`, all behind a bearer token:
//!
//! *   **`GET /`**: paged list, optionally narrowed with `patient_id`.
//! *   **`POST /`**: records a medication for an existing patient (404 otherwise).
//! *   **`GET /{medication_id}`**, **`PUT /{medication_id}`**,
//!     **`DELETE /{medication_id}`**: single-record operations.

mod create;
mod delete;
mod get;
mod list;
mod update;

pub use create::insert_medication;

use super::API_V1;
use crate::db::rows;
use crate::error::ApiError;
use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;
use common::model::medication::Medication;
use rusqlite::{params, Connection, OptionalExtension};

pub fn configure_routes() -> Scope {
    scope(&format!("{}/medications", API_V1))
        .route("", get().to(list::process))
        .route("/", get().to(list::process))
        .route("", post().to(create::process))
        .route("/", post().to(create::process))
        .route("/{medication_id}", get().to(get::process))
        .route("/{medication_id}", put().to(update::process))
        .route("/{medication_id}", delete().to(delete::process))
}

pub(crate) fn find(conn: &Connection, medication_id: i64) -> Result<Medication, ApiError> {
    conn.query_row(
        &format!("SELECT {} FROM medications WHERE id = ?1", rows::MEDICATION_COLUMNS),
        params![medication_id],
        rows::medication,
    )
    .optional()?
    .ok_or_else(|| ApiError::not_found("Medication"))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{init_app, TestContext};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::NaiveDate;
    use common::model::medication::{Medication, MedicationSource};
    use common::model::patient::Patient;
    use common::requests::{MedicationCreate, MedicationUpdate, PatientCreate};

    fn patient_body(first_name: &str) -> PatientCreate {
        PatientCreate {
            first_name: first_name.to_string(),
            last_name: "Roe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1975, 1, 1).unwrap(),
            phone: None,
            email: None,
            mrn: None,
        }
    }

    #[actix_web::test]
    async fn unknown_patient_is_not_found() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/medications/")
            .insert_header(auth)
            .set_json(MedicationCreate {
                patient_id: 999,
                name: "Aspirin".to_string(),
                ..MedicationCreate::default()
            })
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn filters_by_patient_and_updates() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let mut patients = Vec::new();
        for name in ["Ann", "Bob"] {
            let req = test::TestRequest::post()
                .uri("/api/v1/patients/")
                .insert_header(auth.clone())
                .set_json(patient_body(name))
                .to_request();
            let p: Patient = test::call_and_read_body_json(&app, req).await;
            patients.push(p);
        }

        let mut created = Vec::new();
        for (patient, name) in [(&patients[0], "Lisinopril"), (&patients[1], "Atorvastatin")] {
            let req = test::TestRequest::post()
                .uri("/api/v1/medications/")
                .insert_header(auth.clone())
                .set_json(MedicationCreate {
                    patient_id: patient.id,
                    name: name.to_string(),
                    dosage: Some("10mg".to_string()),
                    source: MedicationSource::Pharmacy,
                    ..MedicationCreate::default()
                })
                .to_request();
            let m: Medication = test::call_and_read_body_json(&app, req).await;
            created.push(m);
        }
        assert!(created[0].is_active);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/medications/?patient_id={}", patients[0].id))
            .insert_header(auth.clone())
            .to_request();
        let filtered: Vec<Medication> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Lisinopril");

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/medications/{}", created[0].id))
            .insert_header(auth.clone())
            .set_json(MedicationUpdate {
                frequency: Some("once daily".to_string()),
                last_filled: NaiveDate::from_ymd_opt(2024, 5, 1),
                is_active: Some(false),
                ..MedicationUpdate::default()
            })
            .to_request();
        let updated: Medication = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.frequency.as_deref(), Some("once daily"));
        assert_eq!(updated.dosage.as_deref(), Some("10mg"));
        assert!(!updated.is_active);
        assert_eq!(updated.source, MedicationSource::Pharmacy);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/medications/{}", created[1].id))
            .insert_header(auth.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/v1/medications/")
            .insert_header(auth)
            .to_request();
        let remaining: Vec<Medication> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(remaining.len(), 1);
    }
}
