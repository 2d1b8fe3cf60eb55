//! # Reconciliation Service Module
//!
//! Review sessions over a patient's medication list, under
//! `/api/v1/reconciliations`. All routes need a bearer token.
//!
//! *   **`GET /`**: list filtered by `status` and `patient_id`, newest first.
//! *   **`POST /`**: opens an `in_progress` session for a patient, counting
//!     their active medications.
//! *   **`GET /export`**: every session as CSV, for the analytics export.
//! *   **`GET /{reconciliation_id}`**: detail with patient and provider names
//!     and the patient's active medications.
//! *   **`PUT /{reconciliation_id}`**: partial update; moving to `completed`
//!     stamps `completed_at`.
//! *   **`POST /{reconciliation_id}/complete`**: the explicit completion action.

mod complete;
mod create;
mod export;
mod get;
mod list;
mod update;

use super::API_V1;
use crate::db::rows;
use crate::error::ApiError;
use actix_web::web::{get, post, put, scope};
use actix_web::Scope;
use common::model::reconciliation::Reconciliation;
use rusqlite::{params, Connection, OptionalExtension};

pub fn configure_routes() -> Scope {
    scope(&format!("{}/reconciliations", API_V1))
        .route("", get().to(list::process))
        .route("/", get().to(list::process))
        .route("", post().to(create::process))
        .route("/", post().to(create::process))
        // Registered before `/{reconciliation_id}`, which would reject the literal.
        .route("/export", get().to(export::process))
        .route("/{reconciliation_id}", get().to(get::process))
        .route("/{reconciliation_id}", put().to(update::process))
        .route("/{reconciliation_id}/complete", post().to(complete::process))
}

pub(crate) fn find(conn: &Connection, reconciliation_id: i64) -> Result<Reconciliation, ApiError> {
    conn.query_row(
        &format!(
            "SELECT {} FROM reconciliations WHERE id = ?1",
            rows::RECONCILIATION_COLUMNS
        ),
        params![reconciliation_id],
        rows::reconciliation,
    )
    .optional()?
    .ok_or_else(|| ApiError::not_found("Reconciliation"))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{init_app, TestContext};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::NaiveDate;
    use common::model::medication::Medication;
    use common::model::patient::Patient;
    use common::model::reconciliation::{
        Reconciliation, ReconciliationDetail, ReconciliationStatus,
    };
    use common::requests::{
        MedicationCreate, MedicationUpdate, PatientCreate, ReconciliationCreate,
        ReconciliationUpdate,
    };

    #[actix_web::test]
    async fn lifecycle_counts_active_medications_and_completes() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/patients/")
            .insert_header(auth.clone())
            .set_json(PatientCreate {
                first_name: "Mary".to_string(),
                last_name: "Major".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1950, 7, 9).unwrap(),
                phone: None,
                email: None,
                mrn: None,
            })
            .to_request();
        let patient: Patient = test::call_and_read_body_json(&app, req).await;

        let mut meds = Vec::new();
        for name in ["Warfarin", "Digoxin", "Furosemide"] {
            let req = test::TestRequest::post()
                .uri("/api/v1/medications/")
                .insert_header(auth.clone())
                .set_json(MedicationCreate {
                    patient_id: patient.id,
                    name: name.to_string(),
                    ..MedicationCreate::default()
                })
                .to_request();
            let med: Medication = test::call_and_read_body_json(&app, req).await;
            meds.push(med);
        }
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/medications/{}", meds[2].id))
            .insert_header(auth.clone())
            .set_json(MedicationUpdate {
                is_active: Some(false),
                ..MedicationUpdate::default()
            })
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/v1/reconciliations/")
            .insert_header(auth.clone())
            .set_json(ReconciliationCreate {
                patient_id: patient.id,
                notes: Some("annual review".to_string()),
            })
            .to_request();
        let rec: Reconciliation = test::call_and_read_body_json(&app, req).await;
        assert_eq!(rec.status, ReconciliationStatus::InProgress);
        assert_eq!(rec.total_medications, 2);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/reconciliations/{}", rec.id))
            .insert_header(auth.clone())
            .to_request();
        let detail: ReconciliationDetail = test::call_and_read_body_json(&app, req).await;
        assert_eq!(detail.patient_name, "Mary Major");
        assert_eq!(detail.provider_name, "Dr. Test");
        assert_eq!(detail.medications.len(), 2);

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/reconciliations/{}", rec.id))
            .insert_header(auth.clone())
            .set_json(ReconciliationUpdate {
                approved_medications: Some(2),
                conflicts_found: Some(1),
                ..ReconciliationUpdate::default()
            })
            .to_request();
        let updated: Reconciliation = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.approved_medications, 2);
        assert!(updated.completed_at.is_none());

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/reconciliations/{}/complete", rec.id))
            .insert_header(auth.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/v1/reconciliations/?status=completed")
            .insert_header(auth.clone())
            .to_request();
        let completed: Vec<Reconciliation> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(completed.len(), 1);
        assert!(completed[0].completed_at.is_some());
        assert_eq!(completed[0].conflicts_found, 1);

        let req = test::TestRequest::get()
            .uri("/api/v1/reconciliations/?status=pending")
            .insert_header(auth.clone())
            .to_request();
        let pending: Vec<Reconciliation> = test::call_and_read_body_json(&app, req).await;
        assert!(pending.is_empty());

        let req = test::TestRequest::get()
            .uri("/api/v1/reconciliations/export")
            .insert_header(auth)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("content-type").unwrap(), "text/csv; charset=utf-8");
        let body = test::read_body(res).await;
        let csv = String::from_utf8(body.to_vec()).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("id,patient_id,patient_name,status"));
        assert!(lines.next().unwrap().contains("Mary Major,completed"));
    }

    #[actix_web::test]
    async fn update_to_completed_stamps_completion_time() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/patients/")
            .insert_header(auth.clone())
            .set_json(PatientCreate {
                first_name: "Sam".to_string(),
                last_name: "Stone".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 2, 3).unwrap(),
                phone: None,
                email: None,
                mrn: None,
            })
            .to_request();
        let patient: Patient = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/reconciliations/")
            .insert_header(auth.clone())
            .set_json(ReconciliationCreate {
                patient_id: patient.id,
                notes: None,
            })
            .to_request();
        let rec: Reconciliation = test::call_and_read_body_json(&app, req).await;
        assert_eq!(rec.total_medications, 0);

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/reconciliations/{}", rec.id))
            .insert_header(auth)
            .set_json(ReconciliationUpdate {
                status: Some(ReconciliationStatus::Completed),
                ..ReconciliationUpdate::default()
            })
            .to_request();
        let done: Reconciliation = test::call_and_read_body_json(&app, req).await;
        assert_eq!(done.status, ReconciliationStatus::Completed);
        assert!(done.completed_at.is_some());
    }

    #[actix_web::test]
    async fn list_is_newest_first() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/patients/")
            .insert_header(auth.clone())
            .set_json(PatientCreate {
                first_name: "Lee".to_string(),
                last_name: "Park".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1982, 5, 6).unwrap(),
                phone: None,
                email: None,
                mrn: None,
            })
            .to_request();
        let patient: Patient = test::call_and_read_body_json(&app, req).await;

        let mut ids = Vec::new();
        for notes in ["first", "second"] {
            let req = test::TestRequest::post()
                .uri("/api/v1/reconciliations/")
                .insert_header(auth.clone())
                .set_json(ReconciliationCreate {
                    patient_id: patient.id,
                    notes: Some(notes.to_string()),
                })
                .to_request();
            let rec: Reconciliation = test::call_and_read_body_json(&app, req).await;
            ids.push(rec.id);
        }

        let req = test::TestRequest::get()
            .uri("/api/v1/reconciliations/")
            .insert_header(auth)
            .to_request();
        let listed: Vec<Reconciliation> = test::call_and_read_body_json(&app, req).await;
        let listed_ids: Vec<i64> = listed.iter().map(|r| r.id).collect();
        ids.reverse();
        assert_eq!(listed_ids, ids);
    }

    #[actix_web::test]
    async fn unknown_patient_or_session_is_not_found() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/reconciliations/")
            .insert_header(auth.clone())
            .set_json(ReconciliationCreate {
                patient_id: 41,
                notes: None,
            })
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/v1/reconciliations/41/complete")
            .insert_header(auth)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
