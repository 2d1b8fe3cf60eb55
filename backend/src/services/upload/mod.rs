//! # Upload Service Module
//!
//! Medication photos and their OCR pass.
//!
//! *   **`POST /api/v1/upload/image?patient_id=`** (`store::process`, bearer
//!     token): multipart field `file` holding a JPEG, PNG or GIF no larger than
//!     the configured limit. The image is stored under a random name and run
//!     through the text recognizer; when `patient_id` names an existing patient
//!     every suggestion is saved as a `photo` medication.
//! *   **`GET /api/v1/upload/images/{filename}`** and
//!     **`GET /uploads/{filename}`** (`serve::process`): the stored image.

pub mod ocr;
mod serve;
mod store;

use super::API_V1;
use actix_web::web::{get, post, resource, scope};
use actix_web::{Resource, Scope};

pub fn configure_routes() -> Scope {
    scope(&format!("{}/upload", API_V1))
        .route("/image", post().to(store::process))
        .route("/images/{filename}", get().to(serve::process))
}

/// Public path returned to clients as `file_path`.
pub fn configure_public_routes() -> Resource {
    resource("/uploads/{filename}").route(get().to(serve::process))
}

/// Path under which a stored upload is served.
pub(crate) fn public_path(filename: &str) -> String {
    format!("/uploads/{}", filename)
}

#[cfg(test)]
mod tests {
    use crate::test_support::{init_app, FixedRecognizer, TestContext};
    use actix_web::http::header::CONTENT_TYPE;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::NaiveDate;
    use common::model::medication::{Medication, MedicationSource};
    use common::model::patient::Patient;
    use common::model::upload::{ImageUploadResponse, OcrResult, SuggestedMedication};
    use common::requests::PatientCreate;
    use image::{ImageBuffer, ImageFormat, Luma};
    use std::io::Cursor;

    const BOUNDARY: &str = "medrec-test-boundary";

    fn png() -> Vec<u8> {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 4, Luma([255u8]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn multipart(content_type: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"label\"\r\nContent-Type: {ct}\r\n\r\n",
            b = BOUNDARY,
            ct = content_type
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(
        uri: &str,
        auth: (actix_web::http::header::HeaderName, String),
        body: Vec<u8>,
    ) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header(auth)
            .insert_header((
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
    }

    fn label_result() -> OcrResult {
        OcrResult {
            text: "Lisinopril 10mg once daily".to_string(),
            confidence: 72,
            suggested_medications: vec![SuggestedMedication {
                name: "Lisinopril".to_string(),
                dosage: "10mg".to_string(),
                frequency: "Once daily".to_string(),
                raw_text: "Lisinopril 10mg once daily".to_string(),
            }],
        }
    }

    #[actix_web::test]
    async fn suggestions_become_photo_medications() {
        let ctx = TestContext::with_recognizer(FixedRecognizer(Some(label_result())));
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/v1/patients/")
            .insert_header(auth.clone())
            .set_json(PatientCreate {
                first_name: "Olu".to_string(),
                last_name: "Ade".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1970, 3, 3).unwrap(),
                phone: None,
                email: None,
                mrn: None,
            })
            .to_request();
        let patient: Patient = test::call_and_read_body_json(&app, req).await;

        let req = upload_request(
            &format!("/api/v1/upload/image?patient_id={}", patient.id),
            auth.clone(),
            multipart("image/png", &png()),
        )
        .to_request();
        let uploaded: ImageUploadResponse = test::call_and_read_body_json(&app, req).await;
        assert!(uploaded.filename.ends_with(".png"));
        assert_eq!(uploaded.file_path, format!("/uploads/{}", uploaded.filename));
        assert_eq!(uploaded.ocr_result.unwrap().confidence, 72);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/medications/?patient_id={}", patient.id))
            .insert_header(auth)
            .to_request();
        let meds: Vec<Medication> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].source, MedicationSource::Photo);
        assert_eq!(meds[0].ocr_confidence, Some(72));
        assert_eq!(meds[0].frequency.as_deref(), Some("Once daily"));
        assert_eq!(meds[0].image_path.as_deref(), Some(uploaded.file_path.as_str()));
    }

    #[actix_web::test]
    async fn failed_ocr_still_stores_the_image() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = upload_request("/api/v1/upload/image", auth, multipart("image/png", &png()))
            .to_request();
        let uploaded: ImageUploadResponse = test::call_and_read_body_json(&app, req).await;
        assert!(uploaded.ocr_result.is_none());

        for uri in [
            format!("/api/v1/upload/images/{}", uploaded.filename),
            uploaded.file_path.clone(),
        ] {
            let req = test::TestRequest::get().uri(&uri).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), "image/png");
        }

        let req = test::TestRequest::get()
            .uri("/api/v1/upload/images/missing.png")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn rejects_wrong_type_and_oversized_files() {
        let ctx = TestContext::new();
        let auth = ctx.auth_header();
        let app = init_app!(ctx);

        let req = upload_request("/api/v1/upload/image", auth.clone(), multipart("text/plain", b"hello"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = upload_request("/api/v1/upload/image", auth, multipart("image/png", &[0u8; 4096]))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["detail"], "File too large");
    }
}
