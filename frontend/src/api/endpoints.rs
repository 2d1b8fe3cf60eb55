//! Typed calls for every API route the dashboard uses.

use common::model::medication::Medication;
use common::model::patient::Patient;
use common::model::reconciliation::{Reconciliation, ReconciliationDetail};
use common::model::upload::ImageUploadResponse;
use common::model::user::User;
use common::model::MessageResponse;
use common::requests::{
    LoginRequest, MedicationCreate, MedicationQuery, MedicationUpdate, PageQuery,
    PatientCreate, PatientUpdate, ReconciliationCreate, ReconciliationQuery,
    ReconciliationUpdate, RegisterRequest, TokenResponse,
};
use common::validation::Validate;
use web_sys::{File, FormData};

use super::{ApiError, Query};

fn page_query(page: PageQuery) -> Query {
    vec![("skip", page.skip.to_string()), ("limit", page.limit.to_string())]
}

fn form_encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                k,
                String::from(js_sys::encode_uri_component(v))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

// auth

pub async fn login(credentials: LoginRequest) -> Result<TokenResponse, ApiError> {
    credentials.validate()?;
    let form = form_encode(&[
        ("username", credentials.username.trim()),
        ("password", &credentials.password),
    ]);
    super::post_form("/auth/token", form).await
}

pub async fn register(request: RegisterRequest) -> Result<User, ApiError> {
    request.validate()?;
    super::post("/auth/register", &request).await
}

pub async fn current_user() -> Result<User, ApiError> {
    super::get("/auth/me", Vec::new()).await
}

// patients

pub async fn list_patients() -> Result<Vec<Patient>, ApiError> {
    super::get("/patients/", page_query(PageQuery::default())).await
}

pub async fn create_patient(patient: PatientCreate) -> Result<Patient, ApiError> {
    patient.validate()?;
    super::post("/patients/", &patient).await
}

pub async fn update_patient(patient_id: i64, change: PatientUpdate) -> Result<Patient, ApiError> {
    change.validate()?;
    super::put(&format!("/patients/{}", patient_id), &change).await
}

pub async fn delete_patient(patient_id: i64) -> Result<MessageResponse, ApiError> {
    super::delete(&format!("/patients/{}", patient_id)).await
}

// medications

pub async fn list_medications(patient_id: Option<i64>) -> Result<Vec<Medication>, ApiError> {
    let filter = MedicationQuery::for_patient(patient_id);
    let mut query = page_query(filter.page());
    if let Some(id) = filter.patient_id {
        query.push(("patient_id", id.to_string()));
    }
    super::get("/medications/", query).await
}

pub async fn create_medication(medication: MedicationCreate) -> Result<Medication, ApiError> {
    medication.validate()?;
    super::post("/medications/", &medication).await
}

pub async fn update_medication(
    medication_id: i64,
    change: MedicationUpdate,
) -> Result<Medication, ApiError> {
    change.validate()?;
    super::put(&format!("/medications/{}", medication_id), &change).await
}

pub async fn delete_medication(medication_id: i64) -> Result<MessageResponse, ApiError> {
    super::delete(&format!("/medications/{}", medication_id)).await
}

// reconciliations

pub async fn list_reconciliations(filter: ReconciliationQuery) -> Result<Vec<Reconciliation>, ApiError> {
    let mut query = page_query(filter.page());
    if let Some(status) = filter.status {
        query.push(("status", status.as_str().to_string()));
    }
    if let Some(id) = filter.patient_id {
        query.push(("patient_id", id.to_string()));
    }
    super::get("/reconciliations/", query).await
}

pub async fn get_reconciliation(reconciliation_id: i64) -> Result<ReconciliationDetail, ApiError> {
    super::get(&format!("/reconciliations/{}", reconciliation_id), Vec::new()).await
}

pub async fn create_reconciliation(request: ReconciliationCreate) -> Result<Reconciliation, ApiError> {
    request.validate()?;
    super::post("/reconciliations/", &request).await
}

pub async fn update_reconciliation(
    reconciliation_id: i64,
    change: ReconciliationUpdate,
) -> Result<Reconciliation, ApiError> {
    super::put(&format!("/reconciliations/{}", reconciliation_id), &change).await
}

pub async fn complete_reconciliation(reconciliation_id: i64) -> Result<MessageResponse, ApiError> {
    super::post_empty(&format!("/reconciliations/{}/complete", reconciliation_id)).await
}

pub async fn export_reconciliations() -> Result<Vec<u8>, ApiError> {
    super::download("/reconciliations/export").await
}

// upload

/// Sends an image for OCR. With a patient, the server also stores the
/// suggestions as photo-sourced medications.
pub async fn upload_image(file: File, patient_id: Option<i64>) -> Result<ImageUploadResponse, ApiError> {
    let data = FormData::new().map_err(|e| ApiError::Encode(format!("{:?}", e)))?;
    data.append_with_blob_and_filename("file", &file, &file.name())
        .map_err(|e| ApiError::Encode(format!("{:?}", e)))?;
    let query = patient_id
        .map(|id| vec![("patient_id", id.to_string())])
        .unwrap_or_default();
    super::post_multipart("/upload/image", query, data).await
}
