use super::public_path;
use crate::auth::CurrentProvider;
use crate::db;
use crate::error::ApiError;
use crate::services::medications::insert_medication;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::model::medication::MedicationSource;
use common::model::upload::{ImageUploadResponse, OcrResult};
use common::requests::{non_blank, MedicationCreate, UploadQuery};
use futures_util::StreamExt;
use log::{info, warn};
use uuid::Uuid;

/// Accepted content types and the extension the stored file gets.
const ALLOWED_TYPES: [(&str, &str); 3] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
];

struct ImageUpload {
    extension: &'static str,
    bytes: Vec<u8>,
}

/// Handler for `POST /api/v1/upload/image`.
pub async fn process(
    state: web::Data<AppState>,
    _provider: CurrentProvider,
    query: web::Query<UploadQuery>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let upload = read_image(payload, state.settings.max_file_size).await?;
    let response = store_and_scan(&state, upload, query.patient_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Reads the `file` field, enforcing the type whitelist and the size limit.
async fn read_image(mut payload: Multipart, max_size: usize) -> Result<ImageUpload, ApiError> {
    let bad_multipart = |e: actix_multipart::MultipartError| ApiError::BadRequest(e.to_string());

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(bad_multipart)?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some("file") {
            continue;
        }

        let mime = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();
        let extension = ALLOWED_TYPES
            .iter()
            .find(|(allowed, _)| *allowed == mime)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                ApiError::BadRequest(
                    "Invalid file type. Allowed types: image/jpeg, image/png, image/gif".to_string(),
                )
            })?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(bad_multipart)?;
            if bytes.len() + chunk.len() > max_size {
                return Err(ApiError::BadRequest("File too large".to_string()));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(ImageUpload { extension, bytes });
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}

async fn store_and_scan(
    state: &AppState,
    upload: ImageUpload,
    patient_id: Option<i64>,
) -> Result<ImageUploadResponse, ApiError> {
    let filename = format!("{}.{}", Uuid::new_v4(), upload.extension);
    let upload_dir = &state.settings.upload_dir;
    tokio::fs::create_dir_all(upload_dir).await?;
    tokio::fs::write(upload_dir.join(&filename), &upload.bytes).await?;
    let file_path = public_path(&filename);

    let recognizer = state.recognizer.clone();
    let bytes = upload.bytes;
    let ocr_result = match web::block(move || recognizer.recognize(&bytes)).await {
        Ok(Ok(result)) => Some(result),
        Ok(Err(e)) => {
            warn!("OCR processing failed for {}: {}", filename, e);
            None
        }
        Err(e) => {
            warn!("OCR task for {} did not finish: {}", filename, e);
            None
        }
    };

    if let (Some(patient_id), Some(result)) = (patient_id, ocr_result.as_ref()) {
        save_suggestions(state, patient_id, result, &file_path)?;
    }

    Ok(ImageUploadResponse {
        filename,
        file_path,
        ocr_result,
    })
}

/// Stores each suggestion as a photo-sourced medication. Unknown patients are skipped.
fn save_suggestions(
    state: &AppState,
    patient_id: i64,
    result: &OcrResult,
    image_path: &str,
) -> Result<(), ApiError> {
    let conn = state.connect()?;
    if !db::exists(&conn, "patients", patient_id)? {
        return Ok(());
    }

    for suggestion in &result.suggested_medications {
        insert_medication(
            &conn,
            &MedicationCreate {
                patient_id,
                name: suggestion.name.clone(),
                dosage: non_blank(&suggestion.dosage),
                frequency: non_blank(&suggestion.frequency),
                source: MedicationSource::Photo,
                notes: Some(format!(
                    "Auto-extracted from image. Raw text: {}",
                    suggestion.raw_text
                )),
                image_path: Some(image_path.to_string()),
                ocr_confidence: Some(result.confidence),
                ..MedicationCreate::default()
            },
        )?;
    }
    info!(
        "Saved {} OCR suggestion(s) for patient {}",
        result.suggested_medications.len(),
        patient_id
    );
    Ok(())
}
