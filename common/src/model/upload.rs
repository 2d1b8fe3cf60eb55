use crate::model::medication::MedicationSource;
use crate::requests::{MedicationCreate, non_blank};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest image the upload form accepts.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("Invalid file type. Allowed types: image/jpeg, image/png, image/gif")]
    InvalidType,
    #[error("File too large")]
    TooLarge,
}

/// Checks a picked file before it is sent.
pub fn check_upload(content_type: &str, size: u64) -> Result<(), UploadRejection> {
    if !ACCEPTED_IMAGE_TYPES.contains(&content_type) {
        return Err(UploadRejection::InvalidType);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge);
    }
    Ok(())
}

/// A medication candidate extracted from one line of OCR text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuggestedMedication {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    /// The OCR line the suggestion was parsed from.
    #[serde(default)]
    pub raw_text: String,
}

impl SuggestedMedication {
    /// The medication a reviewed suggestion becomes once it is approved.
    pub fn to_create(&self, patient_id: i64, confidence: u8, image_path: Option<String>) -> MedicationCreate {
        MedicationCreate {
            patient_id,
            name: self.name.trim().to_string(),
            dosage: non_blank(&self.dosage),
            frequency: non_blank(&self.frequency),
            source: MedicationSource::Photo,
            notes: Some(format!("OCR extracted from image. Raw text: {}", self.raw_text)),
            image_path,
            ocr_confidence: Some(confidence.min(100)),
            ..MedicationCreate::default()
        }
    }
}

/// Ephemeral OCR output for a single uploaded image. It is never stored; the
/// frontend uses it once to prefill medication forms.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrResult {
    pub text: String,
    /// Mean word confidence in percent.
    pub confidence: u8,
    pub suggested_medications: Vec<SuggestedMedication>,
}

/// Response of `POST /upload/image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    pub filename: String,
    /// Public path of the stored image, e.g. `/uploads/<filename>`.
    pub file_path: String,
    pub ocr_result: Option<OcrResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_check_rejects_type_before_size() {
        assert_eq!(check_upload("image/png", 1024), Ok(()));
        assert_eq!(check_upload("image/png", MAX_UPLOAD_BYTES), Ok(()));
        assert_eq!(check_upload("image/png", MAX_UPLOAD_BYTES + 1), Err(UploadRejection::TooLarge));
        assert_eq!(check_upload("application/pdf", 10), Err(UploadRejection::InvalidType));
        assert_eq!(check_upload("image/webp", MAX_UPLOAD_BYTES * 2), Err(UploadRejection::InvalidType));
    }

    #[test]
    fn approved_suggestion_becomes_photo_medication() {
        let suggestion = SuggestedMedication {
            name: " Lisinopril ".to_string(),
            dosage: "10mg".to_string(),
            frequency: String::new(),
            raw_text: "Lisinopril 10mg tablet".to_string(),
        };
        let create = suggestion.to_create(4, 87, Some("/uploads/a.png".to_string()));
        assert_eq!(create.patient_id, 4);
        assert_eq!(create.name, "Lisinopril");
        assert_eq!(create.dosage.as_deref(), Some("10mg"));
        assert_eq!(create.frequency, None);
        assert_eq!(create.source, MedicationSource::Photo);
        assert_eq!(create.ocr_confidence, Some(87));
        assert_eq!(
            create.notes.as_deref(),
            Some("OCR extracted from image. Raw text: Lisinopril 10mg tablet")
        );
    }
}
