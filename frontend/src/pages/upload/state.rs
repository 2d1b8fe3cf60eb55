use common::model::patient::Patient;
use common::model::upload::{ImageUploadResponse, SuggestedMedication};
use common::requests::MedicationCreate;
use gloo_file::ObjectUrl;
use web_sys::File;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuggestionField {
    Name,
    Dosage,
    Frequency,
}

/// An OCR suggestion under review; only approved ones are saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewedSuggestion {
    pub suggestion: SuggestedMedication,
    pub approved: bool,
}

impl ReviewedSuggestion {
    pub fn new(suggestion: SuggestedMedication) -> Self {
        Self {
            suggestion,
            approved: false,
        }
    }

    pub fn set(&mut self, field: SuggestionField, value: String) {
        match field {
            SuggestionField::Name => self.suggestion.name = value,
            SuggestionField::Dosage => self.suggestion.dosage = value,
            SuggestionField::Frequency => self.suggestion.frequency = value,
        }
    }
}

pub struct UploadPage {
    pub patients: Vec<Patient>,
    pub patient_id: Option<i64>,
    pub file: Option<File>,
    /// Object URL of the picked image; revoked when dropped.
    pub preview: Option<ObjectUrl>,
    pub dragging: bool,
    pub processing: bool,
    pub response: Option<ImageUploadResponse>,
    pub suggestions: Vec<ReviewedSuggestion>,
    pub saving: bool,
    pub error: Option<String>,
}

impl UploadPage {
    pub fn new() -> Self {
        Self {
            patients: Vec::new(),
            patient_id: None,
            file: None,
            preview: None,
            dragging: false,
            processing: false,
            response: None,
            suggestions: Vec::new(),
            saving: false,
            error: None,
        }
    }

    pub fn confidence(&self) -> u8 {
        self.response
            .as_ref()
            .and_then(|r| r.ocr_result.as_ref())
            .map(|r| r.confidence)
            .unwrap_or(0)
    }

    /// Create payloads of the approved, named suggestions.
    pub fn approved_medications(&self, patient_id: i64) -> Vec<MedicationCreate> {
        let image_path = self.response.as_ref().map(|r| r.file_path.clone());
        self.suggestions
            .iter()
            .filter(|s| s.approved && !s.suggestion.name.trim().is_empty())
            .map(|s| s.suggestion.to_create(patient_id, self.confidence(), image_path.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::upload::OcrResult;

    fn suggestion(name: &str) -> SuggestedMedication {
        SuggestedMedication {
            name: name.to_string(),
            dosage: "5mg".to_string(),
            frequency: "twice daily".to_string(),
            raw_text: format!("{} 5mg twice daily", name),
        }
    }

    #[test]
    fn only_approved_named_suggestions_are_saved() {
        let mut page = UploadPage::new();
        page.response = Some(ImageUploadResponse {
            filename: "a.png".to_string(),
            file_path: "/uploads/a.png".to_string(),
            ocr_result: Some(OcrResult {
                text: String::new(),
                confidence: 72,
                suggested_medications: Vec::new(),
            }),
        });
        page.suggestions = vec![
            ReviewedSuggestion::new(suggestion("Amlodipine")),
            ReviewedSuggestion::new(suggestion("Warfarin")),
            ReviewedSuggestion::new(suggestion("Zoloft")),
        ];
        page.suggestions[0].approved = true;
        page.suggestions[2].approved = true;
        page.suggestions[2].set(SuggestionField::Name, " ".to_string());

        let creates = page.approved_medications(9);
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].name, "Amlodipine");
        assert_eq!(creates[0].ocr_confidence, Some(72));
        assert_eq!(creates[0].image_path.as_deref(), Some("/uploads/a.png"));
    }
}
