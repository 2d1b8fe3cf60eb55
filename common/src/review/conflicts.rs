use crate::model::medication::{Medication, MedicationSource};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Photo-sourced medications below this OCR confidence need manual verification.
pub const OCR_CONFIDENCE_THRESHOLD: u8 = 80;

/// A potential issue found on a medication during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conflict {
    MissingDosageOrFrequency,
    LowOcrConfidence,
    MissingLastFilled,
    PossibleDuplicate,
}

impl Conflict {
    pub fn message(&self) -> &'static str {
        match self {
            Conflict::MissingDosageOrFrequency => "Missing dosage or frequency information",
            Conflict::LowOcrConfidence => "Low OCR confidence - manual verification recommended",
            Conflict::MissingLastFilled => "No last filled date available",
            Conflict::PossibleDuplicate => "Potential duplicate medication detected",
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Runs the review heuristics for `medication` against the patient's full
/// medication list. The result is recomputed on demand and never stored.
pub fn detect_conflicts(medication: &Medication, patient_medications: &[Medication]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    if is_blank(medication.dosage.as_deref()) || is_blank(medication.frequency.as_deref()) {
        conflicts.push(Conflict::MissingDosageOrFrequency);
    }

    if medication.source == MedicationSource::Photo
        && medication
            .ocr_confidence
            .is_none_or(|c| c < OCR_CONFIDENCE_THRESHOLD)
    {
        conflicts.push(Conflict::LowOcrConfidence);
    }

    if medication.last_filled.is_none() {
        conflicts.push(Conflict::MissingLastFilled);
    }

    let name = medication.name.trim().to_lowercase();
    let duplicated = patient_medications
        .iter()
        .any(|other| other.id != medication.id && other.name.trim().to_lowercase() == name);
    if duplicated {
        conflicts.push(Conflict::PossibleDuplicate);
    }

    conflicts
}
