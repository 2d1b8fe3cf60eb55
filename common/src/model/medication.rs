use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provenance of a medication record.
///
/// Serialized in lowercase (`"manual"`, `"photo"`, `"pharmacy"`, `"emr"`), which is
/// also the representation stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MedicationSource {
    #[default]
    Manual,
    /// Extracted by OCR from an uploaded photo.
    Photo,
    Pharmacy,
    Emr,
}

impl MedicationSource {
    pub const ALL: [MedicationSource; 4] = [
        MedicationSource::Manual,
        MedicationSource::Photo,
        MedicationSource::Pharmacy,
        MedicationSource::Emr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationSource::Manual => "manual",
            MedicationSource::Photo => "photo",
            MedicationSource::Pharmacy => "pharmacy",
            MedicationSource::Emr => "emr",
        }
    }

    /// Human readable label used by charts and badges.
    pub fn label(&self) -> &'static str {
        match self {
            MedicationSource::Manual => "Manual Entry",
            MedicationSource::Photo => "Photo OCR",
            MedicationSource::Pharmacy => "Pharmacy",
            MedicationSource::Emr => "EMR System",
        }
    }
}

impl fmt::Display for MedicationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown medication source '{0}'")]
pub struct UnknownSource(pub String);

impl FromStr for MedicationSource {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MedicationSource::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: i64,
    pub patient_id: i64,
    pub name: String,
    pub generic_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub source: MedicationSource,
    /// National Drug Code.
    pub ndc_number: Option<String>,
    pub last_filled: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub notes: Option<String>,
    pub image_path: Option<String>,
    /// OCR confidence in percent (0..=100), only meaningful for `Photo` records.
    pub ocr_confidence: Option<u8>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Medication {
    /// Case-insensitive match against name, generic name, NDC number or source,
    /// mirroring the medication list search box.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let contains = |value: Option<&str>| value.is_some_and(|v| v.to_lowercase().contains(&term));

        self.name.to_lowercase().contains(&term)
            || contains(self.generic_name.as_deref())
            || contains(self.ndc_number.as_deref())
            || self.source.as_str().contains(&term)
    }
}

/// The reduced medication view embedded in a reconciliation detail response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationBrief {
    pub id: i64,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub source: MedicationSource,
}

impl From<&Medication> for MedicationBrief {
    fn from(m: &Medication) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            dosage: m.dosage.clone(),
            frequency: m.frequency.clone(),
            source: m.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_uses_lowercase_wire_names() {
        let json = serde_json::to_string(&MedicationSource::Emr).unwrap();
        assert_eq!(json, "\"emr\"");
        let parsed: MedicationSource = serde_json::from_str("\"photo\"").unwrap();
        assert_eq!(parsed, MedicationSource::Photo);
        assert_eq!("Pharmacy".parse::<MedicationSource>(), Ok(MedicationSource::Pharmacy));
        assert!("fax".parse::<MedicationSource>().is_err());
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let med: Medication = serde_json::from_str(
            r#"{"id":1,"patient_id":2,"name":"Metformin","generic_name":null,"dosage":"500mg",
                "frequency":null,"source":"manual","ndc_number":null,"last_filled":"2024-03-01",
                "notes":null,"image_path":null,"ocr_confidence":null}"#,
        )
        .unwrap();
        assert!(med.is_active);
        assert_eq!(med.last_filled, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(med.matches("metf"));
        assert!(med.matches("MANUAL"));
        assert!(!med.matches("insulin"));
    }
}
