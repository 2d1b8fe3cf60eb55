use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Medical record number.
    pub mrn: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in whole years on `today`; a birthday later in the year does not count yet.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.date_of_birth.year();
        if (today.month(), today.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            age -= 1;
        }
        age
    }

    /// Case-insensitive match against name, MRN or email, as used by the patient search box.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.full_name().to_lowercase().contains(&term)
            || self
                .mrn
                .as_deref()
                .is_some_and(|mrn| mrn.to_lowercase().contains(&term))
            || self
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&term))
    }
}

/// Display name for a patient id, falling back to `Patient #<id>` when the
/// patient list does not contain it.
pub fn patient_name(patients: &[Patient], patient_id: i64) -> String {
    patients
        .iter()
        .find(|p| p.id == patient_id)
        .map(Patient::full_name)
        .unwrap_or_else(|| format!("Patient #{}", patient_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> Patient {
        Patient {
            id: 7,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 6, 15).unwrap(),
            phone: None,
            email: Some("ada@example.org".to_string()),
            mrn: Some("MRN-0042".to_string()),
            created_at: None,
        }
    }

    #[test]
    fn age_counts_birthday_only_once_reached() {
        let p = patient();
        assert_eq!(p.age_on(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()), 43);
        assert_eq!(p.age_on(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), 44);
    }

    #[test]
    fn search_matches_name_mrn_and_email() {
        let p = patient();
        assert!(p.matches("ada love"));
        assert!(p.matches("mrn-00"));
        assert!(p.matches("EXAMPLE.ORG"));
        assert!(p.matches("  "));
        assert!(!p.matches("babbage"));
    }

    #[test]
    fn unknown_patient_gets_placeholder_name() {
        let patients = vec![patient()];
        assert_eq!(patient_name(&patients, 7), "Ada Lovelace");
        assert_eq!(patient_name(&patients, 9), "Patient #9");
    }
}
