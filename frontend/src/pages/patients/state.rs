use chrono::NaiveDate;
use common::model::patient::Patient;
use common::requests::{non_blank, PatientCreate, PatientUpdate};
use common::validation::ValidationError;

use super::messages::PatientField;
use crate::helpers::{format_date, parse_date};

/// Raw values of the add/edit form, exactly as typed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatientForm {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub phone: String,
    pub email: String,
    pub mrn: String,
}

impl PatientForm {
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            date_of_birth: format_date(Some(patient.date_of_birth)),
            phone: patient.phone.clone().unwrap_or_default(),
            email: patient.email.clone().unwrap_or_default(),
            mrn: patient.mrn.clone().unwrap_or_default(),
        }
    }

    pub fn set(&mut self, field: PatientField, value: String) {
        let slot = match field {
            PatientField::FirstName => &mut self.first_name,
            PatientField::LastName => &mut self.last_name,
            PatientField::DateOfBirth => &mut self.date_of_birth,
            PatientField::Phone => &mut self.phone,
            PatientField::Email => &mut self.email,
            PatientField::Mrn => &mut self.mrn,
        };
        *slot = value;
    }

    fn birth_date(&self) -> Result<NaiveDate, ValidationError> {
        parse_date(&self.date_of_birth).ok_or(ValidationError::Required("Date of birth"))
    }

    pub fn to_create(&self) -> Result<PatientCreate, ValidationError> {
        Ok(PatientCreate {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth: self.birth_date()?,
            phone: non_blank(&self.phone),
            email: non_blank(&self.email),
            mrn: non_blank(&self.mrn),
        })
    }

    /// Every field is sent; a blank optional field clears the stored value.
    pub fn to_update(&self) -> Result<PatientUpdate, ValidationError> {
        Ok(PatientUpdate {
            first_name: Some(self.first_name.trim().to_string()),
            last_name: Some(self.last_name.trim().to_string()),
            date_of_birth: Some(self.birth_date()?),
            phone: Some(self.phone.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            mrn: Some(self.mrn.trim().to_string()),
        })
    }
}

pub struct PatientsPage {
    pub patients: Vec<Patient>,
    pub loading: bool,
    pub error: Option<String>,
    pub search: String,
    pub form: PatientForm,
    pub form_open: bool,
    /// Id of the patient being edited; `None` while adding.
    pub editing: Option<i64>,
    pub form_error: Option<String>,
    pub saving: bool,
}

impl PatientsPage {
    pub fn new() -> Self {
        Self {
            patients: Vec::new(),
            loading: true,
            error: None,
            search: String::new(),
            form: PatientForm::default(),
            form_open: false,
            editing: None,
            form_error: None,
            saving: false,
        }
    }

    pub fn filtered(&self) -> Vec<&Patient> {
        self.patients.iter().filter(|p| p.matches(&self.search)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> PatientForm {
        PatientForm {
            first_name: " Grace ".to_string(),
            last_name: "Hopper".to_string(),
            date_of_birth: "1906-12-09".to_string(),
            phone: String::new(),
            email: "grace@navy.mil".to_string(),
            mrn: "  ".to_string(),
        }
    }

    #[test]
    fn create_payload_trims_and_drops_blanks() {
        let create = filled().to_create().unwrap();
        assert_eq!(create.first_name, "Grace");
        assert_eq!(create.date_of_birth, NaiveDate::from_ymd_opt(1906, 12, 9).unwrap());
        assert_eq!(create.phone, None);
        assert_eq!(create.mrn, None);
        assert_eq!(create.email.as_deref(), Some("grace@navy.mil"));
    }

    #[test]
    fn update_payload_sends_blanks_to_clear() {
        let update = filled().to_update().unwrap();
        assert_eq!(update.phone.as_deref(), Some(""));
        assert_eq!(update.mrn.as_deref(), Some(""));
    }

    #[test]
    fn missing_birth_date_is_reported() {
        let mut form = filled();
        form.set(PatientField::DateOfBirth, String::new());
        assert_eq!(form.to_create(), Err(ValidationError::Required("Date of birth")));
    }

    #[test]
    fn editing_starts_from_stored_values() {
        let patient = Patient {
            id: 3,
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1912, 6, 23).unwrap(),
            phone: Some("555-0100".to_string()),
            email: None,
            mrn: None,
            created_at: None,
        };
        let form = PatientForm::from_patient(&patient);
        assert_eq!(form.date_of_birth, "1912-06-23");
        assert_eq!(form.phone, "555-0100");
        assert_eq!(form.email, "");
    }
}
