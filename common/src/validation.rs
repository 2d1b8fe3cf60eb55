//! Required-field checks run by the forms before any request is issued, and
//! again by the API before anything is written.

use crate::requests::{
    LoginRequest, MedicationCreate, MedicationUpdate, PatientCreate, PatientUpdate,
    ReconciliationCreate, RegisterRequest,
};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

/// A provided value must not be blank; an absent one is fine.
fn required_if_present(value: Option<&str>, field: &'static str) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| required(v, field))
}

fn email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidEmail(value.to_string())),
    }
}

/// Checks the registration form's confirmation field, which never leaves the browser.
pub fn confirm_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        required(&self.username, "Email")?;
        required(&self.password, "Password")
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        required(&self.name, "Name")?;
        required(&self.email, "Email")?;
        email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        Ok(())
    }
}

impl Validate for PatientCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        required(&self.first_name, "First name")?;
        required(&self.last_name, "Last name")?;
        match self.email.as_deref().map(str::trim) {
            Some(e) if !e.is_empty() => email(e),
            _ => Ok(()),
        }
    }
}

impl Validate for PatientUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        required_if_present(self.first_name.as_deref(), "First name")?;
        required_if_present(self.last_name.as_deref(), "Last name")
    }
}

fn confidence(value: Option<u8>) -> Result<(), ValidationError> {
    match value {
        Some(c) if c > 100 => Err(ValidationError::OutOfRange {
            field: "OCR confidence",
            min: 0,
            max: 100,
        }),
        _ => Ok(()),
    }
}

impl Validate for MedicationCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.patient_id <= 0 {
            return Err(ValidationError::Required("Patient"));
        }
        required(&self.name, "Medication name")?;
        confidence(self.ocr_confidence)
    }
}

impl Validate for MedicationUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        required_if_present(self.name.as_deref(), "Medication name")
    }
}

impl Validate for ReconciliationCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.patient_id <= 0 {
            return Err(ValidationError::Required("Patient"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn patient(first_name: &str) -> PatientCreate {
        PatientCreate {
            first_name: first_name.to_string(),
            last_name: "Hopper".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1950, 12, 9).unwrap(),
            phone: None,
            email: None,
            mrn: None,
        }
    }

    #[test]
    fn patient_without_first_name_is_rejected() {
        assert_eq!(
            patient("   ").validate(),
            Err(ValidationError::Required("First name"))
        );
        assert!(patient("Grace").validate().is_ok());
    }

    #[test]
    fn patient_email_is_checked_only_when_given() {
        let mut p = patient("Grace");
        p.email = Some(String::new());
        assert!(p.validate().is_ok());
        p.email = Some("grace-at-navy".to_string());
        assert!(matches!(p.validate(), Err(ValidationError::InvalidEmail(_))));
    }

    #[test]
    fn register_requires_six_character_password() {
        let request = RegisterRequest {
            name: "Dr. Who".to_string(),
            email: "who@tardis.org".to_string(),
            password: "12345".to_string(),
            ..Default::default()
        };
        assert_eq!(request.validate(), Err(ValidationError::PasswordTooShort(6)));
        assert_eq!(
            confirm_password("secret1", "secret2"),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn medication_needs_patient_and_name() {
        let mut m = MedicationCreate {
            patient_id: 0,
            name: "Aspirin".to_string(),
            ..Default::default()
        };
        assert_eq!(m.validate(), Err(ValidationError::Required("Patient")));
        m.patient_id = 3;
        assert!(m.validate().is_ok());
        m.ocr_confidence = Some(101);
        assert!(matches!(m.validate(), Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn partial_updates_reject_blank_names_only() {
        assert!(PatientUpdate::default().validate().is_ok());
        let update = MedicationUpdate {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
