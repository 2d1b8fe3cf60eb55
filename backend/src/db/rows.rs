//! Column lists and row mappers shared by the resource services.

use common::model::medication::Medication;
use common::model::patient::Patient;
use common::model::reconciliation::Reconciliation;
use common::model::user::User;
use rusqlite::types::Type;
use rusqlite::Row;
use std::str::FromStr;

pub const USER_COLUMNS: &str =
    "id, name, email, license_number, specialty, practice_name, is_active";

pub const PATIENT_COLUMNS: &str =
    "id, first_name, last_name, date_of_birth, phone, email, mrn, created_at";

pub const MEDICATION_COLUMNS: &str = "id, patient_id, name, generic_name, dosage, frequency, \
     source, ndc_number, last_filled, is_active, notes, image_path, ocr_confidence, created_at";

pub const RECONCILIATION_COLUMNS: &str = "id, patient_id, provider_id, status, total_medications, \
     approved_medications, conflicts_found, notes, created_at, completed_at";

/// Reads a text column into an enum stored by its wire name.
fn parsed<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        license_number: row.get(3)?,
        specialty: row.get(4)?,
        practice_name: row.get(5)?,
        is_active: row.get(6)?,
    })
}

pub fn patient(row: &Row) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        mrn: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn medication(row: &Row) -> rusqlite::Result<Medication> {
    Ok(Medication {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        name: row.get(2)?,
        generic_name: row.get(3)?,
        dosage: row.get(4)?,
        frequency: row.get(5)?,
        source: parsed(row, 6)?,
        ndc_number: row.get(7)?,
        last_filled: row.get(8)?,
        is_active: row.get(9)?,
        notes: row.get(10)?,
        image_path: row.get(11)?,
        ocr_confidence: row.get(12)?,
        created_at: row.get(13)?,
    })
}

pub fn reconciliation(row: &Row) -> rusqlite::Result<Reconciliation> {
    Ok(Reconciliation {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        provider_id: row.get(2)?,
        status: parsed(row, 3)?,
        total_medications: row.get(4)?,
        approved_medications: row.get(5)?,
        conflicts_found: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
        completed_at: row.get(9)?,
    })
}
