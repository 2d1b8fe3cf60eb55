//! Add/edit form model for a medication, shared by the medication list and
//! the reconciliation review.

use common::model::medication::{Medication, MedicationSource};
use common::requests::{non_blank, MedicationCreate, MedicationUpdate};
use common::validation::{Validate, ValidationError};
use yew::prelude::*;

use crate::helpers::{format_date, input_value, parse_date, select_value, textarea_value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MedicationField {
    Patient,
    Name,
    GenericName,
    Dosage,
    Frequency,
    Source,
    NdcNumber,
    LastFilled,
    Notes,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MedicationForm {
    pub patient_id: String,
    pub name: String,
    pub generic_name: String,
    pub dosage: String,
    pub frequency: String,
    pub source: MedicationSource,
    pub ndc_number: String,
    pub last_filled: String,
    pub notes: String,
}

impl MedicationForm {
    pub fn for_patient(patient_id: Option<i64>) -> Self {
        Self {
            patient_id: patient_id.map(|id| id.to_string()).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn from_medication(medication: &Medication) -> Self {
        Self {
            patient_id: medication.patient_id.to_string(),
            name: medication.name.clone(),
            generic_name: medication.generic_name.clone().unwrap_or_default(),
            dosage: medication.dosage.clone().unwrap_or_default(),
            frequency: medication.frequency.clone().unwrap_or_default(),
            source: medication.source,
            ndc_number: medication.ndc_number.clone().unwrap_or_default(),
            last_filled: format_date(medication.last_filled),
            notes: medication.notes.clone().unwrap_or_default(),
        }
    }

    pub fn set(&mut self, field: MedicationField, value: String) {
        match field {
            MedicationField::Patient => self.patient_id = value,
            MedicationField::Name => self.name = value,
            MedicationField::GenericName => self.generic_name = value,
            MedicationField::Dosage => self.dosage = value,
            MedicationField::Frequency => self.frequency = value,
            MedicationField::Source => self.source = value.parse().unwrap_or_default(),
            MedicationField::NdcNumber => self.ndc_number = value,
            MedicationField::LastFilled => self.last_filled = value,
            MedicationField::Notes => self.notes = value,
        }
    }

    pub fn to_create(&self) -> Result<MedicationCreate, ValidationError> {
        let create = MedicationCreate {
            patient_id: self.patient_id.trim().parse().unwrap_or(0),
            name: self.name.trim().to_string(),
            generic_name: non_blank(&self.generic_name),
            dosage: non_blank(&self.dosage),
            frequency: non_blank(&self.frequency),
            source: self.source,
            ndc_number: non_blank(&self.ndc_number),
            last_filled: parse_date(&self.last_filled),
            notes: non_blank(&self.notes),
            image_path: None,
            ocr_confidence: None,
        };
        create.validate()?;
        Ok(create)
    }

    /// Sends every editable field; blank text clears it. An empty date is
    /// left out because a fill date cannot be removed once recorded.
    pub fn to_update(&self) -> Result<MedicationUpdate, ValidationError> {
        let update = MedicationUpdate {
            name: Some(self.name.trim().to_string()),
            generic_name: Some(self.generic_name.trim().to_string()),
            dosage: Some(self.dosage.trim().to_string()),
            frequency: Some(self.frequency.trim().to_string()),
            source: Some(self.source),
            ndc_number: Some(self.ndc_number.trim().to_string()),
            last_filled: parse_date(&self.last_filled),
            notes: Some(self.notes.trim().to_string()),
            is_active: None,
        };
        update.validate()?;
        Ok(update)
    }

    /// Input rows for the fields a reviewer may correct.
    pub fn review_fields(&self, on_change: &Callback<(MedicationField, String)>) -> Html {
        html! {
            <div class="form-row">
                { text_input(on_change, MedicationField::Dosage, "Dosage", "e.g., 10 mg", &self.dosage, "text") }
                { text_input(on_change, MedicationField::Frequency, "Frequency", "e.g., Once daily", &self.frequency, "text") }
                { text_input(on_change, MedicationField::LastFilled, "Last filled", "", &self.last_filled, "date") }
            </div>
        }
    }

    /// The full add/edit form body, without buttons.
    pub fn fields(
        &self,
        patients: &[(i64, String)],
        on_change: &Callback<(MedicationField, String)>,
    ) -> Html {
        let on_patient = on_change.reform(|e: Event| (MedicationField::Patient, select_value(e)));
        let on_source = on_change.reform(|e: Event| (MedicationField::Source, select_value(e)));
        let on_notes = on_change.reform(|e: InputEvent| (MedicationField::Notes, textarea_value(e)));

        html! {
            <>
                <label class="field">
                    <span>{"Patient *"}</span>
                    <select onchange={on_patient}>
                        <option value="" selected={self.patient_id.is_empty()}>{"Select a patient"}</option>
                        { for patients.iter().map(|(id, name)| html! {
                            <option value={id.to_string()} selected={self.patient_id == id.to_string()}>
                                { name }
                            </option>
                        }) }
                    </select>
                </label>
                <div class="form-row">
                    { text_input(on_change, MedicationField::Name, "Medication name *", "e.g., Lisinopril", &self.name, "text") }
                    { text_input(on_change, MedicationField::GenericName, "Generic name", "e.g., lisinopril", &self.generic_name, "text") }
                </div>
                <div class="form-row">
                    { text_input(on_change, MedicationField::Dosage, "Dosage", "e.g., 10 mg", &self.dosage, "text") }
                    { text_input(on_change, MedicationField::Frequency, "Frequency", "e.g., Once daily", &self.frequency, "text") }
                </div>
                <div class="form-row">
                    <label class="field">
                        <span>{"Source"}</span>
                        <select onchange={on_source}>
                            { for MedicationSource::ALL.iter().map(|source| html! {
                                <option value={source.as_str()} selected={*source == self.source}>
                                    { source.label() }
                                </option>
                            }) }
                        </select>
                    </label>
                    { text_input(on_change, MedicationField::NdcNumber, "NDC number", "e.g., 0093-7663-56", &self.ndc_number, "text") }
                </div>
                { text_input(on_change, MedicationField::LastFilled, "Last filled", "", &self.last_filled, "date") }
                <label class="field">
                    <span>{"Notes"}</span>
                    <textarea rows="3"
                              placeholder="Additional notes or instructions…"
                              value={self.notes.clone()}
                              oninput={on_notes} />
                </label>
            </>
        }
    }
}

fn text_input(
    on_change: &Callback<(MedicationField, String)>,
    field: MedicationField,
    label: &'static str,
    placeholder: &'static str,
    value: &str,
    kind: &'static str,
) -> Html {
    html! {
        <label class="field">
            <span>{ label }</span>
            <input type={kind}
                   placeholder={placeholder}
                   value={value.to_string()}
                   oninput={on_change.reform(move |e: InputEvent| (field, input_value(e)))} />
        </label>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn create_requires_a_patient_and_a_name() {
        let mut form = MedicationForm::default();
        form.set(MedicationField::Name, "Metformin".to_string());
        assert_eq!(form.to_create(), Err(ValidationError::Required("Patient")));

        form.set(MedicationField::Patient, "12".to_string());
        form.set(MedicationField::Name, "  ".to_string());
        assert_eq!(form.to_create(), Err(ValidationError::Required("Medication name")));
    }

    #[test]
    fn create_parses_source_and_date() {
        let mut form = MedicationForm::for_patient(Some(5));
        form.set(MedicationField::Name, "Metformin".to_string());
        form.set(MedicationField::Source, "pharmacy".to_string());
        form.set(MedicationField::LastFilled, "2024-01-31".to_string());
        let create = form.to_create().unwrap();
        assert_eq!(create.patient_id, 5);
        assert_eq!(create.source, MedicationSource::Pharmacy);
        assert_eq!(create.last_filled, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(create.dosage, None);
    }

    #[test]
    fn unknown_source_falls_back_to_manual() {
        let mut form = MedicationForm::default();
        form.set(MedicationField::Source, "fax".to_string());
        assert_eq!(form.source, MedicationSource::Manual);
    }

    #[test]
    fn update_keeps_date_when_left_empty() {
        let mut form = MedicationForm::for_patient(Some(1));
        form.set(MedicationField::Name, "Aspirin".to_string());
        let update = form.to_update().unwrap();
        assert_eq!(update.last_filled, None);
        assert_eq!(update.dosage.as_deref(), Some(""));
    }
}
