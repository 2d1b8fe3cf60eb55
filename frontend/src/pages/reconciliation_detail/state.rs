use common::model::medication::Medication;
use common::model::reconciliation::ReconciliationDetail;
use common::review::{detect_conflicts, Conflict, ReviewSession};

use crate::pages::medications::form::MedicationForm;

pub struct ReconciliationDetailPage {
    pub detail: Option<ReconciliationDetail>,
    /// Every medication of the patient, the set under review.
    pub medications: Vec<Medication>,
    pub loading: bool,
    pub error: Option<String>,
    pub review: ReviewSession,
    pub editing: Option<i64>,
    pub edit_form: MedicationForm,
    pub edit_error: Option<String>,
    pub saving_edit: bool,
    pub notes: String,
    pub completing: bool,
    pub action_error: Option<String>,
}

impl ReconciliationDetailPage {
    pub fn new() -> Self {
        Self {
            detail: None,
            medications: Vec::new(),
            loading: true,
            error: None,
            review: ReviewSession::new(),
            editing: None,
            edit_form: MedicationForm::default(),
            edit_error: None,
            saving_edit: false,
            notes: String::new(),
            completing: false,
            action_error: None,
        }
    }

    /// Conflicts recorded with the decision, or freshly computed for an
    /// undecided medication.
    pub fn conflicts_for(&self, medication: &Medication) -> Vec<Conflict> {
        match self.review.review(medication.id) {
            Some(review) => review.conflicts.clone(),
            None => detect_conflicts(medication, &self.medications),
        }
    }

    pub fn can_complete(&self) -> bool {
        let open = self
            .detail
            .as_ref()
            .is_some_and(|d| d.reconciliation.status.is_active());
        open && !self.completing && self.review.can_complete(self.medications.len())
    }
}
