use crate::model::medication::Medication;
use crate::requests::{ReconciliationUpdate, non_blank};
use crate::review::conflicts::{Conflict, detect_conflicts};
use std::collections::BTreeMap;

/// The clinician's decision on one medication within a review session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MedicationReview {
    pub approved: bool,
    /// The medication was edited during this review.
    pub modified: bool,
    /// Conflicts computed when the decision was recorded.
    pub conflicts: Vec<Conflict>,
    pub notes: String,
}

/// Local, unsaved state of a reconciliation review keyed by medication id.
///
/// Only the aggregated counts leave the browser, through [`ReviewSession::completion_update`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReviewSession {
    reviews: BTreeMap<i64, MedicationReview>,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an approve/reject decision and refreshes the medication's conflicts.
    /// Deciding again overwrites the previous decision but keeps notes and the
    /// modified flag.
    pub fn record_decision(&mut self, medication: &Medication, all: &[Medication], approved: bool) {
        let conflicts = detect_conflicts(medication, all);
        let review = self.reviews.entry(medication.id).or_default();
        review.approved = approved;
        review.conflicts = conflicts;
    }

    /// Flags a medication as edited. Editing alone does not count as reviewed.
    pub fn mark_modified(&mut self, medication_id: i64) {
        if let Some(review) = self.reviews.get_mut(&medication_id) {
            review.modified = true;
        }
    }

    /// Notes only attach to a medication that already has a decision.
    pub fn set_notes(&mut self, medication_id: i64, notes: String) {
        if let Some(review) = self.reviews.get_mut(&medication_id) {
            review.notes = notes;
        }
    }

    pub fn review(&self, medication_id: i64) -> Option<&MedicationReview> {
        self.reviews.get(&medication_id)
    }

    pub fn reviewed_count(&self) -> usize {
        self.reviews.len()
    }

    pub fn approved_count(&self) -> usize {
        self.reviews.values().filter(|r| r.approved).count()
    }

    pub fn total_conflicts(&self) -> usize {
        self.reviews.values().map(|r| r.conflicts.len()).sum()
    }

    /// A session can be completed once every medication has a decision.
    pub fn can_complete(&self, total_medications: usize) -> bool {
        self.reviewed_count() >= total_medications
    }

    /// Reviewed and approved shares of `total_medications`, as percentages.
    pub fn progress(&self, total_medications: usize) -> (f64, f64) {
        if total_medications == 0 {
            return (0.0, 0.0);
        }
        let total = total_medications as f64;
        (
            self.reviewed_count() as f64 / total * 100.0,
            self.approved_count() as f64 / total * 100.0,
        )
    }

    /// The statistics update sent right before the session is completed.
    /// Per-medication notes follow the session notes as `Name: note` lines.
    pub fn completion_update(&self, notes: &str, medications: &[Medication]) -> ReconciliationUpdate {
        let mut lines: Vec<String> = non_blank(notes).into_iter().collect();
        for medication in medications {
            if let Some(note) = self.reviews.get(&medication.id).and_then(|r| non_blank(&r.notes)) {
                lines.push(format!("{}: {}", medication.name, note));
            }
        }
        ReconciliationUpdate {
            status: None,
            notes: non_blank(&lines.join("\n")),
            approved_medications: Some(self.approved_count() as u32),
            conflicts_found: Some(self.total_conflicts() as u32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::medication::MedicationSource;

    fn med(id: i64, name: &str, dosage: Option<&str>) -> Medication {
        Medication {
            id,
            patient_id: 4,
            name: name.to_string(),
            generic_name: None,
            dosage: dosage.map(str::to_string),
            frequency: Some("Twice daily".to_string()),
            source: MedicationSource::Pharmacy,
            ndc_number: None,
            last_filled: chrono::NaiveDate::from_ymd_opt(2024, 5, 1),
            is_active: true,
            notes: None,
            image_path: None,
            ocr_confidence: None,
            created_at: None,
        }
    }

    #[test]
    fn counts_follow_latest_decision() {
        let meds = vec![med(1, "Warfarin", Some("5mg")), med(2, "Digoxin", None)];
        let mut session = ReviewSession::new();

        session.record_decision(&meds[0], &meds, true);
        assert!(!session.can_complete(meds.len()));

        session.record_decision(&meds[1], &meds, true);
        session.record_decision(&meds[1], &meds, false);

        assert_eq!(session.reviewed_count(), 2);
        assert_eq!(session.approved_count(), 1);
        assert_eq!(session.total_conflicts(), 1);
        assert!(session.can_complete(meds.len()));
        assert_eq!(session.progress(meds.len()), (100.0, 50.0));
    }

    #[test]
    fn completion_update_carries_counts_and_trimmed_notes() {
        let meds = vec![med(1, "Warfarin", None)];
        let mut session = ReviewSession::new();
        session.record_decision(&meds[0], &meds, true);
        session.mark_modified(1);

        let update = session.completion_update("  checked with pharmacy ", &meds);
        assert_eq!(update.approved_medications, Some(1));
        assert_eq!(update.conflicts_found, Some(1));
        assert_eq!(update.notes.as_deref(), Some("checked with pharmacy"));
        assert!(session.review(1).is_some_and(|r| r.modified));
        assert_eq!(session.completion_update("", &meds).notes, None);
    }

    #[test]
    fn medication_notes_are_appended_to_completion_notes() {
        let meds = vec![med(1, "Warfarin", Some("5mg")), med(2, "Digoxin", Some("125mcg"))];
        let mut session = ReviewSession::new();
        session.set_notes(1, "ignored before a decision".to_string());
        assert_eq!(session.review(1), None);

        session.record_decision(&meds[0], &meds, true);
        session.record_decision(&meds[1], &meds, false);
        session.set_notes(1, " INR due next week ".to_string());
        session.set_notes(2, "  ".to_string());
        session.record_decision(&meds[0], &meds, false);

        let update = session.completion_update("reviewed", &meds);
        assert_eq!(update.notes.as_deref(), Some("reviewed\nWarfarin: INR due next week"));
        assert_eq!(
            session.completion_update("", &meds).notes.as_deref(),
            Some("Warfarin: INR due next week")
        );
    }

    #[test]
    fn empty_list_reports_zero_progress() {
        let session = ReviewSession::new();
        assert_eq!(session.progress(0), (0.0, 0.0));
        assert!(session.can_complete(0));
    }
}
