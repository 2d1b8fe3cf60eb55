//! Reconciliation review: heuristic conflict checks and the per-session
//! approve/reject bookkeeping behind the detail screen.

pub mod conflicts;
pub mod session;

pub use conflicts::{Conflict, OCR_CONFIDENCE_THRESHOLD, detect_conflicts};
pub use session::{MedicationReview, ReviewSession};
