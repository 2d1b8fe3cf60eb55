use crate::model::medication::MedicationBrief;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a reconciliation session.
///
/// Sessions are created `InProgress` by the backend and move to `Completed`
/// through the explicit completion action. `Pending` and `Cancelled` are set
/// only through a regular update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl ReconciliationStatus {
    pub const ALL: [ReconciliationStatus; 4] = [
        ReconciliationStatus::Pending,
        ReconciliationStatus::InProgress,
        ReconciliationStatus::Completed,
        ReconciliationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReconciliationStatus::Pending => "pending",
            ReconciliationStatus::InProgress => "in_progress",
            ReconciliationStatus::Completed => "completed",
            ReconciliationStatus::Cancelled => "cancelled",
        }
    }

    /// `"in progress"` style label for badges.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Pending and in-progress sessions still need a clinician.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ReconciliationStatus::Pending | ReconciliationStatus::InProgress
        )
    }
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reconciliation status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ReconciliationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReconciliationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub id: i64,
    pub patient_id: i64,
    pub provider_id: i64,
    pub status: ReconciliationStatus,
    pub total_medications: u32,
    pub approved_medications: u32,
    pub conflicts_found: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Reconciliation {
    /// Timestamp used for activity feeds: completion time when known, creation time otherwise.
    pub fn activity_time(&self) -> DateTime<Utc> {
        self.completed_at.unwrap_or(self.created_at)
    }
}

/// Response of `GET /reconciliations/{id}`: the session plus the names and the
/// active medications needed to render the review screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationDetail {
    pub reconciliation: Reconciliation,
    pub patient_name: String,
    pub provider_name: String,
    pub medications: Vec<MedicationBrief>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_snake_case() {
        assert_eq!(
            serde_json::to_string(&ReconciliationStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            "cancelled".parse::<ReconciliationStatus>(),
            Ok(ReconciliationStatus::Cancelled)
        );
        assert!("done".parse::<ReconciliationStatus>().is_err());
        assert_eq!(ReconciliationStatus::InProgress.label(), "in progress");
    }
}
