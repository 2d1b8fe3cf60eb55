//! Client-side aggregation behind the dashboard, analytics page and charts.
//!
//! Everything here is a pure pass over full list results; the caller supplies
//! the current local time so the functions stay deterministic. Percentages are
//! rounded to the nearest integer and an empty denominator yields 0.

use crate::model::medication::{Medication, MedicationSource};
use crate::model::patient::Patient;
use crate::model::reconciliation::{Reconciliation, ReconciliationStatus};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// Number of days covered by the reconciliation trend chart.
pub const TREND_DAYS: i64 = 7;
/// Number of weekly buckets in the performance chart.
pub const PERFORMANCE_WEEKS: i64 = 4;

/// `part / whole` as a rounded percentage; 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

fn local_date(at: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    at.with_timezone(offset).date_naive()
}

/// Midnight of `now`'s calendar day in `now`'s offset.
fn start_of_day(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let midnight = now.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default();
    now.offset()
        .from_local_datetime(&midnight)
        .single()
        .unwrap_or(now)
}

fn count_status(recs: &[Reconciliation], status: ReconciliationStatus) -> usize {
    recs.iter().filter(|r| r.status == status).count()
}

fn sum_conflicts<'a>(recs: impl IntoIterator<Item = &'a Reconciliation>) -> u32 {
    recs.into_iter().map(|r| r.conflicts_found).sum()
}

/// Headline numbers of the analytics page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_reconciliations: usize,
    pub completed_reconciliations: usize,
    pub completion_rate: u32,
    pub total_patients: usize,
    pub total_medications: usize,
    pub total_conflicts: u32,
    /// Share of photo-sourced medications.
    pub ocr_usage_rate: u32,
    pub manual_entry_rate: u32,
}

impl SummaryStats {
    pub fn compute(recs: &[Reconciliation], meds: &[Medication], patients: &[Patient]) -> Self {
        let completed = count_status(recs, ReconciliationStatus::Completed);
        let by_source =
            |source: MedicationSource| meds.iter().filter(|m| m.source == source).count();

        Self {
            total_reconciliations: recs.len(),
            completed_reconciliations: completed,
            completion_rate: percent(completed, recs.len()),
            total_patients: patients.len(),
            total_medications: meds.len(),
            total_conflicts: sum_conflicts(recs),
            ocr_usage_rate: percent(by_source(MedicationSource::Photo), meds.len()),
            manual_entry_rate: percent(by_source(MedicationSource::Manual), meds.len()),
        }
    }
}

/// Metric cards of the home dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardStats {
    pub total_patients: usize,
    pub total_medications: usize,
    pub active_reconciliations: usize,
    pub completed_today: usize,
    pub completed_this_week: usize,
    pub conflicts_found: u32,
    pub completion_rate: u32,
}

impl DashboardStats {
    pub fn compute(
        recs: &[Reconciliation],
        patients: &[Patient],
        meds: &[Medication],
        now: DateTime<FixedOffset>,
    ) -> Self {
        let today = start_of_day(now);
        let week_ago = today - Duration::days(7);
        let completed_since = |since: DateTime<FixedOffset>| {
            recs.iter()
                .filter(|r| r.status == ReconciliationStatus::Completed)
                .filter(|r| r.activity_time() >= since)
                .count()
        };
        let completed = count_status(recs, ReconciliationStatus::Completed);

        Self {
            total_patients: patients.len(),
            total_medications: meds.len(),
            active_reconciliations: recs.iter().filter(|r| r.status.is_active()).count(),
            completed_today: completed_since(today),
            completed_this_week: completed_since(week_ago),
            conflicts_found: sum_conflicts(recs),
            completion_rate: percent(completed, recs.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTrend {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub label: String,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub total: usize,
}

/// Reconciliations created on each of the last [`TREND_DAYS`] days, oldest first.
pub fn daily_trend(recs: &[Reconciliation], now: DateTime<FixedOffset>) -> Vec<DayTrend> {
    let offset = *now.offset();
    let today = now.date_naive();

    (0..TREND_DAYS)
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(days_back);
            let day: Vec<&Reconciliation> = recs
                .iter()
                .filter(|r| local_date(r.created_at, &offset) == date)
                .collect();
            let with = |status| day.iter().filter(|r| r.status == status).count();

            DayTrend {
                date,
                label: date.format("%a").to_string(),
                completed: with(ReconciliationStatus::Completed),
                in_progress: with(ReconciliationStatus::InProgress),
                pending: with(ReconciliationStatus::Pending),
                total: day.len(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceCount {
    pub source: MedicationSource,
    pub label: &'static str,
    pub count: usize,
}

/// Medication counts per source; sources with no medication are omitted.
pub fn source_distribution(meds: &[Medication]) -> Vec<SourceCount> {
    MedicationSource::ALL
        .into_iter()
        .map(|source| SourceCount {
            source,
            label: source.label(),
            count: meds.iter().filter(|m| m.source == source).count(),
        })
        .filter(|c| c.count > 0)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: ReconciliationStatus,
    pub count: usize,
}

pub fn status_distribution(recs: &[Reconciliation]) -> Vec<StatusCount> {
    ReconciliationStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: count_status(recs, status),
        })
        .filter(|c| c.count > 0)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekPerformance {
    pub label: String,
    pub completed: usize,
    pub conflicts: u32,
    /// `completed / (completed + conflicts)` in percent; 100 for a week with nothing completed.
    pub efficiency: u32,
}

/// Four consecutive seven-day windows, the last one ending at `now`, oldest first.
pub fn weekly_performance(recs: &[Reconciliation], now: DateTime<FixedOffset>) -> Vec<WeekPerformance> {
    (0..PERFORMANCE_WEEKS)
        .rev()
        .map(|weeks_back| {
            let start = now - Duration::days(weeks_back * 7 + 7);
            let end = start + Duration::days(7);
            let week: Vec<&Reconciliation> = recs
                .iter()
                .filter(|r| r.created_at >= start && r.created_at < end)
                .collect();
            let completed = week
                .iter()
                .filter(|r| r.status == ReconciliationStatus::Completed)
                .count();
            let conflicts = sum_conflicts(week.iter().copied());
            let efficiency = if completed > 0 {
                percent(completed, completed + conflicts as usize)
            } else {
                100
            };

            WeekPerformance {
                label: format!("Week {}", PERFORMANCE_WEEKS - weeks_back),
                completed,
                conflicts,
                efficiency,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityItem {
    pub reconciliation_id: i64,
    pub title: String,
    pub patient_name: String,
    pub time: DateTime<Utc>,
    pub status: ReconciliationStatus,
    pub conflicts: u32,
}

/// The dashboard timeline: the first five sessions, most recent activity first.
pub fn recent_activity(recs: &[Reconciliation], patients: &[Patient]) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = recs
        .iter()
        .take(5)
        .map(|r| ActivityItem {
            reconciliation_id: r.id,
            title: format!("Reconciliation {}", r.status.label()),
            patient_name: patients
                .iter()
                .find(|p| p.id == r.patient_id)
                .map(Patient::full_name)
                .unwrap_or_else(|| "Unknown Patient".to_string()),
            time: r.activity_time(),
            status: r.status,
            conflicts: r.conflicts_found,
        })
        .collect();
    items.sort_by(|a, b| b.time.cmp(&a.time));
    items
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingItem {
    pub reconciliation: Reconciliation,
    pub patient_name: String,
}

/// Up to three sessions still awaiting review.
pub fn pending_reconciliations(recs: &[Reconciliation], patients: &[Patient]) -> Vec<PendingItem> {
    recs.iter()
        .filter(|r| r.status.is_active())
        .take(3)
        .map(|r| PendingItem {
            reconciliation: r.clone(),
            patient_name: patients
                .iter()
                .find(|p| p.id == r.patient_id)
                .map(Patient::full_name)
                .unwrap_or_default(),
        })
        .collect()
}

/// `"3h ago"` style relative time used in activity feeds.
pub fn time_ago(at: DateTime<Utc>, now: DateTime<FixedOffset>) -> String {
    let hours = (now.with_timezone(&Utc) - at).num_hours();
    match hours {
        h if h < 1 => "Just now".to_string(),
        h if h < 24 => format!("{}h ago", h),
        h => format!("{}d ago", h / 24),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-06-12T15:00:00+00:00").unwrap()
    }

    fn rec(id: i64, status: ReconciliationStatus, created: &str, conflicts: u32) -> Reconciliation {
        Reconciliation {
            id,
            patient_id: 1,
            provider_id: 1,
            status,
            total_medications: 3,
            approved_medications: 0,
            conflicts_found: conflicts,
            notes: None,
            created_at: utc(created),
            completed_at: None,
        }
    }

    fn med(source: MedicationSource) -> Medication {
        Medication {
            id: 1,
            patient_id: 1,
            name: "Aspirin".to_string(),
            generic_name: None,
            dosage: None,
            frequency: None,
            source,
            ndc_number: None,
            last_filled: None,
            is_active: true,
            notes: None,
            image_path: None,
            ocr_confidence: None,
            created_at: None,
        }
    }

    #[test]
    fn zero_medications_give_zero_ocr_usage() {
        let stats = SummaryStats::compute(&[], &[], &[]);
        assert_eq!(stats.ocr_usage_rate, 0);
        assert_eq!(stats.manual_entry_rate, 0);
        assert_eq!(stats.completion_rate, 0);
    }

    #[test]
    fn three_of_four_completed_is_seventy_five_percent() {
        use ReconciliationStatus::*;
        let recs = vec![
            rec(1, Completed, "2024-06-01T10:00:00Z", 1),
            rec(2, Completed, "2024-06-02T10:00:00Z", 0),
            rec(3, Completed, "2024-06-03T10:00:00Z", 2),
            rec(4, Pending, "2024-06-04T10:00:00Z", 0),
        ];
        let stats = SummaryStats::compute(&recs, &[], &[]);
        assert_eq!(stats.completion_rate, 75);
        assert_eq!(stats.total_conflicts, 3);
    }

    #[test]
    fn ocr_share_is_rounded() {
        let meds = vec![
            med(MedicationSource::Photo),
            med(MedicationSource::Manual),
            med(MedicationSource::Manual),
        ];
        let stats = SummaryStats::compute(&[], &meds, &[]);
        assert_eq!(stats.ocr_usage_rate, 33);
        assert_eq!(stats.manual_entry_rate, 67);
    }

    #[test]
    fn dashboard_splits_today_and_week() {
        use ReconciliationStatus::*;
        let mut today = rec(1, Completed, "2024-06-01T09:00:00Z", 0);
        today.completed_at = Some(utc("2024-06-12T08:00:00Z"));
        let this_week = rec(2, Completed, "2024-06-08T09:00:00Z", 0);
        let old = rec(3, Completed, "2024-05-01T09:00:00Z", 0);
        let open = rec(4, InProgress, "2024-06-12T09:00:00Z", 2);

        let stats = DashboardStats::compute(&[today, this_week, old, open], &[], &[], now());
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.completed_this_week, 2);
        assert_eq!(stats.active_reconciliations, 1);
        assert_eq!(stats.conflicts_found, 2);
        assert_eq!(stats.completion_rate, 75);
    }

    #[test]
    fn trend_covers_seven_days_oldest_first() {
        use ReconciliationStatus::*;
        let recs = vec![
            rec(1, Completed, "2024-06-12T01:00:00Z", 0),
            rec(2, Pending, "2024-06-12T02:00:00Z", 0),
            rec(3, InProgress, "2024-06-06T02:00:00Z", 0),
            rec(4, InProgress, "2024-06-05T02:00:00Z", 0),
        ];
        let trend = daily_trend(&recs, now());
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2024, 6, 6).unwrap());
        assert_eq!(trend[0].in_progress, 1);
        assert_eq!(trend[6].total, 2);
        assert_eq!(trend[6].label, "Wed");
    }

    #[test]
    fn distributions_skip_empty_buckets() {
        let meds = vec![med(MedicationSource::Emr), med(MedicationSource::Emr)];
        let sources = source_distribution(&meds);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].label, "EMR System");
        assert_eq!(sources[0].count, 2);
        assert!(status_distribution(&[]).is_empty());
    }

    #[test]
    fn empty_weeks_report_full_efficiency() {
        use ReconciliationStatus::*;
        let recs = vec![
            rec(1, Completed, "2024-06-11T12:00:00Z", 1),
            rec(2, Completed, "2024-06-10T12:00:00Z", 0),
        ];
        let weeks = weekly_performance(&recs, now());
        assert_eq!(weeks.len(), 4);
        assert_eq!(weeks[3].label, "Week 4");
        assert_eq!(weeks[3].completed, 2);
        assert_eq!(weeks[3].efficiency, 67);
        assert_eq!(weeks[0].efficiency, 100);
    }

    #[test]
    fn activity_is_sorted_most_recent_first() {
        use ReconciliationStatus::*;
        let recs = vec![
            rec(1, Pending, "2024-06-01T10:00:00Z", 0),
            rec(2, InProgress, "2024-06-10T10:00:00Z", 0),
        ];
        let items = recent_activity(&recs, &[]);
        assert_eq!(items[0].reconciliation_id, 2);
        assert_eq!(items[0].title, "Reconciliation in progress");
        assert_eq!(items[1].patient_name, "Unknown Patient");
        assert_eq!(pending_reconciliations(&recs, &[]).len(), 2);
        assert_eq!(time_ago(utc("2024-06-12T12:00:00Z"), now()), "3h ago");
        assert_eq!(time_ago(utc("2024-06-10T12:00:00Z"), now()), "2d ago");
    }

    #[test]
    fn completed_today_starts_at_local_midnight() {
        use ReconciliationStatus::*;
        // 08:00 in UTC-5; local midnight is 05:00 UTC on the same date.
        let now = DateTime::parse_from_rfc3339("2024-06-12T08:00:00-05:00").unwrap();
        let mut late_yesterday = rec(1, Completed, "2024-06-10T09:00:00Z", 0);
        late_yesterday.completed_at = Some(utc("2024-06-11T23:30:00-05:00"));
        let mut early_today = rec(2, Completed, "2024-06-10T09:00:00Z", 0);
        early_today.completed_at = Some(utc("2024-06-12T00:15:00-05:00"));

        let stats = DashboardStats::compute(&[late_yesterday, early_today], &[], &[], now);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.completed_this_week, 2);
    }
}

