//! Case model: the central record for one legal matter and its
//! append-only sub-collections (history, hearings, judge notes).
//!
//! Lifecycle rules live here as methods on [`Case`] so the daemon's
//! manager stays a thin read-modify-write orchestrator.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Days per year used for all duration math (matches calendar average).
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Triage urgency for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Canonical capitalized label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Normalize a raw model response into a priority.
    ///
    /// The response is trimmed and upper-cased before comparison; any
    /// non-blank text that is not HIGH/MEDIUM/LOW coerces to Medium.
    /// Blank text returns None so the caller can treat it as a failed
    /// classification rather than a silent default.
    pub fn from_model_output(raw: &str) -> Option<Priority> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return None;
        }
        Some(match normalized.as_str() {
            "HIGH" => Priority::High,
            "MEDIUM" => Priority::Medium,
            "LOW" => Priority::Low,
            _ => Priority::Medium,
        })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case status. Open and Completed drive the lifecycle; other labels
/// round-trip untouched since status is an open vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Open,
    Completed,
    #[serde(untagged)]
    Other(String),
}

impl CaseStatus {
    pub fn from_label(label: &str) -> CaseStatus {
        match label {
            "Open" => CaseStatus::Open,
            "Completed" => CaseStatus::Completed,
            other => CaseStatus::Other(other.to_string()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            CaseStatus::Open => "Open",
            CaseStatus::Completed => "Completed",
            CaseStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Audit-log entry recording an action taken on a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub details: String,
    /// Actor that performed the action; "System" when unattributed.
    pub user: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HearingStatus {
    Scheduled,
    Completed,
}

/// A scheduled or completed court session attached to a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearingRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub status: HearingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Free-form note attached by a judge. Type is an open vocabulary
/// (general, decision, observation, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeNote {
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub note_type: String,
}

/// The central record representing one legal matter being tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    /// Storage-assigned rowid, present once persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Business identifier, distinct from the storage id.
    pub case_id: String,
    pub case_text: String,
    pub category: String,
    pub priority: Priority,
    pub status: CaseStatus,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_hearing: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_hearing: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Elapsed time since start_date in fractional years, never negative.
    pub pending_years: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filing_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    /// Set exactly once, at the Open -> Completed transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_decision: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub hearing_history: Vec<HearingRecord>,
    #[serde(default)]
    pub judge_notes: Vec<JudgeNote>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generate a case identifier: date stamp plus a short random suffix.
/// Uniqueness is probabilistic; the store's UNIQUE constraint catches
/// the (negligible) collision case instead of overwriting.
pub fn new_case_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("CASE-{}-{}", now.format("%Y%m%d"), &suffix[..8])
}

/// Parse an ISO-8601-ish date string: RFC 3339, then a bare
/// datetime, then a bare date at midnight UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    None
}

/// Parse an optional date string, falling back to `now`.
///
/// Each date field of a case gets its own fallback evaluation; a
/// missing or unparseable value never poisons its siblings.
pub fn parse_date_or(value: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    value.and_then(parse_date).unwrap_or(now)
}

/// Elapsed time between two instants in fractional years.
pub fn years_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

impl Case {
    /// How long the case has been pending as of `now`, clamped at zero
    /// for future-dated starts.
    pub fn pending_years_at(&self, now: DateTime<Utc>) -> f64 {
        years_between(self.start_date, now).max(0.0)
    }

    /// Append a history entry. Actor defaults to "System".
    pub fn add_history(
        &mut self,
        action: &str,
        details: &str,
        user: Option<&str>,
        now: DateTime<Utc>,
    ) {
        self.history.push(HistoryEntry {
            timestamp: now,
            action: action.to_string(),
            details: details.to_string(),
            user: user.unwrap_or("System").to_string(),
        });
        self.updated_at = now;
    }

    /// Append a judge note. Type defaults to "general".
    pub fn add_judge_note(&mut self, content: &str, note_type: Option<&str>, now: DateTime<Utc>) {
        self.judge_notes.push(JudgeNote {
            content: content.to_string(),
            created_at: now,
            note_type: note_type.unwrap_or("general").to_string(),
        });
        self.updated_at = now;
    }

    /// Schedule a hearing: the previous next_hearing (if any) shifts
    /// into last_hearing before being overwritten, and a Scheduled
    /// record is appended. Returns the new record's id.
    pub fn schedule_hearing(
        &mut self,
        hearing_date: DateTime<Utc>,
        notes: &str,
        now: DateTime<Utc>,
    ) -> Uuid {
        if let Some(previous) = self.next_hearing {
            self.last_hearing = Some(previous);
        }
        self.next_hearing = Some(hearing_date);

        let record = HearingRecord {
            id: Uuid::new_v4(),
            date: hearing_date,
            notes: notes.to_string(),
            status: HearingStatus::Scheduled,
            created_at: now,
            outcome: None,
            next_steps: None,
            completed_at: None,
        };
        let id = record.id;
        self.hearing_history.push(record);
        self.updated_at = now;
        id
    }

    /// Mark the hearing with `hearing_id` completed. Returns false when
    /// no record matches, leaving the case untouched.
    pub fn complete_hearing(
        &mut self,
        hearing_id: Uuid,
        outcome: &str,
        next_steps: &str,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(hearing) = self
            .hearing_history
            .iter_mut()
            .find(|h| h.id == hearing_id)
        else {
            return false;
        };
        hearing.status = HearingStatus::Completed;
        hearing.outcome = Some(outcome.to_string());
        hearing.next_steps = Some(next_steps.to_string());
        hearing.completed_at = Some(now);
        self.updated_at = now;
        true
    }

    /// Transition Open -> Completed. Computes case_duration from
    /// start_date to `now` and records the final decision. Returns
    /// false when the case is already completed; the transition happens
    /// exactly once.
    pub fn complete(&mut self, final_decision: &str, now: DateTime<Utc>) -> bool {
        if self.status == CaseStatus::Completed {
            return false;
        }
        self.status = CaseStatus::Completed;
        self.final_decision = Some(final_decision.to_string());
        self.completion_date = Some(now);
        self.case_duration = Some(years_between(self.start_date, now));
        self.updated_at = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_priority_normalization() {
        assert_eq!(Priority::from_model_output("  high \n"), Some(Priority::High));
        assert_eq!(Priority::from_model_output("LOW"), Some(Priority::Low));
        assert_eq!(Priority::from_model_output("Medium"), Some(Priority::Medium));
        // Anything unexpected coerces to the safe middle.
        assert_eq!(Priority::from_model_output("urgent!!"), Some(Priority::Medium));
        assert_eq!(Priority::from_model_output("   "), None);
    }

    #[test]
    fn test_status_open_vocabulary() {
        assert_eq!(CaseStatus::from_label("Open"), CaseStatus::Open);
        assert_eq!(
            CaseStatus::from_label("On Appeal"),
            CaseStatus::Other("On Appeal".to_string())
        );
        let json = serde_json::to_string(&CaseStatus::Other("Stayed".into())).unwrap();
        assert_eq!(json, "\"Stayed\"");
    }

    #[test]
    fn test_case_id_format() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
        let id = new_case_id(now);
        assert!(id.starts_with("CASE-20260314-"));
        assert_eq!(id.len(), "CASE-20260314-".len() + 8);
    }

    #[test]
    fn test_parse_date_independent_fallback() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let parsed = parse_date_or(Some("2024-06-15"), now);
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap());
        assert_eq!(parse_date_or(Some("not a date"), now), now);
        assert_eq!(parse_date_or(None, now), now);
    }

    #[test]
    fn test_years_between() {
        let from = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let to = from + Duration::days(731);
        assert!((years_between(from, to) - 2.0).abs() < 0.01);
    }
}
