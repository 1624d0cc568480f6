//! Read-side statistics over a collection of cases.
//!
//! Selection (time range, category) happens at the store query stage;
//! [`CaseStats::compute`] is a pure function of the cases it is handed.

use crate::case::{years_between, Case, CaseStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Time window a stats query selects cases from, keyed on filing_date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    All,
    Month,
    Year,
}

impl TimeRange {
    /// Parse a query parameter; unrecognized values select everything,
    /// matching the behavior of an absent filter.
    pub fn from_param(raw: &str) -> TimeRange {
        match raw {
            "month" => TimeRange::Month,
            "year" => TimeRange::Year,
            _ => TimeRange::All,
        }
    }

    /// Earliest filing_date this range admits, as of `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeRange::All => None,
            TimeRange::Month => Some(now - Duration::days(30)),
            TimeRange::Year => Some(now - Duration::days(365)),
        }
    }
}

/// Aggregate metrics over a set of cases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseStats {
    pub total_cases: u64,
    pub priority_counts: HashMap<String, u64>,
    pub status_counts: HashMap<String, u64>,
    pub category_counts: HashMap<String, u64>,
    /// Filing counts bucketed by month (YYYY-MM), ascending by key.
    pub cases_over_time: BTreeMap<String, u64>,
    /// Mean duration in years over completed cases; 0 when none.
    pub average_case_duration: f64,
}

impl CaseStats {
    /// Aggregate the given cases. Pure: no clock, no store, no model.
    pub fn compute(cases: &[Case]) -> CaseStats {
        let mut stats = CaseStats {
            total_cases: cases.len() as u64,
            ..Default::default()
        };

        let mut total_duration = 0.0;
        let mut completed_cases = 0u64;

        for case in cases {
            *stats
                .priority_counts
                .entry(case.priority.as_str().to_string())
                .or_insert(0) += 1;

            *stats
                .status_counts
                .entry(case.status.as_label().to_string())
                .or_insert(0) += 1;

            let category = if case.category.trim().is_empty() {
                "Unknown"
            } else {
                case.category.as_str()
            };
            *stats.category_counts.entry(category.to_string()).or_insert(0) += 1;

            if case.status == CaseStatus::Completed {
                completed_cases += 1;
                if let (Some(filed), Some(completed)) = (case.filing_date, case.completion_date) {
                    total_duration += years_between(filed, completed);
                }
            }

            if let Some(filed) = case.filing_date {
                let month_key = filed.format("%Y-%m").to_string();
                *stats.cases_over_time.entry(month_key).or_insert(0) += 1;
            }
        }

        if completed_cases > 0 {
            stats.average_case_duration = total_duration / completed_cases as f64;
        }

        stats
    }
}
