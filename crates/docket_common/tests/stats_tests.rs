//! Tests for statistics aggregation.

use approx::assert_relative_eq;
use chrono::{DateTime, TimeZone, Utc};
use docket_common::{Case, CaseStats, CaseStatus, Priority};

fn case_with(
    status: CaseStatus,
    category: &str,
    filing_date: Option<DateTime<Utc>>,
    completion_date: Option<DateTime<Utc>>,
) -> Case {
    let now = Utc::now();
    Case {
        id: None,
        case_id: docket_common::new_case_id(now),
        case_text: "text".to_string(),
        category: category.to_string(),
        priority: Priority::Medium,
        status,
        start_date: filing_date.unwrap_or(now),
        next_hearing: None,
        last_hearing: None,
        summary: None,
        pending_years: 0.0,
        filing_date,
        completion_date,
        case_duration: None,
        final_decision: None,
        history: Vec::new(),
        hearing_history: Vec::new(),
        judge_notes: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_empty_collection() {
    let stats = CaseStats::compute(&[]);
    assert_eq!(stats.total_cases, 0);
    assert!(stats.priority_counts.is_empty());
    assert!(stats.status_counts.is_empty());
    assert!(stats.category_counts.is_empty());
    assert!(stats.cases_over_time.is_empty());
    assert_eq!(stats.average_case_duration, 0.0);
}

#[test]
fn test_average_duration_one_year() {
    let filed = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let completed = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let cases = vec![case_with(
        CaseStatus::Completed,
        "Civil",
        Some(filed),
        Some(completed),
    )];

    let stats = CaseStats::compute(&cases);
    assert_relative_eq!(stats.average_case_duration, 1.0, epsilon = 0.01);
}

#[test]
fn test_completed_without_dates_dilutes_average() {
    let filed = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let completed = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let cases = vec![
        case_with(CaseStatus::Completed, "Civil", Some(filed), Some(completed)),
        // Completed but no dates: counts toward the divisor, adds no
        // duration, exactly as the source system computed it.
        case_with(CaseStatus::Completed, "Civil", None, None),
    ];

    let stats = CaseStats::compute(&cases);
    assert_relative_eq!(stats.average_case_duration, 0.5, epsilon = 0.01);
}

#[test]
fn test_counts_by_label() {
    let filed = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let mut high = case_with(CaseStatus::Open, "Criminal Law", Some(filed), None);
    high.priority = Priority::High;
    let cases = vec![
        high,
        case_with(CaseStatus::Open, "Civil", Some(filed), None),
        case_with(CaseStatus::Completed, "Civil", Some(filed), Some(filed)),
    ];

    let stats = CaseStats::compute(&cases);
    assert_eq!(stats.total_cases, 3);
    assert_eq!(stats.priority_counts.get("High"), Some(&1));
    assert_eq!(stats.priority_counts.get("Medium"), Some(&2));
    assert_eq!(stats.status_counts.get("Open"), Some(&2));
    assert_eq!(stats.status_counts.get("Completed"), Some(&1));
    assert_eq!(stats.category_counts.get("Civil"), Some(&2));
    assert_eq!(stats.category_counts.get("Criminal Law"), Some(&1));
}

#[test]
fn test_blank_category_buckets_as_unknown() {
    let cases = vec![case_with(CaseStatus::Open, "  ", None, None)];
    let stats = CaseStats::compute(&cases);
    assert_eq!(stats.category_counts.get("Unknown"), Some(&1));
}

#[test]
fn test_time_series_sorted_by_month() {
    let jan = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
    let mar = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
    let cases = vec![
        case_with(CaseStatus::Open, "Civil", Some(mar), None),
        case_with(CaseStatus::Open, "Civil", Some(jan), None),
        case_with(CaseStatus::Open, "Civil", Some(jan), None),
        // No filing date: excluded from the series entirely.
        case_with(CaseStatus::Open, "Civil", None, None),
    ];

    let stats = CaseStats::compute(&cases);
    let keys: Vec<&String> = stats.cases_over_time.keys().collect();
    assert_eq!(keys, vec!["2025-01", "2025-03"]);
    assert_eq!(stats.cases_over_time["2025-01"], 2);
    assert_eq!(stats.cases_over_time["2025-03"], 1);
}
