//! Shared types for Docket: the case model, statistics aggregation,
//! error taxonomy, and the sqlite-backed case store.

pub mod case;
pub mod error;
pub mod stats;
pub mod store;

pub use case::{
    new_case_id, parse_date, parse_date_or, years_between, Case, CaseStatus, HearingRecord, HearingStatus,
    HistoryEntry, JudgeNote, Priority, DAYS_PER_YEAR,
};
pub use error::DocketError;
pub use stats::{CaseStats, TimeRange};
pub use store::{CaseKey, CaseQuery, CaseStore, DEFAULT_DB_PATH};
