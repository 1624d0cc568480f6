//! Case manager: owns the lifecycle operations over the case store.
//!
//! Every operation validates its input before touching the model or
//! the store, then follows a read-modify-write pattern against the
//! store. There is no check-and-set; concurrent updates to the same
//! case are last-write-wins by design.

use crate::analysis;
use crate::llm::TextGenerator;
use chrono::Utc;
use docket_common::{
    new_case_id, parse_date, parse_date_or, Case, CaseKey, CaseQuery, CaseStats, CaseStatus,
    CaseStore, DocketError, HistoryEntry, Priority, TimeRange,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Request to create a case. Every field but the case text is
/// optional; each date falls back to "now" independently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCase {
    #[serde(default)]
    pub case_text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub next_hearing_date: Option<String>,
    #[serde(default)]
    pub last_hearing_date: Option<String>,
}

/// Request to update a case's status; hearing dates pass through when
/// present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub next_hearing: Option<String>,
    #[serde(default)]
    pub last_hearing: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleHearing {
    pub hearing_date: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteHearing {
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub next_steps: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewJudgeNote {
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "type")]
    pub note_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHistoryEntry {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteCase {
    #[serde(default)]
    pub final_decision: String,
}

/// Summary + predicted priority without persisting anything.
#[derive(Debug, Clone, Serialize)]
pub struct CaseAnalysis {
    pub summary: String,
    pub predicted_priority: Priority,
    pub category: String,
}

fn storage(e: anyhow::Error) -> DocketError {
    DocketError::Storage(e.to_string())
}

pub struct CaseManager {
    store: CaseStore,
    llm: Arc<dyn TextGenerator>,
}

impl CaseManager {
    pub fn new(store: CaseStore, llm: Arc<dyn TextGenerator>) -> Self {
        Self { store, llm }
    }

    fn load(&self, case_id: &str) -> Result<Case, DocketError> {
        self.store
            .find_one(&CaseKey::CaseId(case_id.to_string()))
            .map_err(storage)?
            .ok_or_else(|| DocketError::NotFound(format!("Case {} not found", case_id)))
    }

    fn save(&self, case: &Case) -> Result<(), DocketError> {
        let modified = self
            .store
            .update_one(&CaseKey::CaseId(case.case_id.clone()), case)
            .map_err(storage)?;
        if modified == 0 {
            return Err(DocketError::NotFound(format!(
                "Case {} not found",
                case.case_id
            )));
        }
        Ok(())
    }

    /// Create a case: summarize, classify, then persist.
    ///
    /// Atomic with respect to the external calls: if either the
    /// summary or the classification fails, nothing is persisted.
    pub async fn create(&self, req: NewCase) -> Result<Case, DocketError> {
        if req.case_text.trim().is_empty() {
            return Err(DocketError::Validation("Case text is required".to_string()));
        }

        let category = req
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("Uncategorized")
            .to_string();

        let summary = analysis::generate_summary(self.llm.as_ref(), &req.case_text)
            .await
            .ok_or_else(|| {
                DocketError::Summary("Failed to generate case summary".to_string())
            })?;

        let priority =
            analysis::classify_priority(self.llm.as_ref(), &req.case_text, &category).await?;

        let now = Utc::now();
        let start_date = parse_date_or(req.start_date.as_deref(), now);
        let next_hearing = parse_date_or(req.next_hearing_date.as_deref(), now);
        let last_hearing = parse_date_or(req.last_hearing_date.as_deref(), now);

        let mut case = Case {
            id: None,
            case_id: new_case_id(now),
            case_text: req.case_text,
            category,
            priority,
            status: CaseStatus::Open,
            start_date,
            next_hearing: Some(next_hearing),
            last_hearing: Some(last_hearing),
            summary: Some(summary),
            pending_years: 0.0,
            filing_date: Some(start_date),
            completion_date: None,
            case_duration: None,
            final_decision: None,
            history: Vec::new(),
            hearing_history: Vec::new(),
            judge_notes: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        case.pending_years = case.pending_years_at(now);
        case.add_history("Created", "Case created", None, now);

        let id = self.store.insert(&case).map_err(storage)?;
        case.id = Some(id);

        info!("Case added successfully with ID: {}", case.case_id);
        Ok(case)
    }

    /// Summarize and classify without persisting.
    pub async fn analyze(
        &self,
        case_text: &str,
        category: &str,
    ) -> Result<CaseAnalysis, DocketError> {
        if case_text.trim().is_empty() {
            return Err(DocketError::Validation("Case text is required".to_string()));
        }

        let summary = analysis::generate_summary(self.llm.as_ref(), case_text)
            .await
            .ok_or_else(|| {
                DocketError::Summary("Failed to generate case summary".to_string())
            })?;
        let predicted_priority =
            analysis::classify_priority(self.llm.as_ref(), case_text, category).await?;

        Ok(CaseAnalysis {
            summary,
            predicted_priority,
            category: category.to_string(),
        })
    }

    /// Summarize only. None from the generator surfaces as a summary
    /// error here; empty input is a validation error caught upstream.
    pub async fn summarize(&self, case_text: &str) -> Result<String, DocketError> {
        if case_text.trim().is_empty() {
            return Err(DocketError::Validation("No case text provided".to_string()));
        }
        analysis::generate_summary(self.llm.as_ref(), case_text)
            .await
            .ok_or_else(|| DocketError::Summary("Failed to generate summary".to_string()))
    }

    pub fn get(&self, key: &CaseKey) -> Result<Case, DocketError> {
        self.store
            .find_one(key)
            .map_err(storage)?
            .ok_or_else(|| DocketError::NotFound("Case not found".to_string()))
    }

    /// List cases, optionally filtered by priority and status, in
    /// storage order.
    pub fn list(
        &self,
        priority: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<Case>, DocketError> {
        let mut query = CaseQuery::new();
        if let Some(priority) = priority {
            query = query.priority(priority);
        }
        if let Some(status) = status {
            query = query.status(status);
        }
        self.store.find_many(&query).map_err(storage)
    }

    /// Update a case's status. Hearing dates, when present, must parse;
    /// a typo'd date is rejected rather than rewritten.
    pub fn update_status(&self, case_id: &str, req: StatusUpdate) -> Result<(), DocketError> {
        if req.status.trim().is_empty() {
            return Err(DocketError::Validation("Status is required".to_string()));
        }
        let next_hearing = req
            .next_hearing
            .as_deref()
            .map(|raw| {
                parse_date(raw)
                    .ok_or_else(|| DocketError::Validation(format!("Invalid hearing date: {}", raw)))
            })
            .transpose()?;
        let last_hearing = req
            .last_hearing
            .as_deref()
            .map(|raw| {
                parse_date(raw)
                    .ok_or_else(|| DocketError::Validation(format!("Invalid hearing date: {}", raw)))
            })
            .transpose()?;

        let now = Utc::now();
        let mut case = self.load(case_id)?;
        case.status = CaseStatus::from_label(&req.status);
        if next_hearing.is_some() {
            case.next_hearing = next_hearing;
        }
        if last_hearing.is_some() {
            case.last_hearing = last_hearing;
        }
        case.updated_at = now;
        self.save(&case)
    }

    /// Schedule a hearing, shifting the current next_hearing into
    /// last_hearing. Returns the new hearing record's id.
    pub fn schedule_hearing(
        &self,
        case_id: &str,
        req: ScheduleHearing,
    ) -> Result<Uuid, DocketError> {
        let hearing_date = parse_date(&req.hearing_date).ok_or_else(|| {
            DocketError::Validation(format!("Invalid hearing date: {}", req.hearing_date))
        })?;

        let now = Utc::now();
        let mut case = self.load(case_id)?;
        let hearing_id = case.schedule_hearing(hearing_date, &req.notes, now);
        self.save(&case)?;

        info!("Hearing scheduled for case {}", case_id);
        Ok(hearing_id)
    }

    /// Complete a hearing record. A hearing id that matches nothing is
    /// NotFound; the case is left unchanged.
    pub fn complete_hearing(
        &self,
        case_id: &str,
        hearing_id: Uuid,
        req: CompleteHearing,
    ) -> Result<(), DocketError> {
        let now = Utc::now();
        let mut case = self.load(case_id)?;
        if !case.complete_hearing(hearing_id, &req.outcome, &req.next_steps, now) {
            return Err(DocketError::NotFound(format!(
                "Hearing {} not found on case {}",
                hearing_id, case_id
            )));
        }
        self.save(&case)
    }

    pub fn add_judge_note(&self, case_id: &str, req: NewJudgeNote) -> Result<(), DocketError> {
        let now = Utc::now();
        let mut case = self.load(case_id)?;
        case.add_judge_note(&req.content, req.note_type.as_deref(), now);
        self.save(&case)
    }

    pub fn add_history(&self, case_id: &str, req: NewHistoryEntry) -> Result<(), DocketError> {
        let now = Utc::now();
        let mut case = self.load(case_id)?;
        case.add_history(&req.action, &req.details, req.user.as_deref(), now);
        self.save(&case)
    }

    pub fn history(&self, case_id: &str) -> Result<Vec<HistoryEntry>, DocketError> {
        Ok(self.load(case_id)?.history)
    }

    /// Close a case: record the final decision, completion date and
    /// total duration. Completing twice is rejected.
    pub fn complete(&self, case_id: &str, req: CompleteCase) -> Result<(), DocketError> {
        let now = Utc::now();
        let mut case = self.load(case_id)?;
        if !case.complete(&req.final_decision, now) {
            return Err(DocketError::Validation(format!(
                "Case {} is already completed",
                case_id
            )));
        }
        self.save(&case)?;

        info!("Case {} completed", case_id);
        Ok(())
    }

    /// Aggregate statistics over cases selected by time range and
    /// category. Selection happens in the store query; aggregation is
    /// pure.
    pub fn stats(&self, time_range: TimeRange, category: &str) -> Result<CaseStats, DocketError> {
        let now = Utc::now();
        let mut query = CaseQuery::new();
        if let Some(cutoff) = time_range.cutoff(now) {
            query = query.filed_after(cutoff);
        }
        if category != "all" && !category.trim().is_empty() {
            query = query.category(category);
        }

        let cases = self.store.find_many(&query).map_err(storage)?;
        Ok(CaseStats::compute(&cases))
    }
}
