//! AI-assisted case analysis: summarization and priority prediction,
//! plus the deterministic priority heuristic for programmatic intake.

use crate::llm::TextGenerator;
use docket_common::{DocketError, Priority};
use tracing::{error, warn};

fn summary_prompt(case_text: &str) -> String {
    format!(
        "You are a legal expert. Please provide a well-structured summary of this legal case. \
Format the response in HTML with proper styling:

1. Use <h2> tags for main sections
2. Use <h3> tags for subsections
3. Use <ul> and <li> for bullet points
4. Use <p> tags for paragraphs
5. Use <strong> for important terms
6. Use <em> for emphasis
7. Add appropriate spacing and line breaks
8. Use <div class=\"section\"> for major sections
9. Include a brief introduction and conclusion

Here's the case text:

{case_text}"
    )
}

fn priority_prompt(case_text: &str, category: &str) -> String {
    format!(
        "As a legal expert, analyze this case and determine its priority level (High, Medium, or Low) \
based on the following factors:
1. Case complexity
2. Legal implications
3. Time sensitivity
4. Social impact
5. Precedential value

Case Category: {category}
Case Text: {case_text}

Respond with ONLY one word: High, Medium, or Low"
    )
}

/// Generate a formatted summary of the case text.
///
/// Returns None for empty input (nothing to summarize) and for any
/// model failure or blank response; callers that required a summary
/// treat None as the failure signal. Never propagates a crash.
pub async fn generate_summary(llm: &dyn TextGenerator, case_text: &str) -> Option<String> {
    if case_text.trim().is_empty() {
        return None;
    }

    match llm.generate(&summary_prompt(case_text)).await {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            warn!("Summary generation returned empty text");
            None
        }
        Err(e) => {
            error!("Error generating case summary: {}", e);
            None
        }
    }
}

/// Predict a priority for the case via the model.
///
/// An empty category is treated as "Uncategorized". A transport
/// failure or blank response fails with a classification error; any
/// other unexpected label normalizes to Medium.
pub async fn classify_priority(
    llm: &dyn TextGenerator,
    case_text: &str,
    category: &str,
) -> Result<Priority, DocketError> {
    let category = if category.trim().is_empty() {
        "Uncategorized"
    } else {
        category
    };

    let response = llm
        .generate(&priority_prompt(case_text, category))
        .await
        .map_err(|e| DocketError::Classification(e.to_string()))?;

    Priority::from_model_output(&response)
        .ok_or_else(|| DocketError::Classification("Model returned no priority text".to_string()))
}

/// Deterministic priority for structured intake (known pending
/// duration and category). Never calls the model and never fails:
/// malformed inputs fall through the comparisons to Low.
pub fn assign_priority(pending_years: f64, category: &str) -> Priority {
    if pending_years > 5.0 {
        Priority::High
    } else if category.to_lowercase().contains("criminal") {
        Priority::High
    } else if pending_years > 2.0 {
        Priority::Medium
    } else {
        Priority::Low
    }
}
