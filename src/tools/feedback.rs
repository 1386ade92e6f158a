//! Feedback tools
//!
//! Append-only log of user corrections to detected labels.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::db::Database;
use crate::models::{Feedback, FeedbackCreate};

/// Response for record_feedback
#[derive(Debug, Serialize)]
pub struct RecordFeedbackResponse {
    pub status: &'static str,
    pub entry: Feedback,
}

/// Response for list_feedback
#[derive(Debug, Serialize)]
pub struct ListFeedbackResponse {
    pub entries: Vec<Feedback>,
    pub count: usize,
    pub total: i64,
}

/// Append a feedback entry
pub fn record_feedback(db: &Database, data: FeedbackCreate) -> Result<RecordFeedbackResponse, String> {
    if data.original.trim().is_empty() {
        return Err("original label cannot be empty".to_string());
    }
    if data.correction.trim().is_empty() {
        return Err("correction cannot be empty".to_string());
    }
    if let Some(confidence) = data.confidence {
        if !(0.0..=100.0).contains(&confidence) {
            return Err("confidence must be between 0 and 100".to_string());
        }
    }

    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entry = Feedback::append(&conn, &data, &timestamp)
        .map_err(|e| format!("Failed to record feedback: {}", e))?;

    tracing::info!(
        "Feedback #{}: '{}' corrected to '{}'",
        entry.id,
        entry.original,
        entry.correction
    );

    Ok(RecordFeedbackResponse {
        status: "ok",
        entry,
    })
}

/// List the most recent feedback entries
pub fn list_feedback(db: &Database, limit: i64) -> Result<ListFeedbackResponse, String> {
    let limit = limit.clamp(1, 500);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = Feedback::list_recent(&conn, limit)
        .map_err(|e| format!("Failed to list feedback: {}", e))?;
    let total = Feedback::count(&conn).map_err(|e| format!("Failed to count feedback: {}", e))?;

    Ok(ListFeedbackResponse {
        count: entries.len(),
        entries,
        total,
    })
}
