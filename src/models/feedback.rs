//! Feedback model
//!
//! A user correction of a detected label. Entries are only ever appended.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Placeholder stored when the client did not send an image hash
pub const UNKNOWN_SHA256: &str = "unknown";

/// A stored feedback entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub timestamp: String,
    pub original: String,
    pub correction: String,
    pub confidence: Option<f64>,
    pub image_id: Option<String>,
    pub sha256: String,
}

/// Data for appending a feedback entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackCreate {
    pub original: String,
    pub correction: String,
    pub confidence: Option<f64>,
    pub image_id: Option<String>,
    pub sha256: Option<String>,
}

impl Feedback {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            timestamp: row.get("timestamp")?,
            original: row.get("original")?,
            correction: row.get("correction")?,
            confidence: row.get("confidence")?,
            image_id: row.get("image_id")?,
            sha256: row.get("sha256")?,
        })
    }

    /// Append a new entry stamped with the given server timestamp
    pub fn append(conn: &Connection, data: &FeedbackCreate, timestamp: &str) -> DbResult<Self> {
        let sha256 = data
            .sha256
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(UNKNOWN_SHA256);

        conn.execute(
            r#"
            INSERT INTO feedback (timestamp, original, correction, confidence, image_id, sha256)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                timestamp,
                data.original,
                data.correction,
                data.confidence,
                data.image_id,
                sha256,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM feedback WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent entries first
    pub fn list_recent(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM feedback ORDER BY id DESC LIMIT ?1")?;

        let entries = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_append_and_read_back() {
        let conn = conn();
        let data = FeedbackCreate {
            original: "hot dog".to_string(),
            correction: "bratwurst".to_string(),
            confidence: Some(81.5),
            image_id: Some("abc123".to_string()),
            sha256: Some("f00d".to_string()),
        };

        let entry = Feedback::append(&conn, &data, "2026-10-19T10:00:00+02:00").unwrap();
        assert_eq!(entry.original, "hot dog");
        assert_eq!(entry.correction, "bratwurst");
        assert_eq!(entry.confidence, Some(81.5));
        assert_eq!(entry.image_id.as_deref(), Some("abc123"));
        assert_eq!(entry.sha256, "f00d");
        assert_eq!(entry.timestamp, "2026-10-19T10:00:00+02:00");
        assert_eq!(Feedback::get_by_id(&conn, entry.id).unwrap(), Some(entry));
    }

    #[test]
    fn test_missing_hash_defaults_to_unknown() {
        let conn = conn();
        let data = FeedbackCreate {
            original: "apple".to_string(),
            correction: "pear".to_string(),
            sha256: Some("  ".to_string()),
            ..FeedbackCreate::default()
        };
        let entry = Feedback::append(&conn, &data, "t").unwrap();
        assert_eq!(entry.sha256, UNKNOWN_SHA256);
        assert_eq!(entry.confidence, None);
        assert_eq!(entry.image_id, None);
    }

    #[test]
    fn test_list_recent_newest_first() {
        let conn = conn();
        for label in ["a", "b", "c"] {
            let data = FeedbackCreate {
                original: label.to_string(),
                correction: label.to_uppercase(),
                ..FeedbackCreate::default()
            };
            Feedback::append(&conn, &data, "t").unwrap();
        }

        let recent = Feedback::list_recent(&conn, 2).unwrap();
        let originals: Vec<_> = recent.iter().map(|f| f.original.as_str()).collect();
        assert_eq!(originals, vec!["c", "b"]);
        assert_eq!(Feedback::count(&conn).unwrap(), 3);
        assert_eq!(Feedback::get_by_id(&conn, 999).unwrap(), None);
    }
}
