use chrono::{DateTime, Utc};

/// One stored snapshot of a document. Rows are append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentVersion {
    pub id: i64,
    pub law_type: String,
    /// Sanitized markup as it was written by the scheduler.
    pub content: String,
    pub last_updated: DateTime<Utc>,
}

/// History listing entry: a version without its (large) content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSummary {
    pub id: i64,
    pub last_updated: DateTime<Utc>,
    /// Content length in bytes.
    pub size: usize,
}
