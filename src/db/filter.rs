use chrono::{DateTime, Utc};

use crate::db::models::PlayerRecord;

/// Row selection understood by every record store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    /// Every record
    All,
    /// Records whose `generated_at` is strictly after the given instant
    AnalyzedAfter(DateTime<Utc>),
    /// The single record with this natural key
    Player { riot_id: String, tag_line: String },
}

impl RecordFilter {
    pub fn player(riot_id: impl Into<String>, tag_line: impl Into<String>) -> Self {
        RecordFilter::Player {
            riot_id: riot_id.into(),
            tag_line: tag_line.into(),
        }
    }

    /// Evaluate the filter against an in-memory record
    pub fn matches(&self, record: &PlayerRecord) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::AnalyzedAfter(sentinel) => record.generated_at > *sentinel,
            RecordFilter::Player { riot_id, tag_line } => {
                record.riot_id == *riot_id && record.tag_line == *tag_line
            }
        }
    }
}

/// Column changes a bulk update may apply.
///
/// Derived attributes belong to the analysis process, so the only patch
/// available here moves the recency marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPatch {
    SetGeneratedAt(DateTime<Utc>),
}

impl RecordPatch {
    pub fn apply(&self, record: &mut PlayerRecord) {
        match self {
            RecordPatch::SetGeneratedAt(ts) => record.generated_at = *ts,
        }
    }
}
