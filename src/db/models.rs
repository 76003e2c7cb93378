use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cache::freshness::Freshness;

/// One cached player row in the `players` table.
///
/// Identity and aggregate columns are plain; every derived attribute is
/// produced by the external analysis process and stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: Uuid,
    pub puuid: String,
    pub riot_id: String,
    pub tag_line: String,
    pub archetype: Archetype,
    pub persona: Option<Persona>,
    pub element: Option<Element>,
    pub insights: Option<Insights>,
    pub pro_comparison: Option<ProComparison>,
    #[serde(default)]
    pub top_strengths: Vec<String>,
    #[serde(default)]
    pub needs_work: Vec<String>,
    pub total_games: i64,
    pub win_rate: f64,
    pub generated_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// The recency marker of this record
    pub fn freshness(&self) -> Freshness {
        Freshness::new(self.generated_at)
    }

    /// `riotId#tagLine`, the form players type into the lookup box
    pub fn display_name(&self) -> String {
        format!("{}#{}", self.riot_id, self.tag_line)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Archetype {
    pub name: String,
    pub description: String,
    pub match_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub codename: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
}

/// Narrative insights; the analysis backend writes these keys in snake_case
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Insights {
    pub title: Option<String>,
    #[serde(default)]
    pub surprising_insights: Vec<String>,
    #[serde(default)]
    pub improvement_tips: Vec<String>,
    pub story_arc: Option<String>,
    pub season_prediction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProComparison {
    pub primary: String,
    pub secondary: Option<String>,
    pub similarity: f64,
    pub description: String,
}

/// Listing projection shown to the operator before a bulk action
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPlayer {
    pub riot_id: String,
    pub tag_line: String,
    pub archetype: Archetype,
}

impl From<PlayerRecord> for CachedPlayer {
    fn from(record: PlayerRecord) -> Self {
        Self {
            riot_id: record.riot_id,
            tag_line: record.tag_line,
            archetype: record.archetype,
        }
    }
}
