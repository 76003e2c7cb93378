use serde::{Deserialize, Serialize};

use crate::db::PlayerRecord;

/// The slice of a player record a share card needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCardPlayerSummary {
    pub puuid: String,
    pub riot_id: String,
    pub tag_line: String,
    pub total_games: i64,
    pub win_rate: f64,
    pub archetype: SummaryArchetype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<SummaryInsights>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryArchetype {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryInsights {
    pub title: String,
}

/// Request body of the publish endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCardPayload {
    /// Rendered card image, usually a `data:` URL
    pub card_data_url: String,
    pub caption: String,
    pub player: ShareCardPlayerSummary,
}

/// Project `record` into a share card summary.
///
/// `insights` is only present when the record has a non-empty insights title.
pub fn build_summary(record: &PlayerRecord) -> ShareCardPlayerSummary {
    let insights = record
        .insights
        .as_ref()
        .and_then(|insights| insights.title.as_deref())
        .filter(|title| !title.is_empty())
        .map(|title| SummaryInsights {
            title: title.to_string(),
        });

    ShareCardPlayerSummary {
        puuid: record.puuid.clone(),
        riot_id: record.riot_id.clone(),
        tag_line: record.tag_line.clone(),
        total_games: record.total_games,
        win_rate: record.win_rate,
        archetype: SummaryArchetype {
            name: record.archetype.name.clone(),
            description: record.archetype.description.clone(),
        },
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Insights;
    use crate::test_utils::{create_test_player, create_test_player_without_insights};
    use chrono::Utc;

    #[test]
    fn summary_carries_identity_stats_and_archetype() {
        let record = create_test_player("Faker", Utc::now());
        let summary = build_summary(&record);

        assert_eq!(summary.puuid, record.puuid);
        assert_eq!(summary.riot_id, "Faker");
        assert_eq!(summary.tag_line, "EUW");
        assert_eq!(summary.total_games, 120);
        assert_eq!(summary.win_rate, 0.54);
        assert_eq!(summary.archetype.name, record.archetype.name);
        assert_eq!(summary.archetype.description, record.archetype.description);
        assert_eq!(
            summary.insights,
            Some(SummaryInsights {
                title: "The Comeback Season".to_string()
            })
        );
    }

    #[test]
    fn summary_is_deterministic() {
        let record = create_test_player("Faker", Utc::now());
        assert_eq!(build_summary(&record), build_summary(&record));
    }

    #[test]
    fn missing_insights_title_omits_the_key() {
        let record = create_test_player_without_insights("Caps", Utc::now());
        let summary = build_summary(&record);
        assert!(summary.insights.is_none());

        let json = serde_json::to_value(&summary).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("insights"));
        assert_eq!(object["riotId"], "Caps");
        assert_eq!(object["archetype"]["name"], "The Calculated Assassin");
    }

    #[test]
    fn empty_or_absent_title_counts_as_missing() {
        let mut record = create_test_player("Caps", Utc::now());

        record.insights = Some(Insights {
            title: Some(String::new()),
            ..Insights::default()
        });
        assert!(build_summary(&record).insights.is_none());

        record.insights = Some(Insights {
            title: None,
            surprising_insights: vec!["Plays at 3am".to_string()],
            ..Insights::default()
        });
        let json = serde_json::to_string(&build_summary(&record)).unwrap();
        assert!(!json.contains("insights"));
    }

    #[test]
    fn payload_uses_camel_case_keys() {
        let record = create_test_player("Faker", Utc::now());
        let payload = ShareCardPayload {
            card_data_url: "data:image/png;base64,AAAA".to_string(),
            caption: "Check my stats!".to_string(),
            player: build_summary(&record),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["cardDataUrl"], "data:image/png;base64,AAAA");
        assert_eq!(json["caption"], "Check my stats!");
        assert_eq!(json["player"]["totalGames"], 120);
        assert_eq!(json["player"]["insights"]["title"], "The Comeback Season");
    }
}
