use crate::db::{Archetype, Insights, Persona, PlayerRecord};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Check if a test is enabled via environment variable
fn is_test_enabled(env_var: &str) -> bool {
    std::env::var(env_var)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Check if database tests are enabled via environment variable
pub fn is_db_enabled() -> bool {
    is_test_enabled("ENABLE_DB_TESTS")
}

/// Connection string for the PostgreSQL test database, when database tests are enabled
pub fn test_database_url() -> Option<String> {
    if !is_db_enabled() {
        return None;
    }
    std::env::var("TEST_DATABASE_URL").ok()
}

/// Creates a test PlayerRecord with a full set of derived attributes
///
/// # Arguments
///
/// * `riot_id` - The player's Riot ID (the tag line is always "EUW")
/// * `generated_at` - The recency marker
pub fn create_test_player(riot_id: &str, generated_at: DateTime<Utc>) -> PlayerRecord {
    PlayerRecord {
        id: Uuid::new_v4(),
        puuid: format!("puuid-{}", riot_id.to_lowercase()),
        riot_id: riot_id.to_string(),
        tag_line: "EUW".to_string(),
        archetype: Archetype {
            name: "The Calculated Assassin".to_string(),
            description: "Waits for the perfect moment, then strikes.".to_string(),
            match_percentage: 87.5,
        },
        persona: Some(Persona {
            codename: "NIGHTFALL".to_string(),
            description: "Thrives in the late game.".to_string(),
        }),
        element: None,
        insights: Some(Insights {
            title: Some("The Comeback Season".to_string()),
            surprising_insights: vec!["Won 9 games after losing first blood".to_string()],
            improvement_tips: vec!["Ward the enemy jungle before 10 minutes".to_string()],
            story_arc: Some("Slow start, strong finish".to_string()),
            season_prediction: Some("Climbs one division".to_string()),
        }),
        pro_comparison: None,
        top_strengths: vec!["Objective control".to_string(), "Roaming".to_string()],
        needs_work: vec!["Vision score".to_string()],
        total_games: 120,
        win_rate: 0.54,
        generated_at,
    }
}

/// Creates a test PlayerRecord that carries no insights title
pub fn create_test_player_without_insights(
    riot_id: &str,
    generated_at: DateTime<Utc>,
) -> PlayerRecord {
    PlayerRecord {
        insights: None,
        ..create_test_player(riot_id, generated_at)
    }
}
