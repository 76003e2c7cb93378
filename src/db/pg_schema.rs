use crate::db::error::DatabaseError;
use crate::db::models::{Archetype, Element, Insights, Persona, PlayerRecord, ProComparison};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::Row as _;

/// Extract a field from a database row, mapping failures to DeserializationError
macro_rules! pg_get_field {
    ($row:expr, $field:expr) => {
        $row.try_get($field)
            .map_err(|e| DatabaseError::DeserializationError(format!("{}: {}", $field, e)))?
    };
}

/// Columns read back for every player query
pub const SELECT_COLUMNS: &str = "id, puuid, riot_id, tag_line, archetype, persona, element, \
     insights, pro_comparison, top_strengths, needs_work, total_games, win_rate, generated_at";

/// Column definitions of the `players` table
pub const TABLE_DEFINITION: &str = r#"
    id UUID PRIMARY KEY,
    puuid TEXT NOT NULL,
    riot_id TEXT NOT NULL,
    tag_line TEXT NOT NULL,
    archetype JSONB NOT NULL,
    persona JSONB,
    element JSONB,
    insights JSONB,
    pro_comparison JSONB,
    top_strengths JSONB NOT NULL DEFAULT '[]'::jsonb,
    needs_work JSONB NOT NULL DEFAULT '[]'::jsonb,
    total_games BIGINT NOT NULL DEFAULT 0,
    win_rate DOUBLE PRECISION NOT NULL DEFAULT 0,
    generated_at TIMESTAMPTZ NOT NULL,
    UNIQUE (riot_id, tag_line)
"#;

/// Schema names are interpolated into DDL, so only plain identifiers are accepted
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Build a PlayerRecord from a row selected with SELECT_COLUMNS
pub fn record_from_row(row: PgRow) -> Result<PlayerRecord, DatabaseError> {
    let archetype: Json<Archetype> = pg_get_field!(row, "archetype");
    let persona: Option<Json<Persona>> = pg_get_field!(row, "persona");
    let element: Option<Json<Element>> = pg_get_field!(row, "element");
    let insights: Option<Json<Insights>> = pg_get_field!(row, "insights");
    let pro_comparison: Option<Json<ProComparison>> = pg_get_field!(row, "pro_comparison");
    let top_strengths: Json<Vec<String>> = pg_get_field!(row, "top_strengths");
    let needs_work: Json<Vec<String>> = pg_get_field!(row, "needs_work");

    Ok(PlayerRecord {
        id: pg_get_field!(row, "id"),
        puuid: pg_get_field!(row, "puuid"),
        riot_id: pg_get_field!(row, "riot_id"),
        tag_line: pg_get_field!(row, "tag_line"),
        archetype: archetype.0,
        persona: persona.map(|p| p.0),
        element: element.map(|e| e.0),
        insights: insights.map(|i| i.0),
        pro_comparison: pro_comparison.map(|p| p.0),
        top_strengths: top_strengths.0,
        needs_work: needs_work.0,
        total_games: pg_get_field!(row, "total_games"),
        win_rate: pg_get_field!(row, "win_rate"),
        generated_at: pg_get_field!(row, "generated_at"),
    })
}
