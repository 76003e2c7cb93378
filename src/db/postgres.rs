use crate::config::DatabaseConfig;
use crate::db::error::DatabaseError;
use crate::db::filter::{RecordFilter, RecordPatch};
use crate::db::models::PlayerRecord;
use crate::db::pg_schema::{self, SELECT_COLUMNS, TABLE_DEFINITION};
use crate::db::store::RecordStore;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// A PostgreSQL implementation of the RecordStore trait
pub struct PostgresRecordStore {
    pool: PgPool,
    schema: Option<String>,
}

impl PostgresRecordStore {
    /// Create a new PostgresRecordStore from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Self::new_with_schema(&config.url, config.schema.clone(), config.max_connections).await
    }

    /// Create a new PostgresRecordStore bound to a specific schema.
    ///
    /// When a schema is given it is created, together with the `players`
    /// table, if it does not exist yet.
    pub async fn new_with_schema(
        database_url: &str,
        schema: Option<String>,
        max_connections: u32,
    ) -> Result<Self, DatabaseError> {
        if let Some(name) = &schema {
            if !pg_schema::is_valid_identifier(name) {
                return Err(DatabaseError::ConnectionError(format!(
                    "Invalid schema name: {}",
                    name
                )));
            }
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(60))
            .connect_lazy(database_url)
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                DatabaseError::ConnectionError(e.to_string())
            })?;

        if let Err(e) = sqlx::query("SELECT 1").execute(&pool).await {
            error!("Database connectivity test failed: {}", e);
            return Err(DatabaseError::ConnectionError(format!(
                "Database is not accessible: {}",
                e
            )));
        };

        let store = PostgresRecordStore { pool, schema };

        if let Some(ref schema_name) = store.schema {
            store.initialize_schema(schema_name).await?;
        }

        info!("PostgreSQL record store connection established successfully");
        Ok(store)
    }

    /// Create the schema and the players table if they are missing
    async fn initialize_schema(&self, schema_name: &str) -> Result<(), DatabaseError> {
        info!("Initializing schema: {}", schema_name);

        let create_schema_query = format!("CREATE SCHEMA IF NOT EXISTS {}", schema_name);
        debug!("Executing: {}", create_schema_query);
        sqlx::query(&create_schema_query)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to create schema '{}': {}", schema_name, e);
                DatabaseError::QueryError(format!("Failed to create schema: {}", e))
            })?;

        let create_table_query = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.table_name(),
            TABLE_DEFINITION
        );
        debug!("Creating players table in schema '{}'", schema_name);
        sqlx::query(&create_table_query)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to create players table: {}", e);
                DatabaseError::QueryError(format!("Failed to create table: {}", e))
            })?;

        let create_index_query = format!(
            "CREATE INDEX IF NOT EXISTS players_generated_at_idx ON {} (generated_at)",
            self.table_name()
        );
        sqlx::query(&create_index_query)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to create index: {}", e);
                DatabaseError::QueryError(format!("Failed to create index: {}", e))
            })?;

        info!(
            "Schema '{}' initialization completed successfully",
            schema_name
        );
        Ok(())
    }

    /// Get the table name with schema prefix if applicable
    fn table_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.players", schema),
            None => "players".to_string(),
        }
    }

    /// Drop the schema this store was created with (test-only)
    #[cfg(test)]
    pub async fn drop_schema(&self) -> Result<(), DatabaseError> {
        if let Some(schema) = &self.schema {
            sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", schema))
                .execute(&self.pool)
                .await
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        }
        Ok(())
    }
}

/// Append the WHERE clause for `filter`
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &RecordFilter) {
    match filter {
        RecordFilter::All => {}
        RecordFilter::AnalyzedAfter(sentinel) => {
            builder.push(" WHERE generated_at > ");
            builder.push_bind(*sentinel);
        }
        RecordFilter::Player { riot_id, tag_line } => {
            builder.push(" WHERE riot_id = ");
            builder.push_bind(riot_id.clone());
            builder.push(" AND tag_line = ");
            builder.push_bind(tag_line.clone());
        }
    }
}

// SQLSTATE undefined_table
const UNDEFINED_TABLE: &str = "42P01";

fn is_missing_table(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db_error| db_error.code())
        .is_some_and(|code| code == UNDEFINED_TABLE)
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn select(&self, filter: &RecordFilter) -> Result<Vec<PlayerRecord>, DatabaseError> {
        debug!("Selecting players with filter={:?}", filter);

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM {}",
            SELECT_COLUMNS,
            self.table_name()
        ));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY riot_id ASC, tag_line ASC");

        let rows = match builder.build().fetch_all(&self.pool).await {
            Ok(rows) => rows,
            Err(e) if is_missing_table(&e) => {
                warn!("Players table does not exist, returning empty result");
                return Ok(Vec::new());
            }
            Err(e) => {
                error!("Database query failed: {}", e);
                return Err(DatabaseError::QueryError(e.to_string()));
            }
        };

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            result.push(pg_schema::record_from_row(row)?);
        }

        debug!("Retrieved {} players from database", result.len());
        Ok(result)
    }

    async fn update(
        &self,
        filter: &RecordFilter,
        patch: &RecordPatch,
    ) -> Result<u64, DatabaseError> {
        debug!("Updating players with filter={:?}, patch={:?}", filter, patch);

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("UPDATE {} SET ", self.table_name()));
        match patch {
            RecordPatch::SetGeneratedAt(ts) => {
                builder.push("generated_at = ");
                builder.push_bind(*ts);
            }
        }
        push_filter(&mut builder, filter);

        match builder.build().execute(&self.pool).await {
            Ok(done) => Ok(done.rows_affected()),
            Err(e) => {
                error!("Bulk update failed: {}", e);
                Err(DatabaseError::QueryError(e.to_string()))
            }
        }
    }

    async fn delete(&self, filter: &RecordFilter) -> Result<u64, DatabaseError> {
        debug!("Deleting players with filter={:?}", filter);

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("DELETE FROM {}", self.table_name()));
        push_filter(&mut builder, filter);

        match builder.build().execute(&self.pool).await {
            Ok(done) => Ok(done.rows_affected()),
            Err(e) => {
                error!("Bulk delete failed: {}", e);
                Err(DatabaseError::QueryError(e.to_string()))
            }
        }
    }

    #[cfg(test)]
    async fn add_record(&self, record: PlayerRecord) -> Result<(), DatabaseError> {
        use sqlx::types::Json;

        let query = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
            self.table_name(),
            SELECT_COLUMNS
        );

        sqlx::query(&query)
            .bind(record.id)
            .bind(&record.puuid)
            .bind(&record.riot_id)
            .bind(&record.tag_line)
            .bind(Json(&record.archetype))
            .bind(record.persona.as_ref().map(Json))
            .bind(record.element.as_ref().map(Json))
            .bind(record.insights.as_ref().map(Json))
            .bind(record.pro_comparison.as_ref().map(Json))
            .bind(Json(&record.top_strengths))
            .bind(Json(&record.needs_work))
            .bind(record.total_games)
            .bind(record.win_rate)
            .bind(record.generated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to insert player: {}", e);
                DatabaseError::QueryError(e.to_string())
            })?;

        Ok(())
    }
}
