use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::cache::error::InvalidatorError;
use crate::cache::freshness::StalenessPolicy;
use crate::db::{CachedPlayer, RecordFilter, RecordPatch, RecordStore};

/// The bulk action a maintenance run performs after listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceAction {
    /// Rewind every analyzed record's marker to `now - stale_before`
    MarkStale { stale_before: Duration },
    /// Delete every analyzed record
    DeleteAll,
}

impl fmt::Display for MaintenanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceAction::MarkStale { stale_before } => {
                write!(f, "mark stale ({}h)", stale_before.num_hours())
            }
            MaintenanceAction::DeleteAll => write!(f, "delete all"),
        }
    }
}

/// Outcome of one maintenance run
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceReport {
    pub action: MaintenanceAction,
    pub listed: Vec<CachedPlayer>,
    pub affected: u64,
}

/// Forces recomputation of derived player attributes by rewinding the
/// recency marker, or purges the cached records altogether
pub struct StalenessInvalidator<S: RecordStore> {
    store: Arc<S>,
    policy: StalenessPolicy,
}

impl<S: RecordStore> StalenessInvalidator<S> {
    pub fn new(store: S, policy: StalenessPolicy) -> Self {
        Self::with_shared_store(Arc::new(store), policy)
    }

    pub fn with_shared_store(store: Arc<S>, policy: StalenessPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &StalenessPolicy {
        &self.policy
    }

    fn analyzed_filter(&self) -> RecordFilter {
        RecordFilter::AnalyzedAfter(self.policy.sentinel)
    }

    /// List every analyzed player for the operator; read-only
    pub async fn list_cached_players(&self) -> Result<Vec<CachedPlayer>, InvalidatorError> {
        let records = self.store.select(&self.analyzed_filter()).await?;
        Ok(records.into_iter().map(CachedPlayer::from).collect())
    }

    /// Mark every analyzed record stale, using the current time as reference
    pub async fn invalidate_all(&self, stale_before: Duration) -> Result<u64, InvalidatorError> {
        self.invalidate_all_at(Utc::now(), stale_before).await
    }

    /// Rewrite `generated_at` of every analyzed record to `now - stale_before`.
    ///
    /// Nothing but the recency marker changes. The rewrite is a single store
    /// update, so atomicity is whatever the store guarantees for one statement.
    pub async fn invalidate_all_at(
        &self,
        now: DateTime<Utc>,
        stale_before: Duration,
    ) -> Result<u64, InvalidatorError> {
        let rewound = now.checked_sub_signed(stale_before).ok_or_else(|| {
            InvalidatorError::InvalidOffset(format!(
                "{} hours before {} is out of range",
                stale_before.num_hours(),
                now
            ))
        })?;

        debug!("Rewinding generated_at to {}", rewound);
        let affected = self
            .store
            .update(&self.analyzed_filter(), &RecordPatch::SetGeneratedAt(rewound))
            .await?;

        info!("Marked {} player records as stale", affected);
        Ok(affected)
    }

    /// Irreversibly delete every analyzed record; never-analyzed rows survive
    pub async fn delete_all(&self) -> Result<u64, InvalidatorError> {
        let deleted = self.store.delete(&self.analyzed_filter()).await?;
        info!("Deleted {} player records", deleted);
        Ok(deleted)
    }

    /// List the cached players, then perform `action`.
    ///
    /// A listing failure aborts the run before anything is modified.
    pub async fn run(&self, action: MaintenanceAction) -> Result<MaintenanceReport, InvalidatorError> {
        info!("Starting maintenance run: {}", action);

        let listed = match self.list_cached_players().await {
            Ok(players) => players,
            Err(e) => {
                error!("Failed to list cached players, aborting: {}", e);
                return Err(e);
            }
        };

        info!("Found {} cached players", listed.len());
        for player in &listed {
            info!(
                "  {}#{} - {}",
                player.riot_id, player.tag_line, player.archetype.name
            );
        }

        let affected = match action {
            MaintenanceAction::MarkStale { stale_before } => {
                self.invalidate_all(stale_before).await
            }
            MaintenanceAction::DeleteAll => self.delete_all().await,
        }
        .inspect_err(|e| error!("Maintenance action '{}' failed: {}", action, e))?;

        Ok(MaintenanceReport {
            action,
            listed,
            affected,
        })
    }
}
