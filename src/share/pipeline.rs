use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::db::PlayerRecord;
use crate::share::endpoint::PublishEndpoint;
use crate::share::error::PublishError;
use crate::share::summary::{build_summary, ShareCardPayload};

/// Upload status of a share card pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Idle,
    Uploading,
    Success,
    Error,
}

#[derive(Debug)]
struct PipelineState {
    status: PublishStatus,
    result: Option<serde_json::Value>,
    error: Option<String>,
    /// Status and error to put back if the upload in flight is cancelled
    restore: Option<(PublishStatus, Option<String>)>,
}

impl PipelineState {
    fn idle() -> Self {
        Self {
            status: PublishStatus::Idle,
            result: None,
            error: None,
            restore: None,
        }
    }
}

/// Publishes share cards for one player and tracks the outcome of the last attempt.
///
/// At most one upload runs per pipeline: `publish` claims the `Uploading`
/// status under the state lock and a second call made meanwhile is rejected
/// with [`PublishError::AlreadyInFlight`].
pub struct PublishPipeline<E: PublishEndpoint> {
    endpoint: Arc<E>,
    player: PlayerRecord,
    state: Mutex<PipelineState>,
}

impl<E: PublishEndpoint> PublishPipeline<E> {
    pub fn new(endpoint: E, player: PlayerRecord) -> Self {
        Self::with_shared_endpoint(Arc::new(endpoint), player)
    }

    pub fn with_shared_endpoint(endpoint: Arc<E>, player: PlayerRecord) -> Self {
        Self {
            endpoint,
            player,
            state: Mutex::new(PipelineState::idle()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The player this pipeline publishes cards for
    pub fn player(&self) -> &PlayerRecord {
        &self.player
    }

    pub fn status(&self) -> PublishStatus {
        self.lock_state().status
    }

    pub fn is_uploading(&self) -> bool {
        self.status() == PublishStatus::Uploading
    }

    /// Body returned by the last successful upload
    pub fn result(&self) -> Option<serde_json::Value> {
        self.lock_state().result.clone()
    }

    /// Message of the last failed upload
    pub fn error(&self) -> Option<String> {
        self.lock_state().error.clone()
    }

    /// Upload `card_image` with `caption` and the player's summary.
    ///
    /// On success the endpoint's body is stored and returned. On failure the
    /// pipeline ends in `Error` with the failure's message, and the same
    /// message is carried by the returned error.
    pub async fn publish(
        &self,
        card_image: &str,
        caption: &str,
    ) -> Result<serde_json::Value, PublishError> {
        let in_flight = self.begin_upload()?;

        let payload = ShareCardPayload {
            card_data_url: card_image.to_string(),
            caption: caption.to_string(),
            player: build_summary(&self.player),
        };

        info!("Publishing share card for {}", self.player.display_name());
        match self.endpoint.publish(&payload).await {
            Ok(result) => {
                debug!("Share card published for {}", self.player.display_name());
                in_flight.succeed(result.clone());
                Ok(result)
            }
            Err(e) => {
                let error = PublishError::from(e);
                warn!(
                    "Failed to publish share card for {}: {}",
                    self.player.display_name(),
                    error
                );
                in_flight.fail(error.message());
                Err(error)
            }
        }
    }

    /// Clear result and error and return to `Idle`.
    ///
    /// An upload in flight keeps the `Uploading` status so single-flight holds,
    /// and if it is then cancelled the pipeline lands in `Idle`.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.result = None;
        state.error = None;
        if state.status == PublishStatus::Uploading {
            state.restore = Some((PublishStatus::Idle, None));
        } else {
            state.status = PublishStatus::Idle;
        }
    }

    fn begin_upload(&self) -> Result<InFlight<'_>, PublishError> {
        let mut state = self.lock_state();
        if state.status == PublishStatus::Uploading {
            return Err(PublishError::AlreadyInFlight);
        }

        let previous = (state.status, state.error.take());
        state.restore = Some(previous);
        state.status = PublishStatus::Uploading;

        Ok(InFlight {
            state: &self.state,
            completed: false,
        })
    }
}

/// Owned claim on the `Uploading` status.
///
/// Dropping it without completing (the publish future was cancelled) puts
/// back the status and error held in `PipelineState::restore`.
struct InFlight<'a> {
    state: &'a Mutex<PipelineState>,
    completed: bool,
}

impl InFlight<'_> {
    fn lock(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn succeed(mut self, result: serde_json::Value) {
        self.completed = true;
        let mut state = self.lock();
        state.restore = None;
        state.status = PublishStatus::Success;
        state.result = Some(result);
        state.error = None;
    }

    fn fail(mut self, message: String) {
        self.completed = true;
        let mut state = self.lock();
        state.restore = None;
        state.status = PublishStatus::Error;
        state.error = Some(message);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        let mut state = self.lock();
        let (status, error) = state.restore.take().unwrap_or((PublishStatus::Idle, None));
        state.status = status;
        state.error = error;
    }
}
