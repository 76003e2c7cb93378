use crate::share::endpoint::PublishEndpoint;
use crate::share::error::EndpointError;
use crate::share::summary::ShareCardPayload;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// How the fake answers the next calls
#[derive(Debug, Clone)]
enum FakeBehavior {
    Succeed(serde_json::Value),
    Reject(Option<String>),
    Unknown(Option<String>),
}

/// `FakePublishEndpoint` is an in-memory implementation of the `PublishEndpoint`
/// trait for testing purposes. It records every payload it receives and can be
/// told to fail or to hold requests until released.
#[derive(Clone)]
pub struct FakePublishEndpoint {
    behavior: Arc<Mutex<FakeBehavior>>,
    received: Arc<Mutex<Vec<ShareCardPayload>>>,
    gate: Arc<Mutex<Option<Arc<Semaphore>>>>,
}

impl FakePublishEndpoint {
    /// Create a fake that answers every call with `{"ok": true}`
    pub fn new() -> Self {
        FakePublishEndpoint {
            behavior: Arc::new(Mutex::new(FakeBehavior::Succeed(
                serde_json::json!({ "ok": true }),
            ))),
            received: Arc::new(Mutex::new(Vec::new())),
            gate: Arc::new(Mutex::new(None)),
        }
    }

    /// Answer subsequent calls with `response`
    pub fn fake_respond_with(&self, response: serde_json::Value) {
        *self.behavior.lock().unwrap() = FakeBehavior::Succeed(response);
    }

    /// Reject subsequent calls with the given message
    pub fn fake_reject(&self, message: Option<&str>) {
        *self.behavior.lock().unwrap() = FakeBehavior::Reject(message.map(str::to_string));
    }

    /// Fail subsequent calls with a non-standard error
    pub fn fake_fail_unknown(&self, message: Option<&str>) {
        *self.behavior.lock().unwrap() = FakeBehavior::Unknown(message.map(str::to_string));
    }

    /// Hold every subsequent call until `fake_release` is called
    pub fn fake_hold(&self) {
        *self.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let held calls through and stop holding new ones
    pub fn fake_release(&self) {
        if let Some(gate) = self.gate.lock().unwrap().take() {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    /// Every payload received so far, in order
    pub fn fake_received(&self) -> Vec<ShareCardPayload> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublishEndpoint for FakePublishEndpoint {
    async fn publish(
        &self,
        payload: &ShareCardPayload,
    ) -> Result<serde_json::Value, EndpointError> {
        self.received.lock().unwrap().push(payload.clone());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| EndpointError::Unknown(Some(e.to_string())))?;
        }

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            FakeBehavior::Succeed(response) => Ok(response),
            FakeBehavior::Reject(message) => Err(EndpointError::Rejected {
                status: 500,
                message,
            }),
            FakeBehavior::Unknown(message) => Err(EndpointError::Unknown(message)),
        }
    }
}

impl Default for FakePublishEndpoint {
    fn default() -> Self {
        Self::new()
    }
}
