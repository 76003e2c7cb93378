use crate::share::error::EndpointError;
use crate::share::summary::ShareCardPayload;
use async_trait::async_trait;
use std::sync::Arc;

/// PublishEndpoint trait defining the backend call that stores a share card
#[async_trait]
pub trait PublishEndpoint: Send + Sync + 'static {
    /// Send `payload` and return the endpoint's success body as-is
    async fn publish(&self, payload: &ShareCardPayload)
        -> Result<serde_json::Value, EndpointError>;
}

/// Implementation of PublishEndpoint trait for Arc<T> where T implements PublishEndpoint
#[async_trait]
impl<T: PublishEndpoint + ?Sized> PublishEndpoint for Arc<T> {
    async fn publish(
        &self,
        payload: &ShareCardPayload,
    ) -> Result<serde_json::Value, EndpointError> {
        (**self).publish(payload).await
    }
}
