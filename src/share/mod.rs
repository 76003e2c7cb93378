pub mod endpoint;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod http;
pub mod pipeline;
pub mod summary;

pub use endpoint::PublishEndpoint;
pub use error::{EndpointError, PublishError};
#[cfg(test)]
pub use fake::FakePublishEndpoint;
pub use http::HttpPublishEndpoint;
pub use pipeline::{PublishPipeline, PublishStatus};
pub use summary::{build_summary, ShareCardPayload, ShareCardPlayerSummary};
