use thiserror::Error;

/// Message used when a failure carries no message of its own
pub const FALLBACK_MESSAGE: &str = "Failed to upload share card";

/// Errors returned by a publish endpoint
#[derive(Error, Debug)]
pub enum EndpointError {
    /// The endpoint could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered with a failure status
    #[error("Endpoint rejected the request with status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// Anything else; may or may not carry a message
    #[error("Unknown endpoint failure")]
    Unknown(Option<String>),
}

impl EndpointError {
    /// The failure's own human-readable message, if it has one
    pub fn message(&self) -> Option<&str> {
        let message = match self {
            EndpointError::Network(message) => Some(message.as_str()),
            EndpointError::Rejected { message, .. } => message.as_deref(),
            EndpointError::Unknown(message) => message.as_deref(),
        };
        message.filter(|m| !m.is_empty())
    }
}

/// Errors surfaced by the publish pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The endpoint was unreachable or returned a failure
    #[error("{message}")]
    Endpoint { message: String },

    /// A non-standard failure
    #[error("{message}")]
    Unknown { message: String },

    /// Another publish is already in flight on this pipeline
    #[error("A share card upload is already in progress")]
    AlreadyInFlight,
}

impl PublishError {
    /// Human-readable message suitable for showing to the player
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<EndpointError> for PublishError {
    fn from(e: EndpointError) -> Self {
        let message = e.message().unwrap_or(FALLBACK_MESSAGE).to_string();
        match e {
            EndpointError::Network(_) | EndpointError::Rejected { .. } => {
                PublishError::Endpoint { message }
            }
            EndpointError::Unknown(_) => PublishError::Unknown { message },
        }
    }
}
