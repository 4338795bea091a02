//! Errors shared by the state containers

use api_client::ApiError;
use storage::KvError;
use thiserror::Error;

/// Store operation errors
///
/// The first three variants display as their bare message, which is what
/// the UI shows to the user.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Bad credentials, missing token or failed profile fetch
    #[error("{0}")]
    Authentication(String),

    /// Registration rejected by the server
    #[error("{0}")]
    Registration(String),

    /// A campaign request failed
    #[error("{message}")]
    Resource {
        /// Message for the failed operation
        message: String,
        /// Underlying API error
        #[source]
        source: ApiError,
    },

    /// Durable storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] KvError),

    /// Request body or stored record could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn authentication(message: impl Into<String>) -> Self {
        StoreError::Authentication(message.into())
    }

    pub(crate) fn resource(message: impl Into<String>, source: ApiError) -> Self {
        StoreError::Resource { message: message.into(), source }
    }

    /// HTTP status behind a resource failure, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Resource { source, .. } if !source.is_transport_error() => {
                Some(source.status())
            }
            _ => None,
        }
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
