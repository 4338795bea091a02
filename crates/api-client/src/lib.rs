//! REST API client for the RPG Assistant service
//!
//! This crate provides the HTTP plumbing (requests, responses, errors and
//! client configuration) and the wire models exchanged with the backend's
//! `/auth` and `/campaigns` endpoints.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod http;
pub mod types;

pub use http::{ApiClient, ApiClientConfig, ApiError, ApiRequest, ApiResponse, HttpMethod};
pub use types::{
    Campaign, CampaignId, CampaignUpdate, NewCampaign, RegisterRequest, TokenResponse, User,
};

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
