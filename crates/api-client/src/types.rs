//! Wire models for the RPG Assistant API
//!
//! Records owned by the service are modelled with the fields the backend
//! currently returns, plus a flattened `extra` map so that unknown fields
//! survive a round trip through this layer untouched. Modelled optional
//! fields sent as `null` are written back as absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Campaign identifier assigned by the service
pub type CampaignId = i64;

/// Response of `POST /auth/token`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for subsequent requests
    pub access_token: String,

    /// Token type, normally "bearer"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address, also the login username
    pub email: String,
    /// Plain-text password
    pub password: String,
    /// Display name
    pub full_name: String,
}

/// User profile returned by `GET /auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: i64,

    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// Whether the account is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    /// Subscription tier (e.g., "free")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<String>,

    /// Fields this client does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Create a user with only an identifier
    pub fn new(id: i64) -> Self {
        Self {
            id,
            email: None,
            full_name: None,
            avatar_url: None,
            is_active: None,
            subscription_status: None,
            extra: Map::new(),
        }
    }
}

/// Campaign record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    /// Campaign identifier
    pub id: CampaignId,

    /// Campaign name
    #[serde(default)]
    pub name: String,

    /// Game system (e.g., "D&D 5e")
    #[serde(default)]
    pub rpg_system: String,

    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-form game master notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_notes: Option<String>,

    /// Creation timestamp as sent by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Last update timestamp as sent by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Fields this client does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /campaigns/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCampaign {
    /// Campaign name
    pub name: String,
    /// Game system
    pub rpg_system: String,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewCampaign {
    /// Create a campaign payload without a description
    pub fn new(name: impl Into<String>, rpg_system: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rpg_system: rpg_system.into(),
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Body of `PUT /campaigns/{id}`
///
/// Only the fields that are set are sent, so the server leaves the others
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignUpdate {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New game system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpg_system: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_notes: Option<String>,
}
