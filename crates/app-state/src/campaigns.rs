//! Campaign state management
//!
//! This module holds the user's campaign list and the currently selected
//! campaign, and implements the list/create/get/update/delete calls against
//! the `/campaigns` endpoints. Every call is authorized with the token held
//! by the injected [`SessionStore`].
//!
//! Only the read calls ([`CampaignStore::load_campaigns`] and
//! [`CampaignStore::load_campaign`]) toggle `is_loading`; create, update and
//! delete leave it untouched.

use api_client::{ApiClient, ApiRequest, Campaign, CampaignId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::{Result, StoreError};
use crate::session::SessionStore;

const COLLECTION_PATH: &str = "/campaigns/";

fn campaign_path(id: CampaignId) -> String {
    format!("/campaigns/{}", id)
}

/// Snapshot of the campaign collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignState {
    /// Campaigns in server order
    pub campaigns: Vec<Campaign>,
    /// Campaign opened by the user
    pub current_campaign: Option<Campaign>,
    /// Whether a list or single-campaign load is in flight
    pub is_loading: bool,
}

/// Campaign store
///
/// # Example
///
/// ```rust,no_run
/// use api_client::{ApiClient, NewCampaign};
/// use app_state::{CampaignStore, SessionStore};
///
/// async fn example(client: ApiClient, session: SessionStore) -> app_state::Result<()> {
///     let campaigns = CampaignStore::new(client, session);
///
///     campaigns.load_campaigns().await?;
///     let created = campaigns
///         .create_campaign(&NewCampaign::new("Curse of Strahd", "D&D 5e"))
///         .await?;
///     campaigns.load_campaign(created.id).await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CampaignStore {
    client: ApiClient,
    session: SessionStore,
    state: Arc<watch::Sender<CampaignState>>,
}

impl CampaignStore {
    /// Create an empty campaign store bound to a session
    pub fn new(client: ApiClient, session: SessionStore) -> Self {
        let (state, _) = watch::channel(CampaignState::default());
        Self { client, session, state: Arc::new(state) }
    }

    /// Get the current state snapshot
    pub fn snapshot(&self) -> CampaignState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<CampaignState> {
        self.state.subscribe()
    }

    /// Get the loaded campaigns
    pub fn campaigns(&self) -> Vec<Campaign> {
        self.state.borrow().campaigns.clone()
    }

    /// Get the current campaign
    pub fn current_campaign(&self) -> Option<Campaign> {
        self.state.borrow().current_campaign.clone()
    }

    /// Check whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    fn bearer_token(&self) -> Result<String> {
        self.session
            .token()
            .ok_or_else(|| StoreError::authentication("Not authenticated"))
    }

    /// Load the campaign list, replacing the current one
    ///
    /// On failure the previous list is kept.
    pub async fn load_campaigns(&self) -> Result<()> {
        self.start_loading();

        match self.fetch_campaigns().await {
            Ok(campaigns) => {
                tracing::debug!(count = campaigns.len(), "loaded campaigns");
                self.state.send_modify(|state| {
                    state.campaigns = campaigns;
                    state.is_loading = false;
                });
                Ok(())
            }
            Err(e) => {
                self.finish_loading();
                Err(e)
            }
        }
    }

    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>> {
        let token = self.bearer_token()?;

        let response = self
            .client
            .send::<Vec<Campaign>>(ApiRequest::get(COLLECTION_PATH).bearer(&token))
            .await
            .map_err(|e| StoreError::resource("Failed to load campaigns", e))?;

        Ok(response.data)
    }

    /// Create a campaign and append the server's record to the list
    pub async fn create_campaign<B>(&self, data: &B) -> Result<Campaign>
    where
        B: Serialize + ?Sized,
    {
        let token = self.bearer_token()?;
        let request = ApiRequest::post(COLLECTION_PATH).bearer(&token).json_body(data)?;

        let created = self
            .client
            .send::<Campaign>(request)
            .await
            .map_err(|e| StoreError::resource("Failed to create campaign", e))?
            .data;

        tracing::debug!(campaign_id = created.id, "created campaign");
        self.state.send_modify(|state| state.campaigns.push(created.clone()));

        Ok(created)
    }

    /// Load one campaign and make it the current campaign
    pub async fn load_campaign(&self, id: CampaignId) -> Result<Campaign> {
        self.start_loading();

        match self.fetch_campaign(id).await {
            Ok(campaign) => {
                self.state.send_modify(|state| {
                    state.current_campaign = Some(campaign.clone());
                    state.is_loading = false;
                });
                Ok(campaign)
            }
            Err(e) => {
                self.finish_loading();
                Err(e)
            }
        }
    }

    async fn fetch_campaign(&self, id: CampaignId) -> Result<Campaign> {
        let token = self.bearer_token()?;

        let response = self
            .client
            .send::<Campaign>(ApiRequest::get(campaign_path(id)).bearer(&token))
            .await
            .map_err(|e| StoreError::resource("Failed to load campaign", e))?;

        Ok(response.data)
    }

    /// Update a campaign
    ///
    /// The server's record becomes the current campaign and replaces the
    /// list entry with identifier `id`; other entries keep their position.
    pub async fn update_campaign<B>(&self, id: CampaignId, updates: &B) -> Result<Campaign>
    where
        B: Serialize + ?Sized,
    {
        let token = self.bearer_token()?;
        let request = ApiRequest::put(campaign_path(id)).bearer(&token).json_body(updates)?;

        let updated = self
            .client
            .send::<Campaign>(request)
            .await
            .map_err(|e| StoreError::resource("Failed to update campaign", e))?
            .data;

        self.state.send_modify(|state| {
            state.current_campaign = Some(updated.clone());
            for campaign in state.campaigns.iter_mut().filter(|c| c.id == id) {
                *campaign = updated.clone();
            }
        });

        Ok(updated)
    }

    /// Delete a campaign
    ///
    /// Removes it from the list and clears the current campaign if it was
    /// the one deleted.
    pub async fn delete_campaign(&self, id: CampaignId) -> Result<()> {
        let token = self.bearer_token()?;

        self.client
            .send::<serde_json::Value>(ApiRequest::delete(campaign_path(id)).bearer(&token))
            .await
            .map_err(|e| StoreError::resource("Failed to delete campaign", e))?;

        tracing::debug!(campaign_id = id, "deleted campaign");
        self.state.send_modify(|state| {
            state.campaigns.retain(|c| c.id != id);
            if state.current_campaign.as_ref().is_some_and(|c| c.id == id) {
                state.current_campaign = None;
            }
        });

        Ok(())
    }

    fn start_loading(&self) {
        self.state.send_modify(|state| state.is_loading = true);
    }

    fn finish_loading(&self) {
        self.state.send_modify(|state| state.is_loading = false);
    }
}
