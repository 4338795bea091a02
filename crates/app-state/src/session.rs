//! Session state management
//!
//! This module holds the signed-in user and bearer token, restores them
//! from durable storage at startup, and implements the login, register and
//! logout flows against the `/auth` endpoints.
//!
//! # Example
//!
//! ```rust,no_run
//! use api_client::{ApiClient, ApiClientConfig};
//! use app_state::SessionStore;
//! use std::sync::Arc;
//! use storage::{KvConfig, KvStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ApiClientConfig::default())?;
//!     let storage = Arc::new(KvStore::new(KvConfig::new("session.db"))?);
//!     let session = SessionStore::new(client, storage);
//!
//!     let user = session.login("gm@example.com", "hunter2").await?;
//!     println!("Signed in as user {}", user.id);
//!
//!     session.logout()?;
//!     Ok(())
//! }
//! ```

use api_client::{ApiClient, ApiRequest, RegisterRequest, TokenResponse, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::DurableStorage;
use tokio::sync::watch;

use crate::error::{Result, StoreError};

/// Storage key for the raw bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key for the JSON-serialized user record
pub const USER_KEY: &str = "user";

/// Snapshot of the session
///
/// `user` and `token` are both set or both unset, except while a login is
/// in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Signed-in user
    pub user: Option<User>,
    /// Bearer token for API requests
    pub token: Option<String>,
    /// Whether a login or registration is in flight
    pub is_loading: bool,
}

/// Session store
///
/// Clones share the same state, so one instance can be handed to every
/// consumer that needs the session (including [`crate::CampaignStore`]).
#[derive(Clone)]
pub struct SessionStore {
    client: ApiClient,
    storage: Arc<dyn DurableStorage>,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionStore {
    /// Create a session store, restoring any persisted session
    ///
    /// The persisted session is used only when both the token and the user
    /// record are present and the user record parses; otherwise the store
    /// starts signed out.
    pub fn new(client: ApiClient, storage: Arc<dyn DurableStorage>) -> Self {
        let initial = Self::restore(storage.as_ref());
        let (state, _) = watch::channel(initial);

        Self { client, storage, state: Arc::new(state) }
    }

    fn restore(storage: &dyn DurableStorage) -> SessionState {
        match (storage.get_item(TOKEN_KEY), storage.get_item(USER_KEY)) {
            (Ok(Some(token)), Ok(Some(user))) => match serde_json::from_str::<User>(&user) {
                Ok(user) => {
                    tracing::info!(user_id = user.id, "restored persisted session");
                    SessionState { user: Some(user), token: Some(token), is_loading: false }
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable persisted user: {}", e);
                    SessionState::default()
                }
            },
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Failed to read persisted session: {}", e);
                SessionState::default()
            }
            _ => SessionState::default(),
        }
    }

    /// Get the current session snapshot
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to session changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Get the current bearer token
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    /// Get the signed-in user
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Check whether a token is held
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().token.is_some()
    }

    /// Check whether a login or registration is in flight
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Log in with email and password
    ///
    /// Exchanges the credentials for a token, fetches the profile with it,
    /// persists both and only then publishes the new session.
    ///
    /// # Errors
    ///
    /// - `Authentication("Invalid credentials")` if the token request fails
    /// - `Authentication("Failed to get user info")` if the profile request fails
    /// - `Storage` / `Serialization` if the session cannot be persisted
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.start_loading();

        match self.authenticate(email, password).await {
            Ok((token, user)) => {
                tracing::info!(user_id = user.id, "logged in");
                self.state.send_replace(SessionState {
                    user: Some(user.clone()),
                    token: Some(token),
                    is_loading: false,
                });
                Ok(user)
            }
            Err(e) => {
                self.finish_loading();
                Err(e)
            }
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<(String, User)> {
        let request = ApiRequest::post("/auth/token")
            .form_body(&[("username", email), ("password", password)]);

        let token = self
            .client
            .send::<TokenResponse>(request)
            .await
            .map_err(|e| {
                tracing::warn!(status = e.status(), "Token request failed: {}", e.message());
                StoreError::authentication("Invalid credentials")
            })?
            .data
            .access_token;

        let user = self
            .client
            .send::<User>(ApiRequest::get("/auth/me").bearer(&token))
            .await
            .map_err(|e| {
                tracing::warn!(status = e.status(), "Profile request failed: {}", e.message());
                StoreError::authentication("Failed to get user info")
            })?
            .data;

        self.persist(&token, &user)?;

        Ok((token, user))
    }

    /// Write the token and user record
    ///
    /// A half-written pair would restore as a session mixing two accounts,
    /// so both keys are removed when either write fails.
    fn persist(&self, token: &str, user: &User) -> Result<()> {
        let serialized = serde_json::to_string(user)?;

        let written = self
            .storage
            .set_item(TOKEN_KEY, token)
            .and_then(|()| self.storage.set_item(USER_KEY, &serialized));

        if let Err(e) = written {
            tracing::warn!("Failed to persist session, clearing stored session: {}", e);
            for key in [TOKEN_KEY, USER_KEY] {
                if let Err(cleanup) = self.storage.remove_item(key) {
                    tracing::warn!(key, "Failed to clear stored session: {}", cleanup);
                }
            }
            return Err(e.into());
        }

        Ok(())
    }

    /// Register a new account, then log in with the same credentials
    ///
    /// # Errors
    ///
    /// `Registration` with the server's `detail` message, or
    /// "Registration failed" when none is given. Errors from the follow-up
    /// [`login`](Self::login) are returned unchanged.
    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> Result<User> {
        self.start_loading();

        if let Err(e) = self.submit_registration(email, password, full_name).await {
            self.finish_loading();
            return Err(e);
        }

        tracing::debug!("registration accepted, logging in");
        self.login(email, password).await
    }

    async fn submit_registration(&self, email: &str, password: &str, full_name: &str) -> Result<()> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
        };
        let request = ApiRequest::post("/auth/register").json_body(&body)?;

        self.client
            .send::<serde_json::Value>(request)
            .await
            .map_err(|e| {
                tracing::warn!(status = e.status(), "Registration rejected: {}", e.message());
                StoreError::Registration(
                    e.detail().unwrap_or("Registration failed").to_string(),
                )
            })?;

        Ok(())
    }

    /// Log out
    ///
    /// Removes the persisted token and user and resets the session. The
    /// in-memory session is reset even when storage fails; the first storage
    /// error is returned.
    pub fn logout(&self) -> Result<()> {
        let token = self.storage.remove_item(TOKEN_KEY);
        let user = self.storage.remove_item(USER_KEY);

        self.state.send_replace(SessionState::default());
        tracing::info!("logged out");

        token.and(user)?;
        Ok(())
    }

    fn start_loading(&self) {
        self.state.send_modify(|state| state.is_loading = true);
    }

    fn finish_loading(&self) {
        self.state.send_modify(|state| state.is_loading = false);
    }
}
