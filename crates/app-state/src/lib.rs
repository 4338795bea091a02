//! Application state management for RPG Assistant
//!
//! This crate provides the observable state containers the UI binds to:
//! the session (who is signed in) and the campaign collection. Both are
//! explicit objects, constructed once and shared by cloning.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod campaigns;
pub mod error;
pub mod session;

pub use campaigns::{CampaignState, CampaignStore};
pub use error::{Result, StoreError};
pub use session::{SessionState, SessionStore};
