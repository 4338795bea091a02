//! Storage layer for RPG Assistant
//!
//! This crate provides durable key-value storage for the pieces of client
//! state that must survive a restart, such as the session token.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;

pub use kv::{DurableStorage, KvConfig, KvError, KvStore};
