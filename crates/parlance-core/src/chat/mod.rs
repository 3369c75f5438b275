//! Session and message synchronization.
//!
//! `store` defines the persistence-gateway port, `view` the synchronous
//! session-view state machine, `service` the async orchestration that ties
//! the view to the gateway and the generation dispatcher, and `directory`
//! the per-user session list.

pub mod directory;
pub mod service;
pub mod store;
pub mod view;
