//! Shared domain types for Parlance.
//!
//! This crate contains the core domain types used across the Parlance chat
//! core: sessions, messages, generation request/response shapes, the identity
//! profile, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod error;
pub mod generation;
pub mod identity;
