//! Infrastructure layer for Parlance.
//!
//! Contains implementations of the gateway traits defined in
//! `parlance-core`: SQLite storage for sessions, messages, and the local
//! selection cache, plus the HTTP provider clients for the two generation
//! capabilities.

pub mod config;
pub mod provider;
pub mod sqlite;
