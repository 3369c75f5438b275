//! Business logic and gateway trait definitions for Parlance.
//!
//! This crate defines the "ports" (persistence gateway, generation backends,
//! selection cache) that the infrastructure layer implements, plus the
//! session-view state machine and the orchestration around it. It depends
//! only on `parlance-types` -- never on `parlance-infra` or any database/IO
//! crate.

pub mod chat;
pub mod generation;
pub mod selection;
