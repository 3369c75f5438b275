//! Local session-selection cache trait.
//!
//! A single persisted value: the active session id for this user agent.
//! Read once at startup, written on every selection change. Process-local
//! by design -- never synchronized across user agents.

use parlance_types::error::StoreError;
use uuid::Uuid;

/// Port for the durable local cache of the active session id.
///
/// Implementations live in parlance-infra (e.g., `SqliteSelectionCache`).
pub trait SelectionCache: Send + Sync {
    /// The cached selection, if any.
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<Uuid>, StoreError>> + Send;

    /// Overwrite the cached selection.
    fn store(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
