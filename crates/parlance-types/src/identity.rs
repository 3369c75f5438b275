//! Identity collaborator types.
//!
//! The authentication layer is out of scope for this core; it hands over an
//! already-verified user id plus an optional display profile, and everything
//! downstream treats the id as an opaque string.

use serde::{Deserialize, Serialize};

/// Display profile supplied by the identity collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Opaque, already-verified user identifier.
    pub user_id: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// The name to render for this user, falling back to the raw id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.user_id)
    }
}
