//! Error types shared across the workspace.

use crate::registry::RegistryId;

/// Errors surfaced by the registry and by engine calls that address
/// an entity by id.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// The id is not live: never issued, or already removed.
    #[error("no live {kind} with id {id}")]
    NotFound {
        /// Entity kind, e.g. "tank" or "obstacle".
        kind: &'static str,
        /// The stale id.
        id: RegistryId,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
