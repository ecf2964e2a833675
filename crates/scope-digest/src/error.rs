//! Error types for the scope and its digest cycle.

use thiserror::Error;

use crate::watcher::WatchId;

/// Failure of a [`crate::Scope::digest`] call.
///
/// Listeners that fired before the failure are not rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    /// Watchers kept reporting changes for `ttl` consecutive passes.
    #[error("{ttl} digest iterations reached")]
    TtlExceeded {
        ttl: u32,
        /// Watcher that fired last before giving up
        last_dirty: Option<WatchId>,
    },
    /// `digest` was called from inside a watch function or listener.
    #[error("digest already in progress")]
    InProgress,
}

/// Invalid [`crate::ScopeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("digest ttl must be at least 1")]
    ZeroTtl,
    #[error("failed to parse scope config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A context could not be built from the given input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context must be seeded from a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}
