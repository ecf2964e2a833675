//! Dirty-checking scope.
//!
//! A [`Scope`] holds an open-ended set of properties and a list of
//! watchers. Each watcher pairs a watch function, which computes a value
//! from the scope, with a listener that runs when that value changes.
//! [`Scope::digest`] re-evaluates watchers until a full pass sees no
//! change, or gives up after a fixed number of passes.
//!
//! Everything is synchronous and single-threaded: listeners run inside the
//! `digest` call and may mutate the scope or register more watchers.

pub mod config;
pub mod context;
mod digest;
pub mod diagnostics;
pub mod equality;
pub mod error;
pub mod scope;
pub mod tick;
pub mod value;
pub mod watcher;

pub use config::ScopeConfig;
pub use context::Context;
pub use diagnostics::{ChangeEvent, DigestStats};
pub use error::{ConfigError, ContextError, DigestError};
pub use scope::Scope;
pub use tick::DigestSeq;
pub use value::Value;
pub use watcher::{Comparison, WatchId, Watcher};
