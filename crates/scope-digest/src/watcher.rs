//! Watch registrations.

use std::fmt;

use crate::scope::Scope;
use crate::value::Value;

/// Boxed watch function: computes the observed value from the scope.
pub type WatchFn = Box<dyn FnMut(&Scope) -> Value>;

/// Boxed listener: `(new_value, old_value, scope)`.
pub type ListenerFn = Box<dyn FnMut(&Value, &Value, &mut Scope)>;

/// Position of a watcher in its scope's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchId(pub(crate) usize);

impl WatchId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}

/// How a watcher decides that its value changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    /// Identity for lists and objects, value for scalars
    #[default]
    Reference,
    /// Structural comparison; the last value is stored as a deep copy
    Value,
}

/// Last observed value of a watcher.
#[derive(Debug, Clone, Default)]
pub(crate) enum Last {
    /// Never evaluated; differs from every value, including `Undefined`
    #[default]
    Uninitialized,
    Seen(Value),
}

/// A watch function, its listener, and the state used to detect changes.
pub struct Watcher {
    pub(crate) watch_fn: WatchFn,
    pub(crate) listener: ListenerFn,
    pub(crate) comparison: Comparison,
    pub(crate) last: Last,
}

impl Watcher {
    /// Watcher with a no-op listener and reference comparison.
    pub fn new<F, V>(mut watch_fn: F) -> Self
    where
        F: FnMut(&Scope) -> V + 'static,
        V: Into<Value> + 'static,
    {
        Self {
            watch_fn: Box::new(move |scope: &Scope| watch_fn(scope).into()),
            listener: noop_listener(),
            comparison: Comparison::Reference,
            last: Last::Uninitialized,
        }
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: FnMut(&Value, &Value, &mut Scope) + 'static,
    {
        self.listener = Box::new(listener);
        self
    }

    /// Compare by structure instead of identity.
    pub fn compare_by_value(mut self) -> Self {
        self.comparison = Comparison::Value;
        self
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// Value recorded at the last evaluation, `None` before the first digest.
    pub fn last_value(&self) -> Option<&Value> {
        match &self.last {
            Last::Uninitialized => None,
            Last::Seen(value) => Some(value),
        }
    }
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("comparison", &self.comparison)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

pub(crate) fn noop_listener() -> ListenerFn {
    Box::new(|_: &Value, _: &Value, _: &mut Scope| {})
}

/// Stand-in left in the registry while a watcher's own function runs.
pub(crate) fn detached_watch_fn() -> WatchFn {
    Box::new(|_: &Scope| Value::Undefined)
}
