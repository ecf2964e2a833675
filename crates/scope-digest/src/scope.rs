//! The scope: observable context plus its watch registry.
//!
//! Properties are read and written directly between digests. Watchers are
//! appended in registration order and are never removed. The digest cycle
//! itself lives in `digest.rs`.

use std::fmt;

use crate::config::ScopeConfig;
use crate::context::Context;
use crate::diagnostics::{DiagnosticsContext, DigestStats};
use crate::error::ConfigError;
use crate::tick::DigestCounter;
use crate::value::Value;
use crate::watcher::{WatchId, Watcher};

pub struct Scope {
    pub(crate) context: Context,
    pub(crate) watchers: Vec<Watcher>,
    /// Most recently fired watcher of the running digest
    pub(crate) last_dirty_watch: Option<WatchId>,
    pub(crate) config: ScopeConfig,
    pub(crate) counter: DigestCounter,
    pub(crate) diagnostics: DiagnosticsContext,
    pub(crate) last_stats: Option<DigestStats>,
    pub(crate) digesting: bool,
}

impl Scope {
    pub fn new() -> Self {
        Self::from_parts(Context::new(), ScopeConfig::default())
    }

    pub fn with_config(config: ScopeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(Context::new(), config))
    }

    /// Scope over an existing context, e.g. one seeded with [`Context::from_json`].
    pub fn with_context(context: Context) -> Self {
        Self::from_parts(context, ScopeConfig::default())
    }

    fn from_parts(context: Context, config: ScopeConfig) -> Self {
        Self {
            context,
            watchers: Vec::new(),
            last_dirty_watch: None,
            config,
            counter: DigestCounter::new(),
            diagnostics: DiagnosticsContext::new(),
            last_stats: None,
            digesting: false,
        }
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    // Context access

    pub fn get(&self, key: &str) -> Value {
        self.context.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.context.set(key, value)
    }

    pub fn update(&mut self, key: &str, update: impl FnOnce(&Value) -> Value) {
        self.context.update(key, update)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.context.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.context.contains(key)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    // Watch registry

    /// Register a watcher comparing by identity.
    pub fn watch<F, V, L>(&mut self, watch_fn: F, listener: L) -> WatchId
    where
        F: FnMut(&Scope) -> V + 'static,
        V: Into<Value> + 'static,
        L: FnMut(&Value, &Value, &mut Scope) + 'static,
    {
        self.register(Watcher::new(watch_fn).with_listener(listener))
    }

    /// Register a watcher comparing by structure. In-place mutation of a
    /// watched list or object is detected.
    pub fn watch_deep<F, V, L>(&mut self, watch_fn: F, listener: L) -> WatchId
    where
        F: FnMut(&Scope) -> V + 'static,
        V: Into<Value> + 'static,
        L: FnMut(&Value, &Value, &mut Scope) + 'static,
    {
        self.register(
            Watcher::new(watch_fn)
                .with_listener(listener)
                .compare_by_value(),
        )
    }

    /// Register a watcher without a listener.
    pub fn watch_fn_only<F, V>(&mut self, watch_fn: F) -> WatchId
    where
        F: FnMut(&Scope) -> V + 'static,
        V: Into<Value> + 'static,
    {
        self.register(Watcher::new(watch_fn))
    }

    /// Append a watcher to the registry.
    ///
    /// Safe to call from a listener: the running pass walks the registry by
    /// index and reaches the new watcher before it ends.
    pub fn register(&mut self, watcher: Watcher) -> WatchId {
        let id = WatchId(self.watchers.len());
        self.watchers.push(watcher);
        self.last_dirty_watch = None;
        log::trace!("registered {id}");
        id
    }

    pub fn watch_count(&self) -> usize {
        self.watchers.len()
    }

    pub fn watcher(&self, id: WatchId) -> Option<&Watcher> {
        self.watchers.get(id.0)
    }

    // Evaluation

    /// Call `f` with this scope.
    pub fn eval<R>(&self, f: impl FnOnce(&Scope, Option<&Context>) -> R) -> R {
        f(self, None)
    }

    /// Call `f` with this scope and a set of locals.
    pub fn eval_with<R>(
        &self,
        f: impl FnOnce(&Scope, Option<&Context>) -> R,
        locals: &Context,
    ) -> R {
        f(self, Some(locals))
    }

    // Diagnostics

    pub fn enable_diagnostics(&mut self) {
        self.diagnostics.enable();
    }

    pub fn diagnostics(&self) -> &DiagnosticsContext {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticsContext {
        &mut self.diagnostics
    }

    /// Counters from the most recent digest, including a failed one.
    pub fn last_digest_stats(&self) -> Option<&DigestStats> {
        self.last_stats.as_ref()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("context", &self.context)
            .field("watchers", &self.watchers.len())
            .field("last_dirty_watch", &self.last_dirty_watch)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
