//! The digest cycle.
//!
//! A digest runs passes over the watch registry until one pass sees no
//! change. Each pass evaluates watchers in registration order, fires the
//! listener of every watcher whose value changed, and stops early once it
//! reaches the last watcher that fired without seeing another change:
//! everything after that point was already clean in the previous pass.

use std::mem;

use crate::diagnostics::DigestStats;
use crate::equality::are_equal;
use crate::error::DigestError;
use crate::scope::Scope;
use crate::value::Value;
use crate::watcher::{Comparison, Last, WatchId, detached_watch_fn, noop_listener};

impl Scope {
    /// Run watchers until their values settle.
    ///
    /// Fails with [`DigestError::TtlExceeded`] when the configured number of
    /// passes all report changes, and with [`DigestError::InProgress`] when
    /// called from a watch function or listener of a running digest.
    pub fn digest(&mut self) -> Result<(), DigestError> {
        if self.digesting {
            return Err(DigestError::InProgress);
        }
        self.digesting = true;
        let result = self.run_digest();
        self.digesting = false;
        result
    }

    fn run_digest(&mut self) -> Result<(), DigestError> {
        self.last_dirty_watch = None;
        self.counter.next_digest();
        let mut stats = DigestStats::new(self.counter.current_digest());
        let mut ttl = self.config.ttl;

        loop {
            self.counter.next_pass();
            let dirty = self.digest_once(&mut stats);
            stats.passes += 1;
            ttl = ttl.saturating_sub(1);

            if dirty && ttl == 0 {
                log::warn!(
                    "digest {} gave up after {} passes, last fired {:?}",
                    stats.digest,
                    stats.passes,
                    self.last_dirty_watch
                );
                self.last_stats = Some(stats);
                return Err(DigestError::TtlExceeded {
                    ttl: self.config.ttl,
                    last_dirty: self.last_dirty_watch,
                });
            }
            if !dirty {
                break;
            }
        }

        stats.converged = true;
        log::debug!(
            "digest {} converged: {} passes, {} evaluations, {} fired",
            stats.digest,
            stats.passes,
            stats.evaluations,
            stats.fired
        );
        self.last_stats = Some(stats);
        Ok(())
    }

    /// One pass over the registry. Returns whether any listener fired.
    fn digest_once(&mut self, stats: &mut DigestStats) -> bool {
        let mut dirty = false;
        // Index walk: listeners may append watchers mid-pass
        let mut index = 0;

        while index < self.watchers.len() {
            let id = WatchId(index);
            let new_value = self.evaluate(index);
            stats.evaluations += 1;

            let watcher = &self.watchers[index];
            let by_value = watcher.comparison == Comparison::Value;
            let changed = match &watcher.last {
                Last::Uninitialized => true,
                Last::Seen(last) => !are_equal(&new_value, last, by_value),
            };

            if changed {
                self.last_dirty_watch = Some(id);
                let stored = if by_value {
                    new_value.deep_clone()
                } else {
                    new_value.clone()
                };
                let previous = mem::replace(&mut self.watchers[index].last, Last::Seen(stored));
                let old_value = match previous {
                    Last::Uninitialized => None,
                    Last::Seen(old) => Some(old),
                };

                let seq = self.counter.current();
                log::trace!("{id} fired in {seq}: {new_value}");
                self.diagnostics.record_change(seq, id, old_value.as_ref(), &new_value);
                stats.fired += 1;

                // First firing reports the new value as the old one
                let old_value = old_value.unwrap_or_else(|| new_value.clone());
                self.notify(index, &new_value, &old_value);
                dirty = true;
            } else if self.last_dirty_watch == Some(id) {
                break;
            }

            index += 1;
        }

        dirty
    }

    /// Call a watcher's function with the whole scope borrowed.
    fn evaluate(&mut self, index: usize) -> Value {
        let mut watch_fn =
            mem::replace(&mut self.watchers[index].watch_fn, detached_watch_fn());
        let value = watch_fn(self);
        self.watchers[index].watch_fn = watch_fn;
        value
    }

    fn notify(&mut self, index: usize, new_value: &Value, old_value: &Value) {
        let mut listener =
            mem::replace(&mut self.watchers[index].listener, noop_listener());
        listener(new_value, old_value, self);
        self.watchers[index].listener = listener;
    }
}
