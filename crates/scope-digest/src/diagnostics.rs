//! Diagnostics for the digest cycle.
//!
//! Answers "which watchers fired, when, and with what?" for debugging
//! digests that converge slowly or not at all.

use smallvec::SmallVec;

use crate::tick::DigestSeq;
use crate::value::Value;
use crate::watcher::WatchId;

/// Counters for a single digest call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigestStats {
    pub digest: u64,
    /// Passes run, including the final clean one
    pub passes: u32,
    /// Watch function calls across all passes
    pub evaluations: usize,
    /// Listener invocations across all passes
    pub fired: usize,
    pub converged: bool,
}

impl DigestStats {
    pub fn new(digest: u64) -> Self {
        Self {
            digest,
            ..Self::default()
        }
    }
}

/// A recorded listener firing
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub seq: DigestSeq,
    pub watch: WatchId,
    /// `None` on the watcher's first evaluation
    pub old_value: Option<Value>,
    pub new_value: Value,
}

/// Change log, off unless enabled
#[derive(Debug, Default)]
pub struct DiagnosticsContext {
    pub enabled: bool,
    pub changes: Vec<ChangeEvent>,
}

impl DiagnosticsContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }

    /// Values are deep-copied so later in-place mutation does not rewrite history.
    pub fn record_change(
        &mut self,
        seq: DigestSeq,
        watch: WatchId,
        old_value: Option<&Value>,
        new_value: &Value,
    ) {
        if self.enabled {
            self.changes.push(ChangeEvent {
                seq,
                watch,
                old_value: old_value.map(Value::deep_clone),
                new_value: new_value.deep_clone(),
            });
        }
    }

    pub fn changes_in_digest(&self, digest: u64) -> Vec<&ChangeEvent> {
        self.changes.iter().filter(|e| e.seq.digest == digest).collect()
    }

    /// Watchers that fired during one pass, in firing order
    pub fn fired_in_pass(&self, seq: DigestSeq) -> SmallVec<[WatchId; 8]> {
        self.changes
            .iter()
            .filter(|e| e.seq == seq)
            .map(|e| e.watch)
            .collect()
    }

    /// Most recent firing of a watcher
    pub fn last_change_of(&self, watch: WatchId) -> Option<&ChangeEvent> {
        self.changes.iter().rev().find(|e| e.watch == watch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_records_nothing() {
        let mut diagnostics = DiagnosticsContext::new();
        diagnostics.record_change(DigestSeq::new(1, 1), WatchId(0), None, &Value::int(1));
        assert!(diagnostics.changes.is_empty());
    }

    #[test]
    fn test_recorded_values_are_snapshots() {
        let mut diagnostics = DiagnosticsContext::new();
        diagnostics.enable();

        let list = Value::list([Value::int(1)]);
        diagnostics.record_change(DigestSeq::new(1, 1), WatchId(0), None, &list);
        list.push(Value::int(2));

        let event = diagnostics.last_change_of(WatchId(0)).unwrap();
        assert_eq!(event.new_value.len(), Some(1));
        assert!(event.old_value.is_none());
    }

    #[test]
    fn test_queries_by_pass_and_digest() {
        let mut diagnostics = DiagnosticsContext::new();
        diagnostics.enable();
        diagnostics.record_change(DigestSeq::new(1, 1), WatchId(0), None, &Value::int(1));
        diagnostics.record_change(DigestSeq::new(1, 1), WatchId(2), None, &Value::int(1));
        diagnostics.record_change(DigestSeq::new(1, 2), WatchId(1), None, &Value::int(1));
        diagnostics.record_change(
            DigestSeq::new(2, 1),
            WatchId(0),
            Some(&Value::int(1)),
            &Value::int(2),
        );

        assert_eq!(
            diagnostics.fired_in_pass(DigestSeq::new(1, 1)).as_slice(),
            &[WatchId(0), WatchId(2)]
        );
        assert_eq!(diagnostics.changes_in_digest(1).len(), 3);
        assert_eq!(
            diagnostics.last_change_of(WatchId(0)).map(|e| e.seq),
            Some(DigestSeq::new(2, 1))
        );
    }
}
