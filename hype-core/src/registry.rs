//! Per-category event-action registry.
//!
//! An ordered container mapping an event key (keyword, threshold, or fixed
//! name) to an ordered list of values — in practice user-configured
//! [`crate::Action`]s, but the container is generic so tests and tooling
//! can instantiate it with anything.
//!
//! Two orderings matter and are both preserved: within one key's list,
//! values run in registration order; across keys, iteration follows key
//! registration order (chat matching fires multi-key hits in that order).
//!
//! Lookup *semantics* are deliberately the caller's problem: fixed-key
//! categories do exact match, chat does case-insensitive substring
//! containment against every key, likes parse keys as numeric thresholds.
//! The registry only stores and orders.

/// Ordered mapping from event key to an ordered list of values.
#[derive(Debug, Clone)]
pub struct EventActionRegistry<T> {
    /// Linear storage keeps key registration order; registries hold
    /// user-configured lists, small enough that scans beat hashing.
    entries: Vec<(String, Vec<T>)>,
}

impl<T> Default for EventActionRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventActionRegistry<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a value to the key's list, creating the key if absent.
    pub fn register(&mut self, event_key: impl Into<String>, value: T) {
        let event_key = event_key.into();
        if let Some((_, values)) = self.entries.iter_mut().find(|(k, _)| *k == event_key) {
            values.push(value);
        } else {
            self.entries.push((event_key, vec![value]));
        }
    }

    /// Remove every value under `event_key` matching the predicate,
    /// dropping the key entirely once its list empties.
    ///
    /// Returns the number of values removed.
    pub fn unregister(&mut self, event_key: &str, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let Some(idx) = self.entries.iter().position(|(k, _)| k == event_key) else {
            return 0;
        };
        let values = &mut self.entries[idx].1;
        let before = values.len();
        values.retain(|v| !predicate(v));
        let removed = before - values.len();
        if values.is_empty() {
            self.entries.remove(idx);
        }
        removed
    }

    /// The ordered value list for an exact key, empty if unregistered.
    #[must_use]
    pub fn actions_for(&self, event_key: &str) -> &[T] {
        self.entries
            .iter()
            .find(|(k, _)| k == event_key)
            .map_or(&[], |(_, values)| values.as_slice())
    }

    /// Iterate `(key, values)` pairs in key registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keys are registered.
    ///
    /// Handlers check this first and short-circuit with no further work —
    /// these registries are consulted on every incoming event.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
