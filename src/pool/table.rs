//! Ordered live-worker table with cyclic traversal.

use std::collections::btree_map::{BTreeMap, Entry};
use std::ops::Bound::{Excluded, Unbounded};
use crate::pool::worker::WorkerId;

/// Live workers keyed by identity, iterated in `WorkerId` order.
///
/// Each identity appears at most once. `E` is the per-worker payload
/// (the monitor stores a [`WorkerEntry`](crate::pool::worker::WorkerEntry)).
#[derive(Debug)]
pub struct WorkerTable<E> {
    entries: BTreeMap<WorkerId, E>,
}

impl<E> Default for WorkerTable<E> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<E> WorkerTable<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id` if absent, building its payload with `make`.
    ///
    /// `make` only runs for new identities. Returns true if inserted.
    pub fn insert_with<F>(&mut self, id: WorkerId, make: F) -> bool
    where
        F: FnOnce(&WorkerId) -> E,
    {
        match self.entries.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let entry = make(slot.key());
                slot.insert(entry);
                true
            }
        }
    }

    pub fn remove(&mut self, id: &WorkerId) -> Option<E> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &WorkerId) -> Option<&E> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &WorkerId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Smallest identity, if any.
    pub fn first(&self) -> Option<&WorkerId> {
        self.entries.keys().next()
    }

    /// Identity following `last` in table order.
    ///
    /// Wraps to [`first`](Self::first) when `last` is `None`, is the final
    /// element, or is no longer in the table.
    pub fn cyclic_next(&self, last: Option<&WorkerId>) -> Option<&WorkerId> {
        let last = match last {
            Some(last) if self.contains(last) => last,
            _ => return self.first(),
        };

        self.entries
            .range::<WorkerId, _>((Excluded(last), Unbounded))
            .next()
            .map(|(id, _)| id)
            .or_else(|| self.first())
    }

    /// Snapshot of identities in table order.
    pub fn ids(&self) -> Vec<WorkerId> {
        self.entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(ids: &[&str]) -> WorkerTable<()> {
        let mut table = WorkerTable::new();
        for id in ids {
            table.insert_with(WorkerId::from(*id), |_| ());
        }
        table
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut t = table(&["a", "b"]);
        assert!(!t.insert_with(WorkerId::from("a"), |_| ()));
        assert_eq!(t.len(), 2);
        assert!(t.contains(&WorkerId::from("a")));
        assert!(!t.contains(&WorkerId::from("z")));

        let mut built = 0;
        t.insert_with(WorkerId::from("b"), |_| built += 1);
        assert_eq!(built, 0, "payload must not be built for a tracked worker");
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut t = table(&["a"]);
        assert!(t.remove(&WorkerId::from("z")).is_none());
        assert_eq!(t.len(), 1);
        assert!(t.remove(&WorkerId::from("a")).is_some());
        assert!(t.is_empty());
        assert!(t.first().is_none());
    }

    #[test]
    fn test_first_uses_stable_order() {
        let t = table(&["c", "a", "b"]);
        assert_eq!(t.first(), Some(&WorkerId::from("a")));
        let expected: Vec<WorkerId> = vec!["a".into(), "b".into(), "c".into()];
        assert_eq!(t.ids(), expected);
    }

    #[test]
    fn test_cyclic_next_rotates_and_wraps() {
        let t = table(&["a", "b", "c"]);
        let a = WorkerId::from("a");
        let b = WorkerId::from("b");
        let c = WorkerId::from("c");

        assert_eq!(t.cyclic_next(None), Some(&a));
        assert_eq!(t.cyclic_next(Some(&a)), Some(&b));
        assert_eq!(t.cyclic_next(Some(&b)), Some(&c));
        assert_eq!(t.cyclic_next(Some(&c)), Some(&a));
    }

    #[test]
    fn test_cyclic_next_falls_back_to_first_when_cursor_removed() {
        let mut t = table(&["a", "b", "c"]);
        let b = WorkerId::from("b");
        t.remove(&b);

        // "c" sorts after "b" but the cursor is gone, so restart from the top.
        assert_eq!(t.cyclic_next(Some(&b)), Some(&WorkerId::from("a")));
    }

    #[test]
    fn test_cyclic_next_on_empty_table() {
        let t: WorkerTable<()> = WorkerTable::new();
        assert!(t.cyclic_next(Some(&WorkerId::from("a"))).is_none());
    }
}
