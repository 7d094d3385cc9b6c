//! Replace-set planning for child collections owned by a product.
//!
//! The stored rows are diffed against the desired rows by key. Applying the
//! plan leaves exactly the desired rows behind, the same end state as
//! deleting everything and inserting the desired set again.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Row operations that turn the stored collection into the desired one
#[derive(Debug, PartialEq, Eq)]
pub struct ReplacePlan<K, V> {
    /// Keys stored but no longer wanted
    pub removed: Vec<K>,
    /// Rows wanted but not stored yet
    pub added: Vec<V>,
    /// Rows stored under the same key but with different values
    pub changed: Vec<V>,
    /// Number of rows already matching
    pub unchanged: usize,
}

impl<K, V> ReplacePlan<K, V> {
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.changed.is_empty()
    }
}

/// Diffs `stored` against `desired`.
///
/// `desired` must not repeat a key; use [`dedup_by_key`] first.
pub fn plan_replace<K, V, F>(stored: Vec<V>, desired: Vec<V>, key: F) -> ReplacePlan<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
    F: Fn(&V) -> K,
{
    let mut stored_by_key: HashMap<K, V> = stored.into_iter().map(|v| (key(&v), v)).collect();

    let mut added = Vec::new();
    let mut changed = Vec::new();
    let mut unchanged = 0;

    for row in desired {
        match stored_by_key.remove(&key(&row)) {
            None => added.push(row),
            Some(current) if current == row => unchanged += 1,
            Some(_) => changed.push(row),
        }
    }

    ReplacePlan {
        removed: stored_by_key.into_keys().collect(),
        added,
        changed,
        unchanged,
    }
}

/// Keeps the first item for every key, preserving input order
pub fn dedup_by_key<K, T, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// First key that occurs more than once
pub fn first_duplicate<K, T, F>(items: &[T], key: F) -> Option<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items.iter().map(key).find(|k| !seen.insert(k.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        id: i32,
        index: i32,
    }

    fn row(id: i32, index: i32) -> Row {
        Row { id, index }
    }

    #[test]
    fn plan_splits_rows_into_removed_added_changed() {
        let stored = vec![row(1, 0), row(2, 1), row(3, 2)];
        let desired = vec![row(3, 2), row(2, 0), row(4, 1)];

        let plan = plan_replace(stored, desired, |r| r.id);

        assert_eq!(plan.removed, vec![1]);
        assert_eq!(plan.added, vec![row(4, 1)]);
        assert_eq!(plan.changed, vec![row(2, 0)]);
        assert_eq!(plan.unchanged, 1);
        assert!(!plan.is_noop());
    }

    #[test]
    fn identical_sets_produce_noop() {
        let rows = vec![row(1, 0), row(2, 1)];
        let plan = plan_replace(rows.clone(), rows, |r| r.id);
        assert!(plan.is_noop());
        assert_eq!(plan.unchanged, 2);
    }

    #[test]
    fn empty_desired_set_removes_everything() {
        let plan = plan_replace(vec![row(1, 0), row(2, 1)], Vec::new(), |r| r.id);
        let mut removed = plan.removed;
        removed.sort();
        assert_eq!(removed, vec![1, 2]);
        assert!(plan.added.is_empty());
    }

    #[test]
    fn dedup_keeps_first_occurrence_in_order() {
        let rows = vec![row(5, 0), row(7, 1), row(5, 2), row(9, 3), row(7, 4)];
        let kept = dedup_by_key(rows, |r| r.id);
        assert_eq!(kept, vec![row(5, 0), row(7, 1), row(9, 3)]);
    }

    #[test]
    fn first_duplicate_reports_repeated_key() {
        assert_eq!(first_duplicate(&[row(1, 0), row(2, 0)], |r| r.id), None);
        assert_eq!(
            first_duplicate(&[row(1, 0), row(2, 0), row(2, 1), row(1, 1)], |r| r.id),
            Some(2)
        );
    }
}
