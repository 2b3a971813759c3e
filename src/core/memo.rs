//! Input-keyed memoization for derived relation lists.
//!
//! Each cache slot remembers the key it was computed for and is recomputed
//! only when the key changes.  The tree itself is keyed by its revision
//! number, the same way background results are matched against a generation.

use super::backlinks::{incoming_relations, outgoing_relations, IncomingRelation};
use super::relations::Relation;
use super::tree::{Item, ItemTree};

/// A single-slot memo: last key and the value computed from it.
#[derive(Debug)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    /// Return the cached value for `key`, computing it with `compute` when
    /// the key differs from the last one.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        if !matches!(&self.slot, Some((k, _)) if *k == key) {
            self.slot = None;
        }
        let (_, value) = self.slot.get_or_insert_with(|| (key, compute()));
        value
    }
}

/// Memoized outgoing/incoming relations for the currently selected item.
#[derive(Debug, Default)]
pub struct RelationsCache {
    outgoing: Memo<Vec<String>, Vec<Relation>>,
    incoming: Memo<(String, u64), Vec<IncomingRelation>>,
}

impl RelationsCache {
    /// Outgoing relations, recomputed only when `item.tags` changes.
    pub fn outgoing(&mut self, item: &Item) -> &[Relation] {
        self.outgoing
            .get_or_compute(item.tags.clone(), || {
                tracing::trace!(item = %item.id, "recomputing outgoing relations");
                outgoing_relations(&item.tags)
            })
    }

    /// Incoming relations, recomputed only when the title or the tree
    /// revision changes.
    pub fn incoming(&mut self, tree: &ItemTree, title: &str) -> &[IncomingRelation] {
        self.incoming
            .get_or_compute((title.to_string(), tree.revision()), || {
                tracing::trace!(title, revision = tree.revision(), "rescanning incoming relations");
                incoming_relations(tree.roots(), title)
            })
    }

    /// Both lists at once, cloned out so the caller can keep borrowing the
    /// tree while rendering.
    pub fn snapshot(&mut self, tree: &ItemTree, item: &Item) -> (Vec<Relation>, Vec<IncomingRelation>) {
        let outgoing = self.outgoing(item).to_vec();
        let incoming = self.incoming(tree, &item.title).to_vec();
        (outgoing, incoming)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn memo_recomputes_only_on_key_change() {
        let calls = Cell::new(0);
        let mut memo: Memo<u32, u32> = Memo::default();
        let mut get = |k: u32| {
            *memo.get_or_compute(k, || {
                calls.set(calls.get() + 1);
                k * 10
            })
        };

        assert_eq!(get(1), 10);
        assert_eq!(get(1), 10);
        assert_eq!(calls.get(), 1);
        assert_eq!(get(2), 20);
        assert_eq!(get(1), 10);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn incoming_follows_tree_revision() {
        let mut tree = ItemTree::new(vec![
            Item::new("a", "A"),
            Item::new("b", "B").with_tags(["[supports: A]"]),
        ]);
        let mut cache = RelationsCache::default();
        assert_eq!(cache.incoming(&tree, "A").len(), 1);

        tree.replace(vec![Item::new("a", "A")]);
        assert!(cache.incoming(&tree, "A").is_empty());
    }

    #[test]
    fn repeated_reads_are_stable() {
        let tree = ItemTree::new(vec![
            Item::new("a", "A").with_tags(["[depends: B]"]),
            Item::new("b", "B").with_tags(["[related: A]"]),
        ]);
        let item = tree.roots()[0].clone();
        let mut cache = RelationsCache::default();

        let first = cache.snapshot(&tree, &item);
        let second = cache.snapshot(&tree, &item);
        assert_eq!(first, second);
        assert_eq!(first.0[0].target, "B");
        assert_eq!(first.1[0].source.title, "B");
    }
}
