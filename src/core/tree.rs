//! In-memory item tree.
//!
//! Unlike an arena, every [`Item`] owns its children directly.  The tree is
//! read-only once loaded: the UI keeps its own expansion/selection state keyed
//! by [`ItemId`], so nothing ever needs a back-reference into a parent.

use std::fmt;

use serde::Deserialize;

// ───────────────────────────────────────── ids ───────────────

/// Stable identifier of an item inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ───────────────────────────────────────── item ──────────────

/// A single node of the tree.  `tags` are raw strings; their syntax is owned
/// by [`crate::core::relations`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Item {
    pub fn has_children(&self) -> bool {
        !self.items.is_empty()
    }
}

#[cfg(test)]
impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            title: title.into(),
            tags: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }
}

/// Lightweight reference to an item, cheap to keep around after the borrow
/// of the tree ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    pub id: ItemId,
    pub title: String,
}

impl From<&Item> for ItemRef {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
        }
    }
}

// ───────────────────────────────────────── tree ──────────────

/// The whole document: ordered root items plus a revision counter.
///
/// `revision` changes whenever the roots are replaced, so caches keyed on the
/// tree can tell a new tree from the old one without comparing contents.
#[derive(Debug, Clone, Default)]
pub struct ItemTree {
    roots: Vec<Item>,
    revision: u64,
}

impl ItemTree {
    pub fn new(roots: Vec<Item>) -> Self {
        Self { roots, revision: 0 }
    }

    pub fn roots(&self) -> &[Item] {
        &self.roots
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Swap in a new set of roots and bump the revision.
    pub fn replace(&mut self, roots: Vec<Item>) {
        self.roots = roots;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order iterator over every item in the tree.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder::new(&self.roots)
    }
}

/// Depth-first, pre-order walk over a forest of items.
pub struct PreOrder<'a> {
    stack: Vec<&'a Item>,
}

impl<'a> PreOrder<'a> {
    pub fn new(roots: &'a [Item]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.stack.pop()?;
        self.stack.extend(item.items.iter().rev());
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_order_visits_parents_before_children() {
        let tree = ItemTree::new(vec![
            Item::new("1", "one").with_children(vec![
                Item::new("1.1", "one.one").with_children(vec![Item::new("1.1.1", "deep")]),
                Item::new("1.2", "one.two"),
            ]),
            Item::new("2", "two"),
        ]);

        let order: Vec<&str> = tree.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, ["1", "1.1", "1.1.1", "1.2", "2"]);
    }

    #[test]
    fn replace_bumps_revision() {
        let mut tree = ItemTree::new(vec![Item::new("a", "A")]);
        let before = tree.revision();
        tree.replace(vec![Item::new("a", "A")]);
        assert_ne!(before, tree.revision());
    }

    #[test]
    fn deserializes_with_missing_tags_and_children() {
        let item: Item = serde_json::from_str(r#"{"id": "x", "title": "X"}"#).unwrap();
        assert!(item.tags.is_empty());
        assert!(!item.has_children());
        assert_eq!(item.id, ItemId::new("x"));
    }
}
