//! Outgoing and incoming relations for a single item.
//!
//! Both functions are pure; callers memoize them (see [`super::memo`]).

use super::relations::{extract_relations, Relation};
use super::tree::{Item, ItemRef};

/// A relation some other item declares towards the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingRelation {
    pub source: ItemRef,
    pub relation: String,
    pub full_tag: String,
}

/// Relations declared by `tags`, verbatim from the parser.
pub fn outgoing_relations(tags: &[String]) -> Vec<Relation> {
    if tags.is_empty() {
        return Vec::new();
    }
    extract_relations(tags)
}

/// Every relation in the tree whose target is exactly `title`, in pre-order.
pub fn incoming_relations(roots: &[Item], title: &str) -> Vec<IncomingRelation> {
    let mut out = Vec::new();
    for root in roots {
        collect_incoming(root, title, &mut out);
    }
    out
}

fn collect_incoming(item: &Item, title: &str, out: &mut Vec<IncomingRelation>) {
    if !item.tags.is_empty() {
        for rel in extract_relations(&item.tags) {
            if rel.target == title {
                out.push(IncomingRelation {
                    source: ItemRef::from(item),
                    relation: rel.relation,
                    full_tag: rel.full,
                });
            }
        }
    }
    for child in &item.items {
        collect_incoming(child, title, out);
    }
}
