//! Tag parsing and item lookup.
//!
//! A tag carries zero or more bracketed relations of the form
//! `[kind: Target Title]`.  Anything that does not fit that shape is ignored;
//! a tag is never an error.

use super::tree::{Item, ItemId, PreOrder};

/// One relation extracted from a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Relation kind, lower-cased (e.g. `"depends"`).
    pub relation: String,
    /// Title of the item the relation points at, case preserved.
    pub target: String,
    /// The raw tag this relation was read from.
    pub full: String,
}

/// Parse every relation out of `tags`, in tag order then left to right.
pub fn extract_relations(tags: &[String]) -> Vec<Relation> {
    let mut out = Vec::new();
    for tag in tags {
        let mut rest = tag.as_str();
        while let Some(open) = rest.find('[') {
            let after_open = &rest[open + 1..];
            let Some(close) = after_open.find(']') else {
                break;
            };
            if let Some((kind, target)) = parse_group(&after_open[..close]) {
                out.push(Relation {
                    relation: kind,
                    target,
                    full: tag.clone(),
                });
            }
            rest = &after_open[close + 1..];
        }
    }
    out
}

/// Split `kind: target` at the first colon.
fn parse_group(body: &str) -> Option<(String, String)> {
    let (kind, target) = body.split_once(':')?;
    let kind = kind.trim();
    let target = target.trim();
    if kind.is_empty() || target.is_empty() {
        return None;
    }
    Some((kind.to_lowercase(), target.to_string()))
}

// ───────────────────────────────────────── lookup ────────────

/// First item (pre-order) whose title equals `title` exactly.
pub fn find_item_by_title<'a>(roots: &'a [Item], title: &str) -> Option<&'a Item> {
    PreOrder::new(roots).find(|item| item.title == title)
}

pub fn find_item_by_id<'a>(roots: &'a [Item], id: &ItemId) -> Option<&'a Item> {
    PreOrder::new(roots).find(|item| &item.id == id)
}

/// Ids of the ancestors of `id`, root first.  `None` when `id` is not in the
/// tree; an empty vec when it is a root.
pub fn path_to_item(roots: &[Item], id: &ItemId) -> Option<Vec<ItemId>> {
    let mut path = Vec::new();
    for root in roots {
        if collect_path(root, id, &mut path) {
            return Some(path);
        }
    }
    None
}

fn collect_path(item: &Item, id: &ItemId, path: &mut Vec<ItemId>) -> bool {
    if &item.id == id {
        return true;
    }
    path.push(item.id.clone());
    for child in &item.items {
        if collect_path(child, id, path) {
            return true;
        }
    }
    path.pop();
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_single_relation() {
        let rels = extract_relations(&tags(&["[depends: B]"]));
        assert_eq!(
            rels,
            vec![Relation {
                relation: "depends".into(),
                target: "B".into(),
                full: "[depends: B]".into(),
            }]
        );
    }

    #[test]
    fn keeps_order_across_tags_and_groups() {
        let rels = extract_relations(&tags(&[
            "[supports: Alpha] [contradicts: Beta]",
            "plain tag",
            "[related: Gamma]",
        ]));
        let pairs: Vec<(&str, &str)> = rels
            .iter()
            .map(|r| (r.relation.as_str(), r.target.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [("supports", "Alpha"), ("contradicts", "Beta"), ("related", "Gamma")]
        );
        assert_eq!(rels[1].full, "[supports: Alpha] [contradicts: Beta]");
    }

    #[test]
    fn target_keeps_colons_and_case() {
        let rels = extract_relations(&tags(&["[Depends:  Part 2: The Sequel ]"]));
        assert_eq!(rels[0].relation, "depends");
        assert_eq!(rels[0].target, "Part 2: The Sequel");
    }

    #[test]
    fn malformed_groups_are_skipped() {
        let rels = extract_relations(&tags(&[
            "[no colon]",
            "[: missing kind]",
            "[depends: ]",
            "[depends: unclosed",
            "",
        ]));
        assert!(rels.is_empty());
    }

    #[test]
    fn lookups_walk_nested_items() {
        let roots = vec![
            Item::new("r", "Root").with_children(vec![
                Item::new("c1", "Child").with_children(vec![Item::new("g", "Grandchild")]),
            ]),
            Item::new("s", "Sibling"),
        ];

        assert_eq!(find_item_by_title(&roots, "Grandchild").map(|i| i.id.as_str()), Some("g"));
        assert!(find_item_by_title(&roots, "grandchild").is_none());
        assert_eq!(find_item_by_id(&roots, &ItemId::new("s")).map(|i| i.title.as_str()), Some("Sibling"));

        assert_eq!(
            path_to_item(&roots, &ItemId::new("g")),
            Some(vec![ItemId::new("r"), ItemId::new("c1")])
        );
        assert_eq!(path_to_item(&roots, &ItemId::new("s")), Some(vec![]));
        assert_eq!(path_to_item(&roots, &ItemId::new("missing")), None);
    }

    #[test]
    fn duplicate_titles_resolve_to_first_in_pre_order() {
        let roots = vec![
            Item::new("a", "Parent").with_children(vec![Item::new("dup1", "Same")]),
            Item::new("dup2", "Same"),
        ];
        assert_eq!(find_item_by_title(&roots, "Same").map(|i| i.id.as_str()), Some("dup1"));
    }
}
