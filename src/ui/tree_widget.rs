//! Custom Ratatui widget that renders an [`ItemTree`] as an indented,
//! collapsible tree.

use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::tree::{Item, ItemId, ItemTree};

use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the tree widget (selected index, scroll offset).
#[derive(Debug, Default)]
pub struct TreeWidgetState {
    /// Index into the *visible* flat list that is currently highlighted.
    pub selected: usize,
    /// Vertical scroll offset (first visible row).
    pub offset: usize,
}

impl TreeWidgetState {
    /// Ensure the selected row is visible within the viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}

// ───────────────────────────────────────── row model ─────────

/// One rendered row in the tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub item_id: ItemId,
    pub parent: Option<ItemId>,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub title: String,
    pub tag_count: usize,
}

/// Flatten the visible part of the tree (items under collapsed parents are
/// skipped) in pre-order.
pub fn visible_rows(tree: &ItemTree, expanded: &HashSet<ItemId>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    for root in tree.roots() {
        collect_rows(root, None, 0, expanded, &mut rows);
    }
    rows
}

fn collect_rows(
    item: &Item,
    parent: Option<&ItemId>,
    depth: usize,
    expanded: &HashSet<ItemId>,
    rows: &mut Vec<TreeRow>,
) {
    let is_expanded = item.has_children() && expanded.contains(&item.id);
    rows.push(TreeRow {
        item_id: item.id.clone(),
        parent: parent.cloned(),
        depth,
        has_children: item.has_children(),
        expanded: is_expanded,
        title: item.title.clone(),
        tag_count: item.tags.len(),
    });

    if is_expanded {
        for child in &item.items {
            collect_rows(child, Some(&item.id), depth + 1, expanded, rows);
        }
    }
}

// ───────────────────────────────────────── widget ────────────

/// The tree widget itself: created fresh each frame.
pub struct TreeWidget<'a> {
    rows: &'a [TreeRow],
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(rows: &'a [TreeRow]) -> Self {
        Self { rows, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl<'a> StatefulWidget for TreeWidget<'a> {
    type State = TreeWidgetState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        // Resolve the inner area (inside the optional block border).
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        state.clamp_scroll(inner.height as usize);

        let visible = self
            .rows
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, (row_idx, row)) in visible.enumerate() {
            let y = inner.y + i as u16;
            let is_selected = row_idx == state.selected;

            let indent = "  ".repeat(row.depth);
            let icon = match (row.has_children, row.expanded) {
                (true, true) => "▼ ",
                (true, false) => "▶ ",
                (false, _) => "  ",
            };
            let style = if is_selected {
                Theme::selected_style()
            } else if row.has_children {
                Theme::parent_style()
            } else {
                Theme::leaf_style()
            };

            let mut spans = vec![
                Span::raw(indent),
                Span::styled(format!("{icon}{}", row.title), style),
            ];
            if row.tag_count > 0 {
                let hint = if row.tag_count == 1 {
                    "  1 tag".to_string()
                } else {
                    format!("  {} tags", row.tag_count)
                };
                spans.push(Span::styled(hint, Theme::hint_style()));
            }

            buf.set_line(inner.x, y, &Line::from(spans), inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> ItemTree {
        ItemTree::new(vec![
            Item::new("p", "Parent").with_children(vec![
                Item::new("c", "Child").with_children(vec![Item::new("g", "Grandchild")]),
            ]),
            Item::new("s", "Sibling").with_tags(["[depends: Parent]"]),
        ])
    }

    #[test]
    fn collapsed_children_are_hidden() {
        let rows = visible_rows(&tree(), &HashSet::new());
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Parent", "Sibling"]);
        assert!(rows[0].has_children && !rows[0].expanded);
    }

    #[test]
    fn expanded_children_follow_parent() {
        let expanded: HashSet<ItemId> = [ItemId::new("p"), ItemId::new("c")].into_iter().collect();
        let rows = visible_rows(&tree(), &expanded);
        let shape: Vec<(&str, usize)> = rows.iter().map(|r| (r.item_id.as_str(), r.depth)).collect();
        assert_eq!(shape, [("p", 0), ("c", 1), ("g", 2), ("s", 0)]);
        assert_eq!(rows[2].parent, Some(ItemId::new("c")));
    }

    #[test]
    fn renders_markers_and_tag_hint() {
        let rows = visible_rows(&tree(), &HashSet::new());
        let area = Rect::new(0, 0, 30, 2);
        let mut buf = Buffer::empty(area);
        let mut state = TreeWidgetState::default();
        TreeWidget::new(&rows).render(area, &mut buf, &mut state);

        let line = |y: u16| -> String { (0..area.width).map(|x| buf[(x, y)].symbol()).collect() };
        assert!(line(0).starts_with("▶ Parent"));
        assert!(line(1).contains("Sibling  1 tag"));
    }

    #[test]
    fn scroll_follows_selection() {
        let mut state = TreeWidgetState { selected: 5, offset: 0 };
        state.clamp_scroll(3);
        assert_eq!(state.offset, 3);
        state.selected = 1;
        state.clamp_scroll(3);
        assert_eq!(state.offset, 1);
    }
}
