//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::time::Instant;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    memo::RelationsCache,
    relations::find_item_by_id,
    tree::{Item, ItemId, ItemTree},
};
use crate::ui::{
    relations_panel::RelationsView,
    tree_widget::{visible_rows, TreeRow, TreeWidgetState},
};

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Main,
    Help,
}

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneFocus {
    #[default]
    Tree,
    Relations,
}

/// Top-level application state.
pub struct AppState {
    /// The item document.
    pub tree: ItemTree,
    /// File the document was read from, for reloading.
    pub source: Option<PathBuf>,
    /// Ids of items whose children are shown.
    pub expanded: HashSet<ItemId>,
    /// Widget-level state (selection, scroll).
    pub tree_state: TreeWidgetState,
    /// Memoized relations of the selected item.
    pub relations: RelationsCache,
    /// Highlighted row in the relations panel (outgoing first, then incoming).
    pub relation_selected: Option<usize>,
    /// First relation row shown in the panel.
    pub relation_scroll: usize,
    pub focus: PaneFocus,
    pub active_view: ActiveView,
    /// Previously selected items, most recent last.
    pub history: VecDeque<ItemId>,
    pub config: AppConfig,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Last known terminal size, for mouse hit-testing.
    pub terminal_area: Rect,
    /// Last left-clicked tree row and click time, for double-click.
    pub last_left_click: Option<(ItemId, Instant)>,
}

impl AppState {
    pub fn new(tree: ItemTree, config: AppConfig) -> Self {
        let mut state = Self {
            tree,
            source: None,
            expanded: HashSet::new(),
            tree_state: TreeWidgetState::default(),
            relations: RelationsCache::default(),
            relation_selected: None,
            relation_scroll: 0,
            focus: PaneFocus::default(),
            active_view: ActiveView::default(),
            history: VecDeque::new(),
            status_message: None,
            should_quit: false,
            terminal_area: Rect::default(),
            last_left_click: None,
            config,
        };
        state.expand_to_depth(state.config.expand_depth);
        state
    }

    /// Expand every item above `depth` (0 = everything collapsed).
    pub fn expand_to_depth(&mut self, depth: usize) {
        fn walk(items: &[Item], depth: usize, out: &mut HashSet<ItemId>) {
            if depth == 0 {
                return;
            }
            for item in items {
                if item.has_children() {
                    out.insert(item.id.clone());
                    walk(&item.items, depth - 1, out);
                }
            }
        }
        walk(self.tree.roots(), depth, &mut self.expanded);
    }

    /// Flattened visible rows of the tree pane.
    pub fn rows(&self) -> Vec<TreeRow> {
        visible_rows(&self.tree, &self.expanded)
    }

    pub fn selected_row(&self) -> Option<TreeRow> {
        self.rows().into_iter().nth(self.tree_state.selected)
    }

    pub fn selected_item_id(&self) -> Option<ItemId> {
        self.selected_row().map(|r| r.item_id)
    }

    pub fn selected_item(&self) -> Option<&Item> {
        let id = self.selected_item_id()?;
        find_item_by_id(self.tree.roots(), &id)
    }

    /// Move the tree selection onto `id` if its row is visible.
    pub fn select_row_for(&mut self, id: &ItemId) -> bool {
        match self.rows().iter().position(|r| &r.item_id == id) {
            Some(idx) => {
                self.set_tree_selection(idx);
                true
            }
            None => false,
        }
    }

    /// Change the tree selection; the relations panel highlight and scroll
    /// do not carry over to a different item.
    pub fn set_tree_selection(&mut self, idx: usize) {
        if idx != self.tree_state.selected {
            self.relation_selected = None;
            self.relation_scroll = 0;
        }
        self.tree_state.selected = idx;
    }

    /// Relations of the selected item, through the memo cache.
    pub fn relations_view(&mut self) -> RelationsView {
        let Some(id) = self.selected_item_id() else {
            return RelationsView::default();
        };
        let Some(item) = find_item_by_id(self.tree.roots(), &id) else {
            return RelationsView::default();
        };
        let (outgoing, incoming) = self.relations.snapshot(&self.tree, item);
        RelationsView::resolve(self.tree.roots(), outgoing, incoming)
    }
}
