//! Item navigation: the action behind clicking or following a relation.
//!
//! Input handling only ever talks to a [`Navigator`], which keeps relation
//! activation testable without a full [`AppState`].

use crate::core::relations::{find_item_by_id, path_to_item};
use crate::core::tree::ItemId;
use crate::ui::relations_panel::RelationsView;

use super::state::AppState;

/// How many previous selections `Back` can return to.
const HISTORY_LIMIT: usize = 100;

pub trait Navigator {
    /// Make `id` the selected item.
    fn select_item(&mut self, id: &ItemId);
}

/// Follow row `index` of the relations panel, if it has a target.
pub fn activate_relation<N: Navigator>(view: &RelationsView, index: usize, navigator: &mut N) {
    if let Some(id) = view.target(index) {
        navigator.select_item(id);
    }
}

impl Navigator for AppState {
    fn select_item(&mut self, id: &ItemId) {
        let previous = self.selected_item_id();
        if !reveal(self, id) {
            return;
        }
        if let Some(prev) = previous.filter(|p| p != id) {
            self.history.push_back(prev);
            if self.history.len() > HISTORY_LIMIT {
                self.history.pop_front();
            }
        }
    }
}

/// Return to the previously selected item.  Entries that no longer exist are
/// skipped.
pub fn go_back(state: &mut AppState) {
    while let Some(id) = state.history.pop_back() {
        if reveal(state, &id) {
            return;
        }
    }
    state.status_message = Some("No earlier selection".to_string());
}

/// Expand the ancestors of `id` and put the tree selection on it.
fn reveal(state: &mut AppState, id: &ItemId) -> bool {
    let Some(ancestors) = path_to_item(state.tree.roots(), id) else {
        tracing::warn!(%id, "navigation target is not in the tree");
        state.status_message = Some(format!("No item with id {id}"));
        return false;
    };
    state.expanded.extend(ancestors);
    if !state.select_row_for(id) {
        return false;
    }

    if let Some(item) = find_item_by_id(state.tree.roots(), id) {
        tracing::debug!(%id, title = %item.title, "selected item");
        state.status_message = Some(format!("→ {}", item.title));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::backlinks::{incoming_relations, outgoing_relations};
    use crate::core::tree::{Item, ItemTree};

    #[derive(Default)]
    struct Recorder(Vec<ItemId>);

    impl Navigator for Recorder {
        fn select_item(&mut self, id: &ItemId) {
            self.0.push(id.clone());
        }
    }

    fn roots() -> Vec<Item> {
        vec![
            Item::new("a", "A").with_tags(["[depends: B]", "[related: Missing]"]),
            Item::new("folder", "Folder").with_children(vec![Item::new("b", "B")]),
            Item::new("c", "C").with_tags(["[supports: A]"]),
        ]
    }

    #[test]
    fn activation_dispatches_only_resolved_targets() {
        let roots = roots();
        let view = RelationsView::resolve(
            &roots,
            outgoing_relations(&roots[0].tags),
            incoming_relations(&roots, "A"),
        );
        let mut nav = Recorder::default();

        activate_relation(&view, 0, &mut nav);
        activate_relation(&view, 1, &mut nav); // not found
        activate_relation(&view, 2, &mut nav); // incoming from C
        activate_relation(&view, 9, &mut nav); // out of range

        assert_eq!(nav.0, vec![ItemId::new("b"), ItemId::new("c")]);
    }

    #[test]
    fn select_item_reveals_collapsed_target_and_records_history() {
        let mut config = AppConfig::default();
        config.expand_depth = 0;
        let mut state = AppState::new(ItemTree::new(roots()), config);
        assert_eq!(state.selected_item_id(), Some(ItemId::new("a")));

        state.select_item(&ItemId::new("b"));
        assert_eq!(state.selected_item_id(), Some(ItemId::new("b")));
        assert!(state.expanded.contains(&ItemId::new("folder")));
        assert_eq!(state.history, vec![ItemId::new("a")]);

        go_back(&mut state);
        assert_eq!(state.selected_item_id(), Some(ItemId::new("a")));
        assert!(state.history.is_empty());
    }

    #[test]
    fn history_drops_oldest_entries_past_the_limit() {
        let roots: Vec<Item> = (0..HISTORY_LIMIT + 5)
            .map(|i| Item::new(format!("i{i}"), format!("I{i}")))
            .collect();
        let mut state = AppState::new(ItemTree::new(roots), AppConfig::default());
        for i in 1..HISTORY_LIMIT + 5 {
            state.select_item(&ItemId::new(format!("i{i}")));
        }
        assert_eq!(state.history.len(), HISTORY_LIMIT);
        assert_eq!(state.history.front(), Some(&ItemId::new("i4")));
        assert_eq!(state.history.back(), Some(&ItemId::new(format!("i{}", HISTORY_LIMIT + 3))));
    }

    #[test]
    fn unknown_target_leaves_selection_alone() {
        let mut state = AppState::new(ItemTree::new(roots()), AppConfig::default());
        state.select_item(&ItemId::new("nope"));
        assert_eq!(state.selected_item_id(), Some(ItemId::new("a")));
        assert!(state.history.is_empty());
        assert!(state.status_message.is_some());
    }
}
