//! Input handling: maps key/mouse events to state mutations.

use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::config::Action;
use crate::core::{loader, tree::ItemId};
use crate::ui::layout::AppLayout;
use crate::ui::relations_panel::{panel_height, RelationsGeometry, RelationsView};

use super::navigation::{activate_relation, go_back, Navigator};
use super::state::{ActiveView, AppState, PaneFocus};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    state.status_message = None;
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Main => handle_main_key(state, key),
        ActiveView::Help => {
            let closes = matches!(key.code, KeyCode::Esc)
                || matches!(state.config.match_key(key), Some(Action::Help | Action::Quit));
            if closes {
                state.active_view = ActiveView::Main;
            }
        }
    }
}

fn handle_main_key(state: &mut AppState, key: KeyEvent) {
    // Navigation keys that should always work in the tree.
    if state.focus == PaneFocus::Tree {
        match key.code {
            KeyCode::Home => {
                state.set_tree_selection(0);
                return;
            }
            KeyCode::End => {
                let count = state.rows().len();
                state.set_tree_selection(count.saturating_sub(1));
                return;
            }
            _ => {}
        }
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    // Global actions first.
    match action {
        Action::Quit => {
            state.should_quit = true;
            return;
        }
        Action::Help => {
            state.active_view = ActiveView::Help;
            return;
        }
        Action::Back => {
            go_back(state);
            state.focus = PaneFocus::Tree;
            return;
        }
        Action::SwitchFocus => {
            toggle_focus(state);
            return;
        }
        Action::Reload => {
            reload(state);
            return;
        }
        _ => {}
    }

    match state.focus {
        PaneFocus::Tree => handle_tree_action(state, action),
        PaneFocus::Relations => handle_relations_action(state, action),
    }
}

fn handle_tree_action(state: &mut AppState, action: Action) {
    match action {
        Action::MoveUp => {
            let idx = state.tree_state.selected.saturating_sub(1);
            state.set_tree_selection(idx);
        }
        Action::MoveDown => {
            let count = state.rows().len();
            let idx = (state.tree_state.selected + 1).min(count.saturating_sub(1));
            state.set_tree_selection(idx);
        }
        Action::Expand => {
            if let Some(row) = state.selected_row() {
                if row.has_children {
                    state.expanded.insert(row.item_id);
                }
            }
        }
        Action::Collapse => handle_collapse(state),
        Action::FollowRelation => {
            // Enter on a tree row toggles it.
            if let Some(row) = state.selected_row() {
                toggle_expanded(state, &row.item_id);
            }
        }
        _ => {}
    }
}

/// Collapse an expanded item, or jump to the parent otherwise.
fn handle_collapse(state: &mut AppState) {
    let Some(row) = state.selected_row() else {
        return;
    };
    if row.expanded {
        state.expanded.remove(&row.item_id);
    } else if let Some(parent) = row.parent {
        state.select_row_for(&parent);
    }
}

fn handle_relations_action(state: &mut AppState, action: Action) {
    let view = state.relations_view();
    match action {
        Action::MoveUp => {
            if let Some(idx) = view.prev_navigable(state.relation_selected) {
                select_relation(state, &view, idx);
            }
        }
        Action::MoveDown => {
            if let Some(idx) = view.next_navigable(state.relation_selected) {
                select_relation(state, &view, idx);
            }
        }
        Action::FollowRelation => {
            let Some(idx) = state.relation_selected else {
                return;
            };
            // A highlight scrolled out of view by the wheel is brought back
            // first rather than followed blind.
            let geom = relations_geom(state, &view);
            if geom.visible_rows == 0 {
                state.status_message = Some("Relations panel is too small".to_string());
                return;
            }
            if !geom.rows.iter().any(|r| r.index == idx) {
                state.relation_scroll = geom.scroll_to_show(&view, idx);
                return;
            }
            activate_relation(&view, idx, &mut *state);
            state.focus = PaneFocus::Tree;
        }
        Action::Collapse => state.focus = PaneFocus::Tree,
        _ => {}
    }
}

fn toggle_focus(state: &mut AppState) {
    match state.focus {
        PaneFocus::Relations => state.focus = PaneFocus::Tree,
        PaneFocus::Tree => {
            let view = state.relations_view();
            let first = state
                .relation_selected
                .filter(|&i| view.target(i).is_some())
                .or_else(|| view.next_navigable(None));
            match first {
                Some(idx) => {
                    select_relation(state, &view, idx);
                    state.focus = PaneFocus::Relations;
                }
                None => {
                    state.status_message = Some("No relations to follow".to_string());
                }
            }
        }
    }
}

/// Geometry of the relations panel as it is currently laid out.
fn relations_geom(state: &AppState, view: &RelationsView) -> RelationsGeometry {
    let layout = AppLayout::from_area(state.terminal_area, panel_height(view));
    RelationsGeometry::compute(layout.relations_area, view, state.relation_scroll)
}

/// Highlight relation row `idx` and scroll the panel so it is on screen.
fn select_relation(state: &mut AppState, view: &RelationsView, idx: usize) {
    state.relation_selected = Some(idx);
    let geom = relations_geom(state, view);
    state.relation_scroll = geom.scroll_to_show(view, idx);
}

/// Re-read the document from disk, keeping the selected item if it survived.
fn reload(state: &mut AppState) {
    let Some(path) = state.source.clone() else {
        return;
    };
    let selected = state.selected_item_id();
    if let Err(e) = loader::reload_items(&mut state.tree, &path) {
        tracing::warn!(error = %e, "reload failed");
        state.status_message = Some(format!("Reload failed: {e}"));
        return;
    }

    state.relation_selected = None;
    state.relation_scroll = 0;
    state.focus = PaneFocus::Tree;
    state.history.clear();
    let kept = selected.is_some_and(|id| state.select_row_for(&id));
    if !kept {
        state.set_tree_selection(0);
    }
    state.status_message = Some("Reloaded".to_string());
}

fn toggle_expanded(state: &mut AppState, id: &ItemId) {
    if !state.expanded.remove(id) {
        let has_children = state
            .rows()
            .iter()
            .any(|r| &r.item_id == id && r.has_children);
        if has_children {
            state.expanded.insert(id.clone());
        }
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Main {
        return;
    }

    let view = state.relations_view();
    let layout = AppLayout::from_area(state.terminal_area, panel_height(&view));
    let pos = Position::new(mouse.column, mouse.row);
    let over_relations = layout.relations_area.contains(pos);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if over_relations {
                let geom = relations_geom(state, &view);
                // Not-found rows have no target and ignore clicks.
                if let Some(id) = geom.target_at(mouse.column, mouse.row).cloned() {
                    state.select_item(&id);
                    state.focus = PaneFocus::Tree;
                }
                return;
            }

            if layout.tree_area.contains(pos) {
                state.focus = PaneFocus::Tree;
                handle_tree_click(state, layout.tree_area, mouse.row);
            }
        }
        MouseEventKind::ScrollUp if over_relations => {
            state.relation_scroll = state.relation_scroll.saturating_sub(1);
        }
        MouseEventKind::ScrollDown if over_relations => {
            let geom = relations_geom(state, &view);
            state.relation_scroll = (geom.scroll + 1).min(geom.max_scroll);
        }
        MouseEventKind::ScrollUp => {
            let idx = state.tree_state.selected.saturating_sub(1);
            state.set_tree_selection(idx);
        }
        MouseEventKind::ScrollDown => {
            let count = state.rows().len();
            let idx = (state.tree_state.selected + 1).min(count.saturating_sub(1));
            state.set_tree_selection(idx);
        }
        _ => {}
    }
}

fn handle_tree_click(state: &mut AppState, tree_area: Rect, row: u16) {
    let content_top = tree_area.y.saturating_add(1);
    let content_bottom = tree_area
        .y
        .saturating_add(tree_area.height.saturating_sub(1));
    if row < content_top || row >= content_bottom {
        return;
    }

    let clicked = row.saturating_sub(content_top) as usize + state.tree_state.offset;
    let rows = state.rows();
    let Some(clicked_row) = rows.get(clicked) else {
        state.last_left_click = None;
        return;
    };

    let now = Instant::now();
    let window = Duration::from_millis(state.config.double_click_ms);
    let is_repeat = state
        .last_left_click
        .as_ref()
        .is_some_and(|(last, at)| *last == clicked_row.item_id && now.duration_since(*at) <= window);

    state.set_tree_selection(clicked);
    if is_repeat {
        toggle_expanded(state, &clicked_row.item_id);
        state.last_left_click = None;
    } else {
        state.last_left_click = Some((clicked_row.item_id.clone(), now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::tree::{Item, ItemTree};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// `A` depends on `B`, `C` supports `A`.
    fn state() -> AppState {
        let tree = ItemTree::new(vec![
            Item::new("a", "A").with_tags(["[depends: B]", "[related: Nobody]"]),
            Item::new("b", "B"),
            Item::new("c", "C").with_tags(["[supports: A]"]),
        ]);
        let mut state = AppState::new(tree, AppConfig::default());
        state.terminal_area = Rect::new(0, 0, 100, 30);
        state
    }

    #[test]
    fn keyboard_follow_outgoing_relation() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Tab));
        assert_eq!(s.focus, PaneFocus::Relations);
        assert_eq!(s.relation_selected, Some(0));

        handle_key(&mut s, press(KeyCode::Enter));
        assert_eq!(s.selected_item_id(), Some(ItemId::new("b")));
        assert_eq!(s.focus, PaneFocus::Tree);

        handle_key(&mut s, press(KeyCode::Backspace));
        assert_eq!(s.selected_item_id(), Some(ItemId::new("a")));
    }

    #[test]
    fn relation_selection_skips_not_found_rows() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Tab));
        handle_key(&mut s, press(KeyCode::Down));
        // Row 1 is the unresolved `Nobody`, row 2 is the incoming one.
        assert_eq!(s.relation_selected, Some(2));
        handle_key(&mut s, press(KeyCode::Enter));
        assert_eq!(s.selected_item_id(), Some(ItemId::new("c")));
    }

    #[test]
    fn focus_stays_on_tree_without_relations() {
        let mut s = AppState::new(
            ItemTree::new(vec![Item::new("x", "X")]),
            AppConfig::default(),
        );
        handle_key(&mut s, press(KeyCode::Tab));
        assert_eq!(s.focus, PaneFocus::Tree);
        assert!(s.status_message.is_some());
    }

    #[test]
    fn clicking_relation_rows_navigates() {
        let mut s = state();
        let view = s.relations_view();
        let layout = AppLayout::from_area(s.terminal_area, panel_height(&view));
        let geom = RelationsGeometry::compute(layout.relations_area, &view, 0);

        // Not-found row: nothing happens.
        let missing = &geom.rows[1];
        handle_mouse(&mut s, click(missing.rect.x, missing.rect.y));
        assert_eq!(s.selected_item_id(), Some(ItemId::new("a")));

        let incoming = &geom.rows[2];
        handle_mouse(&mut s, click(incoming.rect.x, incoming.rect.y));
        assert_eq!(s.selected_item_id(), Some(ItemId::new("c")));
    }

    /// `A` plus thirty items that all support it.
    fn crowded_state() -> AppState {
        let mut roots = vec![Item::new("a", "A")];
        roots.extend((0..30).map(|i| Item::new(format!("s{i}"), format!("S{i}")).with_tags(["[supports: A]"])));
        let mut state = AppState::new(ItemTree::new(roots), AppConfig::default());
        state.terminal_area = Rect::new(0, 0, 100, 24);
        state
    }

    fn render_relations(s: &mut AppState) -> (RelationsGeometry, String) {
        let view = s.relations_view();
        let layout = AppLayout::from_area(s.terminal_area, panel_height(&view));
        let mut buf = ratatui::buffer::Buffer::empty(s.terminal_area);
        ratatui::widgets::Widget::render(
            crate::ui::relations_panel::RelationsPanel::new(&view)
                .selected(s.relation_selected)
                .scroll(s.relation_scroll),
            layout.relations_area,
            &mut buf,
        );
        let text: String = (0..buf.area.height)
            .flat_map(|y| (0..buf.area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect();
        (relations_geom(s, &view), text)
    }

    #[test]
    fn keyboard_selection_scrolls_relations_into_view() {
        let mut s = crowded_state();
        let (geom, text) = render_relations(&mut s);
        assert!(geom.visible_rows < 30);
        assert!(text.contains(&format!("↓{} more", 30 - geom.visible_rows)));

        handle_key(&mut s, press(KeyCode::Tab));
        for _ in 0..40 {
            handle_key(&mut s, press(KeyCode::Down));
        }
        assert_eq!(s.relation_selected, Some(29));

        let (geom, text) = render_relations(&mut s);
        assert!(geom.rows.iter().any(|r| r.index == 29));
        assert!(text.contains("S29 supports"));
        assert!(text.contains("↑"));
        assert!(!text.contains("S0 supports"));

        handle_key(&mut s, press(KeyCode::Up));
        assert_eq!(s.relation_selected, Some(28));
        handle_key(&mut s, press(KeyCode::Enter));
        assert_eq!(s.selected_item_id(), Some(ItemId::new("s28")));
        assert_eq!(s.relation_scroll, 0);
    }

    #[test]
    fn wheel_scrolls_relations_and_clicks_hit_scrolled_rows() {
        let mut s = crowded_state();
        let (geom, _) = render_relations(&mut s);
        let over = geom.incoming_column;

        for _ in 0..3 {
            handle_mouse(
                &mut s,
                MouseEvent {
                    kind: MouseEventKind::ScrollDown,
                    column: over.x,
                    row: over.y + 1,
                    modifiers: KeyModifiers::NONE,
                },
            );
        }
        assert_eq!(s.relation_scroll, 3);
        // The tree selection did not move.
        assert_eq!(s.selected_item_id(), Some(ItemId::new("a")));

        let (geom, _) = render_relations(&mut s);
        let first = &geom.rows[0];
        assert_eq!(first.index, 3);
        handle_mouse(&mut s, click(first.rect.x, first.rect.y));
        assert_eq!(s.selected_item_id(), Some(ItemId::new("s3")));
    }

    #[test]
    fn tree_keys_expand_and_collapse() {
        let tree = ItemTree::new(vec![
            Item::new("p", "P").with_children(vec![Item::new("k", "K")]),
        ]);
        let mut config = AppConfig::default();
        config.expand_depth = 0;
        let mut s = AppState::new(tree, config);

        handle_key(&mut s, press(KeyCode::Right));
        handle_key(&mut s, press(KeyCode::Down));
        assert_eq!(s.selected_item_id(), Some(ItemId::new("k")));

        // Collapse on a leaf jumps to its parent, then collapses it.
        handle_key(&mut s, press(KeyCode::Left));
        assert_eq!(s.selected_item_id(), Some(ItemId::new("p")));
        handle_key(&mut s, press(KeyCode::Left));
        assert_eq!(s.rows().len(), 1);
    }

    #[test]
    fn reload_keeps_selection_and_refreshes_relations() {
        let path = std::env::temp_dir().join(format!("relview-handler-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"id": "a", "title": "A"}, {"id": "b", "title": "B"}]"#).unwrap();
        let mut s = AppState::new(loader::load_items(&path).unwrap(), AppConfig::default());
        s.source = Some(path.clone());
        assert!(s.select_row_for(&ItemId::new("b")));
        assert!(s.relations_view().is_empty());

        std::fs::write(
            &path,
            r#"[{"id": "a", "title": "A", "tags": ["[blocks: B]"]}, {"id": "b", "title": "B"}]"#,
        )
        .unwrap();
        handle_key(&mut s, press(KeyCode::Char('r')));
        assert_eq!(s.selected_item_id(), Some(ItemId::new("b")));
        assert_eq!(s.relations_view().incoming.len(), 1);

        std::fs::write(&path, "{").unwrap();
        handle_key(&mut s, press(KeyCode::Char('r')));
        assert!(s.status_message.as_deref().is_some_and(|m| m.starts_with("Reload failed")));
        assert_eq!(s.tree.roots().len(), 2);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn help_opens_and_closes() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('?')));
        assert_eq!(s.active_view, ActiveView::Help);
        handle_key(&mut s, press(KeyCode::Esc));
        assert_eq!(s.active_view, ActiveView::Main);
        assert!(!s.should_quit);
    }
}
