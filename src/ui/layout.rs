//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width share of the tree pane, in percent.
const TREE_PANE_PCT: u16 = 45;
/// Rows the detail pane keeps when the relations panel wants more.
const DETAIL_MIN_HEIGHT: u16 = 4;
/// Borders, column header and two body rows: one relation plus the
/// overflow line.
const RELATIONS_MIN_HEIGHT: u16 = 5;

/// Primary screen layout: tree on the left, detail and relations on the
/// right, status bar at the bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppLayout {
    pub tree_area: Rect,
    pub detail_area: Rect,
    /// Zero-sized when the relations panel has nothing to show.
    pub relations_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area and the height the
    /// relations panel asks for (0 = no panel).
    pub fn from_area(area: Rect, relations_height: u16) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // panes (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(TREE_PANE_PCT),
                Constraint::Percentage(100 - TREE_PANE_PCT),
            ])
            .split(rows[0]);

        let right = cols[1];
        // The detail pane keeps a few rows, unless that would leave the
        // relations panel with no room for a single relation.
        let relations_height = relations_height
            .min(right.height.saturating_sub(DETAIL_MIN_HEIGHT))
            .max(relations_height.min(RELATIONS_MIN_HEIGHT))
            .min(right.height);
        let right_split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(relations_height)])
            .split(right);

        Self {
            tree_area: cols[0],
            detail_area: right_split[0],
            relations_area: right_split[1],
            status_area: rows[1],
        }
    }
}
