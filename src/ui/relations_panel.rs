//! Relations panel: outgoing and incoming relations of the selected item,
//! side by side.
//!
//! * [`RelationsView`] resolves outgoing targets against the tree so every
//!   row knows where it navigates to (or that it can't).
//! * [`RelationsGeometry`] is pure layout math shared between the widget and
//!   the mouse handler.
//! * [`RelationsPanel`] draws it.  When there is nothing to show the panel
//!   takes no space at all (see [`panel_height`]).
//!
//! Both columns scroll together by one row offset.  When rows don't fit, the
//! last body line of each column says how many are hidden above and below.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::core::{
    backlinks::IncomingRelation,
    relations::{find_item_by_title, Relation},
    tree::{Item, ItemId},
};
use crate::ui::theme::Theme;

const NOT_FOUND_MARKER: &str = " (not found)";
const EMPTY_PLACEHOLDER: &str = "none";

// ─── view model ─────────────────────────────────────────────────

/// An outgoing relation plus the item its target title resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEntry {
    pub relation: Relation,
    pub target: Option<ItemId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationsView {
    pub outgoing: Vec<OutgoingEntry>,
    pub incoming: Vec<IncomingRelation>,
}

impl RelationsView {
    pub fn resolve(roots: &[Item], outgoing: Vec<Relation>, incoming: Vec<IncomingRelation>) -> Self {
        let outgoing = outgoing
            .into_iter()
            .map(|relation| {
                let target = find_item_by_title(roots, &relation.target).map(|i| i.id.clone());
                OutgoingEntry { relation, target }
            })
            .collect();
        Self { outgoing, incoming }
    }

    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty() && self.incoming.is_empty()
    }

    /// Total rows: outgoing first, then incoming.
    pub fn len(&self) -> usize {
        self.outgoing.len() + self.incoming.len()
    }

    /// Navigation target of the row at `index` (outgoing first).
    pub fn target(&self, index: usize) -> Option<&ItemId> {
        if index < self.outgoing.len() {
            self.outgoing[index].target.as_ref()
        } else {
            self.incoming
                .get(index - self.outgoing.len())
                .map(|r| &r.source.id)
        }
    }

    /// Next row after `from` (or the first one) that has a target.
    pub fn next_navigable(&self, from: Option<usize>) -> Option<usize> {
        let start = from.map_or(0, |i| i + 1);
        (start..self.len()).find(|&i| self.target(i).is_some())
    }

    /// Previous row before `from` (or the last one) that has a target.
    pub fn prev_navigable(&self, from: Option<usize>) -> Option<usize> {
        let end = from.unwrap_or(self.len());
        (0..end).rev().find(|&i| self.target(i).is_some())
    }
}

/// Height the panel wants, borders included.  Zero when there is nothing to
/// show.
pub fn panel_height(view: &RelationsView) -> u16 {
    if view.is_empty() {
        return 0;
    }
    let rows = view.outgoing.len().max(view.incoming.len()).max(1);
    // borders + column header + rows
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(3)
}

// ─── geometry ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RelationRowGeometry {
    /// Row index in [`RelationsView`] order.
    pub index: usize,
    pub rect: Rect,
    pub target: Option<ItemId>,
}

/// Rows of one column hidden by scrolling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HiddenRows {
    pub above: usize,
    pub below: usize,
}

impl HiddenRows {
    fn new(len: usize, scroll: usize, visible: usize) -> Self {
        Self {
            above: scroll.min(len),
            below: len.saturating_sub(scroll + visible),
        }
    }

    pub fn any(self) -> bool {
        self.above > 0 || self.below > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct RelationsGeometry {
    pub outgoing_column: Rect,
    pub incoming_column: Rect,
    pub rows: Vec<RelationRowGeometry>,
    /// Row offset actually applied, after clamping.
    pub scroll: usize,
    pub max_scroll: usize,
    /// Relation rows shown per column.
    pub visible_rows: usize,
    /// Screen row of the overflow line, when rows are hidden.
    pub overflow_y: Option<u16>,
    pub outgoing_hidden: HiddenRows,
    pub incoming_hidden: HiddenRows,
}

impl RelationsGeometry {
    /// Lay out the panel in `area`, starting `requested_scroll` rows down.
    /// The offset is clamped so the last rows are never scrolled past.
    pub fn compute(area: Rect, view: &RelationsView, requested_scroll: usize) -> Self {
        if view.is_empty() || area.width == 0 || area.height == 0 {
            return Self::default();
        }
        let inner = panel_block(false).inner(area);
        let [outgoing_column, incoming_column] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .spacing(1)
                .areas(inner);

        // First line of each column is the header.
        let body_height = usize::from(outgoing_column.height.saturating_sub(1));
        let total = view.outgoing.len().max(view.incoming.len());
        let overflow = total > body_height && body_height >= 2;
        let visible_rows = if overflow {
            body_height - 1
        } else {
            body_height.min(total)
        };
        let max_scroll = total.saturating_sub(visible_rows);
        let scroll = if visible_rows == 0 {
            0
        } else {
            requested_scroll.min(max_scroll)
        };

        let mut rows = Vec::new();
        let outgoing_targets = view.outgoing.iter().map(|e| e.target.clone());
        push_rows(&mut rows, outgoing_column, 0, scroll, visible_rows, outgoing_targets);
        let incoming_targets = view.incoming.iter().map(|r| Some(r.source.id.clone()));
        push_rows(
            &mut rows,
            incoming_column,
            view.outgoing.len(),
            scroll,
            visible_rows,
            incoming_targets,
        );

        let overflow_y = overflow.then(|| row_y(outgoing_column, visible_rows));
        Self {
            outgoing_column,
            incoming_column,
            rows,
            scroll,
            max_scroll,
            visible_rows,
            overflow_y,
            outgoing_hidden: HiddenRows::new(view.outgoing.len(), scroll, visible_rows),
            incoming_hidden: HiddenRows::new(view.incoming.len(), scroll, visible_rows),
        }
    }

    /// Navigation target under a terminal cell, if any.
    pub fn target_at(&self, col: u16, row: u16) -> Option<&ItemId> {
        self.rows
            .iter()
            .find(|r| r.rect.contains(Position::new(col, row)))
            .and_then(|r| r.target.as_ref())
    }

    /// Scroll offset that keeps view row `index` on screen, moving as little
    /// as possible from the current one.
    pub fn scroll_to_show(&self, view: &RelationsView, index: usize) -> usize {
        if self.visible_rows == 0 {
            return 0;
        }
        // Body line of the row within its own column.
        let line = if index < view.outgoing.len() {
            index
        } else {
            index - view.outgoing.len()
        };
        let scroll = if line < self.scroll {
            line
        } else if line >= self.scroll + self.visible_rows {
            line + 1 - self.visible_rows
        } else {
            self.scroll
        };
        scroll.min(self.max_scroll)
    }
}

/// Screen row of body line `line` (0 = first line under the header).
fn row_y(column: Rect, line: usize) -> u16 {
    let line = u16::try_from(line).unwrap_or(u16::MAX);
    column.y.saturating_add(1).saturating_add(line)
}

fn push_rows(
    rows: &mut Vec<RelationRowGeometry>,
    column: Rect,
    first_index: usize,
    scroll: usize,
    visible: usize,
    targets: impl Iterator<Item = Option<ItemId>>,
) {
    for (i, target) in targets.enumerate().skip(scroll).take(visible) {
        rows.push(RelationRowGeometry {
            index: first_index + i,
            rect: Rect::new(column.x, row_y(column, i - scroll), column.width, 1),
            target,
        });
    }
}

// ─── widget ─────────────────────────────────────────────────────

pub struct RelationsPanel<'a> {
    view: &'a RelationsView,
    selected: Option<usize>,
    focused: bool,
    scroll: usize,
}

impl<'a> RelationsPanel<'a> {
    pub fn new(view: &'a RelationsView) -> Self {
        Self {
            view,
            selected: None,
            focused: false,
            scroll: 0,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn outgoing_line(&self, index: usize, entry: &OutgoingEntry) -> Line<'a> {
        let rel = &entry.relation;
        let mut spans = vec![
            Span::styled(rel.relation.clone(), Theme::relation_style(&rel.relation)),
            Span::raw(" "),
        ];
        match entry.target {
            Some(_) => spans.push(Span::styled(rel.target.clone(), Theme::link_style())),
            None => {
                spans.push(Span::styled(rel.target.clone(), Theme::missing_link_style()));
                spans.push(Span::styled(NOT_FOUND_MARKER, Theme::placeholder_style()));
            }
        }
        self.highlight(index, Line::from(spans))
    }

    fn incoming_line(&self, index: usize, rel: &IncomingRelation) -> Line<'a> {
        let spans = vec![
            Span::styled(rel.source.title.clone(), Theme::link_style()),
            Span::raw(" "),
            Span::styled(rel.relation.clone(), Theme::relation_style(&rel.relation)),
        ];
        self.highlight(index, Line::from(spans))
    }

    fn highlight(&self, index: usize, line: Line<'a>) -> Line<'a> {
        if self.focused && self.selected == Some(index) {
            line.style(Theme::selected_style())
        } else {
            line
        }
    }
}

impl<'a> Widget for RelationsPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.view.is_empty() || area.width == 0 || area.height == 0 {
            return;
        }

        panel_block(self.focused).render(area, buf);
        let geom = RelationsGeometry::compute(area, self.view, self.scroll);

        render_header(geom.outgoing_column, "Outgoing", buf);
        render_header(geom.incoming_column, "Incoming", buf);

        if self.view.outgoing.is_empty() {
            render_placeholder(geom.outgoing_column, buf);
        }
        if self.view.incoming.is_empty() {
            render_placeholder(geom.incoming_column, buf);
        }

        let out_len = self.view.outgoing.len();
        for row in &geom.rows {
            let line = if row.index < out_len {
                self.outgoing_line(row.index, &self.view.outgoing[row.index])
            } else {
                self.incoming_line(row.index, &self.view.incoming[row.index - out_len])
            };
            buf.set_line(row.rect.x, row.rect.y, &line, row.rect.width);
        }

        if let Some(y) = geom.overflow_y {
            render_overflow(geom.outgoing_column, y, geom.outgoing_hidden, buf);
            render_overflow(geom.incoming_column, y, geom.incoming_hidden, buf);
        }
    }
}

fn panel_block(focused: bool) -> Block<'static> {
    let border = if focused {
        Theme::focused_border_style()
    } else {
        Theme::border_style()
    };
    Block::default()
        .title(" Relations ")
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(border)
}

fn render_header(column: Rect, label: &'static str, buf: &mut Buffer) {
    if column.height == 0 {
        return;
    }
    let line = Line::from(Span::styled(label, Theme::section_header_style()));
    buf.set_line(column.x, column.y, &line, column.width);
}

fn render_placeholder(column: Rect, buf: &mut Buffer) {
    if column.height < 2 {
        return;
    }
    let line = Line::from(Span::styled(EMPTY_PLACEHOLDER, Theme::placeholder_style()));
    buf.set_line(column.x, column.y + 1, &line, column.width);
}

/// `↑2 ↓5 more` under a column that has rows scrolled out of view.
fn render_overflow(column: Rect, y: u16, hidden: HiddenRows, buf: &mut Buffer) {
    if !hidden.any() {
        return;
    }
    let mut parts = Vec::new();
    if hidden.above > 0 {
        parts.push(format!("↑{}", hidden.above));
    }
    if hidden.below > 0 {
        parts.push(format!("↓{}", hidden.below));
    }
    let text = format!("{} more", parts.join(" "));
    let line = Line::from(Span::styled(text, Theme::hint_style()));
    buf.set_line(column.x, y, &line, column.width);
}
