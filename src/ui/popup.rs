//! Help overlay listing the active key bindings.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, Widget},
};

use crate::config::{Action, AppConfig};

use super::theme::Theme;

const POPUP_WIDTH: u16 = 52;
const FOOTER: [&str; 2] = [
    "Click a relation to jump to its item.",
    "Esc: close",
];

pub struct HelpPopup<'a> {
    pub config: &'a AppConfig,
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Action::ALL.len() as u16;
        // 1 blank above the table, 1 between table and footer, 2 for borders.
        let popup = centered_fixed(POPUP_WIDTH, rows + FOOTER.len() as u16 + 4, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Help ")
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_style());
        let inner = block.inner(popup);
        block.render(popup, buf);

        let [_, table_area, _, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(rows),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(inner);

        let table = Table::new(
            Action::ALL.iter().map(|&action| {
                Row::new([
                    Line::raw(action.label()),
                    Line::styled(self.config.display_bindings(action), Theme::key_style()).right_aligned(),
                ])
            }),
            [Constraint::Fill(1), Constraint::Fill(1)],
        )
        .column_spacing(1);
        Widget::render(table, table_area.inner(Margin::new(2, 0)), buf);

        let footer: Vec<Line> = FOOTER
            .iter()
            .map(|text| Line::styled(format!("  {text}"), Theme::hint_style()))
            .collect();
        Paragraph::new(footer).render(footer_area, buf);
    }
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
