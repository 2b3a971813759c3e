//! Detail pane: title, id and raw tags of the selected item.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::core::tree::Item;
use crate::ui::theme::Theme;

pub struct DetailWidget<'a> {
    pub block: Block<'a>,
    pub item: Option<&'a Item>,
}

impl<'a> Widget for DetailWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(detail_lines(self.item))
            .block(self.block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

fn detail_lines(item: Option<&Item>) -> Vec<Line<'static>> {
    let Some(item) = item else {
        return vec![Line::from(Span::styled(
            "The document has no items.",
            Theme::placeholder_style(),
        ))];
    };

    let mut lines = vec![
        Line::from(Span::styled(
            item.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        kv_line("Id", item.id.as_str()),
        kv_line("Children", &item.items.len().to_string()),
        Line::raw(""),
    ];

    if item.tags.is_empty() {
        lines.push(Line::from(Span::styled("no tags", Theme::placeholder_style())));
    } else {
        lines.push(Line::from(Span::styled("Tags", Theme::section_header_style())));
        lines.extend(
            item.tags
                .iter()
                .map(|t| Line::from(vec![Span::styled("  • ", Theme::hint_style()), Span::raw(t.clone())])),
        );
    }
    lines
}

fn kv_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Theme::hint_style()),
        Span::raw(value.to_string()),
    ])
}
