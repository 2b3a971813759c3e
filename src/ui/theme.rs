//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Relation kinds that have a dedicated badge colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Depends,
    Supports,
    Contradicts,
    Related,
    ExtremelyHigh,
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
    ExtremelyLow,
}

impl RelationKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "depends" => Some(RelationKind::Depends),
            "supports" => Some(RelationKind::Supports),
            "contradicts" => Some(RelationKind::Contradicts),
            "related" => Some(RelationKind::Related),
            "extremely-high" => Some(RelationKind::ExtremelyHigh),
            "very-high" => Some(RelationKind::VeryHigh),
            "high" => Some(RelationKind::High),
            "medium" => Some(RelationKind::Medium),
            "low" => Some(RelationKind::Low),
            "very-low" => Some(RelationKind::VeryLow),
            "extremely-low" => Some(RelationKind::ExtremelyLow),
            _ => None,
        }
    }

    pub fn style(self) -> Style {
        let badge = |fg: Color| Style::default().fg(fg).add_modifier(Modifier::BOLD);
        match self {
            RelationKind::Depends => badge(Color::Blue),
            RelationKind::Supports => badge(Color::Green),
            RelationKind::Contradicts => badge(Color::Red),
            RelationKind::Related => badge(Color::Magenta),
            // Scale runs green → yellow → red.
            RelationKind::ExtremelyHigh => badge(Color::Rgb(0, 200, 83)),
            RelationKind::VeryHigh => badge(Color::Rgb(100, 221, 23)),
            RelationKind::High => badge(Color::Rgb(174, 234, 0)),
            RelationKind::Medium => badge(Color::Rgb(255, 214, 0)),
            RelationKind::Low => badge(Color::Rgb(255, 171, 0)),
            RelationKind::VeryLow => badge(Color::Rgb(255, 109, 0)),
            RelationKind::ExtremelyLow => badge(Color::Rgb(221, 44, 0)),
        }
    }
}

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── tree view ──────────────────────────────────────────────
    pub fn parent_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn leaf_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── relations ──────────────────────────────────────────────

    /// Badge style for a relation kind; unknown kinds get the neutral default.
    pub fn relation_style(kind: &str) -> Style {
        RelationKind::parse(kind).map_or_else(Self::relation_default_style, RelationKind::style)
    }

    pub fn relation_default_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn link_style() -> Style {
        Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn missing_link_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn placeholder_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn section_header_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn focused_border_style() -> Style {
        Style::default().fg(Color::LightBlue)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
