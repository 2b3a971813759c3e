//! A tree-based TUI for browsing items and the tagged relations between them.
//!
//! Run with a JSON item document to open the tree view.  The panel on the
//! right lists the selected item's outgoing relations (from its own tags) and
//! incoming ones (tags on other items that name it).

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stdout, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    navigation::Navigator,
    state::{ActiveView, AppState, PaneFocus},
};
use crate::core::relations::find_item_by_title;
use crate::ui::{
    detail::DetailWidget,
    layout::AppLayout,
    popup::HelpPopup,
    relations_panel::{panel_height, RelationsPanel},
    theme::Theme,
    tree_widget::TreeWidget,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Browse items and their tagged relations")]
struct Cli {
    /// JSON document with the item tree.
    file: PathBuf,

    /// Title of the item to select on start.
    #[arg(long)]
    select: Option<String>,

    /// Levels of the tree to expand on start (overrides the config file).
    #[arg(long)]
    expand_depth: Option<usize>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

type Term = Terminal<CrosstermBackend<Stdout>>;

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let tree = core::loader::load_items(&cli.file)?;
    let mut config = config::AppConfig::load();
    if let Some(depth) = cli.expand_depth {
        config.expand_depth = depth;
    }
    let mut state = AppState::new(tree, config);
    state.source = Some(cli.file.clone());
    if state.tree.is_empty() {
        state.status_message = Some("The document has no items".to_string());
    }

    if let Some(title) = cli.select.as_deref() {
        match find_item_by_title(state.tree.roots(), title).map(|i| i.id.clone()) {
            Some(id) => state.select_item(&id),
            None => state.status_message = Some(format!("No item titled {title:?}")),
        }
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run(&mut terminal, &mut state).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn init_tracing(log_file: Option<&std::path::Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── event loop ───────

async fn run(terminal: &mut Term, state: &mut AppState) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(100));

    loop {
        terminal.draw(|frame| draw(frame, state))?;

        let Some(event) = events.recv().await else {
            tracing::warn!("terminal event reader stopped");
            break;
        };
        match event {
            AppEvent::Key(k) => handler::handle_key(state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(state, m),
            AppEvent::Resize(w, h) => {
                state.terminal_area = ratatui::layout::Rect::new(0, 0, w, h);
            }
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &mut AppState) {
    state.terminal_area = frame.area();
    let view = state.relations_view();
    let layout = AppLayout::from_area(frame.area(), panel_height(&view));

    let tree_border = if state.focus == PaneFocus::Tree {
        Theme::focused_border_style()
    } else {
        Theme::border_style()
    };
    let tree_block = Block::default()
        .title(format!(" Items ({}) ", state.tree.iter().count()))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(tree_border);
    let rows = state.rows();
    frame.render_stateful_widget(
        TreeWidget::new(&rows).block(tree_block),
        layout.tree_area,
        &mut state.tree_state,
    );

    let detail_block = Block::default()
        .title(" Item ")
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    frame.render_widget(
        DetailWidget {
            block: detail_block,
            item: state.selected_item(),
        },
        layout.detail_area,
    );

    frame.render_widget(
        RelationsPanel::new(&view)
            .selected(state.relation_selected)
            .scroll(state.relation_scroll)
            .focused(state.focus == PaneFocus::Relations),
        layout.relations_area,
    );

    let hint = state.config.status_bar_hint();
    let status_text = state.status_message.as_deref().unwrap_or(&hint);
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );

    if state.active_view == ActiveView::Help {
        frame.render_widget(
            HelpPopup {
                config: &state.config,
            },
            frame.area(),
        );
    }
}
