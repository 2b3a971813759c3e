//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No I/O happens here.

pub mod detail;
pub mod layout;
pub mod popup;
pub mod relations_panel;
pub mod theme;
pub mod tree_widget;
