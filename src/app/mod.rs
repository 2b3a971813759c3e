//! Application orchestration: state management, event loop, and input handling.

pub mod event;
pub mod handler;
pub mod navigation;
pub mod state;
