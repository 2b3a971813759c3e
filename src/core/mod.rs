//! Core data – the item tree, tag parsing, relation derivation and loading.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod backlinks;
pub mod loader;
pub mod memo;
pub mod relations;
pub mod tree;
