//! Reading an item document from disk and building an [`ItemTree`].
//!
//! The document is JSON: either a bare array of root items or an object with
//! an `items` array.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::tree::{Item, ItemTree};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid item document: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Bare(Vec<Item>),
    Wrapped { items: Vec<Item> },
}

impl Document {
    fn into_roots(self) -> Vec<Item> {
        match self {
            Document::Bare(items) | Document::Wrapped { items } => items,
        }
    }
}

/// Load the item tree stored at `path`.
pub fn load_items(path: &Path) -> Result<ItemTree, LoadError> {
    let tree = ItemTree::new(read_roots(path)?);
    tracing::info!(path = %path.display(), items = tree.iter().count(), "loaded item document");
    warn_duplicate_titles(&tree);
    Ok(tree)
}

/// Re-read `path` into an existing tree, bumping its revision.  On error the
/// tree is left as it was.
pub fn reload_items(tree: &mut ItemTree, path: &Path) -> Result<(), LoadError> {
    let roots = read_roots(path)?;
    tree.replace(roots);
    tracing::info!(path = %path.display(), revision = tree.revision(), "reloaded item document");
    warn_duplicate_titles(tree);
    Ok(())
}

fn read_roots(path: &Path) -> Result<Vec<Item>, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_items(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse an in-memory document.
pub fn parse_items(contents: &str) -> Result<Vec<Item>, serde_json::Error> {
    serde_json::from_str::<Document>(contents).map(Document::into_roots)
}

/// Titles shared by more than one item, in first-seen order.
///
/// Relation targets are matched by title, so a shared title makes both
/// lookups and back-reference attribution ambiguous.
pub fn duplicate_titles(tree: &ItemTree) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for item in tree.iter() {
        let n = counts.entry(item.title.as_str()).or_insert(0);
        *n += 1;
        if *n == 2 {
            order.push(item.title.clone());
        }
    }
    order
}

fn warn_duplicate_titles(tree: &ItemTree) {
    for title in duplicate_titles(tree) {
        tracing::warn!(%title, "title is used by more than one item; relations to it are ambiguous");
    }
}
