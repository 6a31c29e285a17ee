//! `debug-node-under-cursor`: a tree dump around the anchor.

use super::{Anchor, ModFailure, ModResult};
use crate::config::EngineConfig;
use crate::syntax::{SyntaxTree, render_subtree};

const ROOT_KINDS: &[&str] = &["program"];

/// Renders the neighbourhood of the anchored node.
///
/// The dump is returned as a `DEBUG` failure so hosts show it through their ordinary
/// error display.
pub fn describe_node(tree: &SyntaxTree, anchor: &Anchor, config: &EngineConfig) -> ModResult {
    let anchored = anchor
        .resolve(tree)
        .ok_or_else(|| ModFailure::no_match("no node at cursor"))?;

    let mut top = anchored;
    for _ in 0..config.debug_ancestor_levels {
        if ROOT_KINDS.contains(&tree.kind(top)) {
            break;
        }
        match tree.parent(top) {
            Some(parent) => top = parent,
            None => break,
        }
    }

    Err(ModFailure::debug(render_subtree(
        tree,
        top,
        anchored,
        config.debug_render_depth,
        config.debug_text_width,
    )))
}
