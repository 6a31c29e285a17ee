//! Deletion mods: `delete-function` and `delete-closest-tag`.

use tracing::debug;

use super::{Anchor, ModEdit, ModFailure, ModResult};
use crate::syntax::SyntaxTree;

const FUNCTION_KINDS: &[&str] = &["function_declaration", "generator_function_declaration"];

const TAG_KINDS: &[&str] = &["jsx_element", "jsx_self_closing_element", "jsx_fragment"];

/// Deletes the innermost function declaration at the anchor.
///
/// A point anchor picks the smallest declaration containing it. A descriptor anchor is
/// correlated first and then climbs to the nearest declaration at or above it.
pub fn delete_function(tree: &SyntaxTree, anchor: &Anchor, line_weight: usize) -> ModResult {
    let target = match anchor {
        Anchor::Point(point) => {
            tree.closest_among(tree.nodes_of_kind(FUNCTION_KINDS), *point, line_weight)
        }
        Anchor::Node(descriptor) => tree
            .correlate(descriptor)
            .and_then(|id| tree.self_or_ancestor_of_kind(id, FUNCTION_KINDS)),
    }
    .ok_or_else(|| ModFailure::no_match("no function declaration at cursor"))?;

    let range = tree.range(target);
    debug!(%range, "deleting function");
    Ok(ModEdit::new(tree.text(target), range, "").with_cursor(range.start))
}

/// Deletes the innermost JSX element, self-closing element or fragment around the anchor.
///
/// The deleted markup is also handed back as clipboard text.
pub fn delete_closest_tag(tree: &SyntaxTree, anchor: &Anchor) -> ModResult {
    let start = anchor
        .resolve(tree)
        .ok_or_else(|| ModFailure::no_match("no node at cursor"))?;
    let tag = tree
        .self_or_ancestor_of_kind(start, TAG_KINDS)
        .ok_or_else(|| ModFailure::no_match("no enclosing markup element"))?;

    let range = tree.range(tag);
    let text = tree.text(tag);
    debug!(%range, kind = tree.kind(tag), "deleting tag");
    Ok(ModEdit::new(text, range, "")
        .with_cursor(range.start)
        .with_clipboard(text))
}
