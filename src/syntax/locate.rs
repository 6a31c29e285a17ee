//! Node lookup: point containment, ancestor search and descriptor correlation.

use super::{NodeId, Position, Range, SyntaxTree};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weight of one line in [`Range::weighted_size`].
pub const DEFAULT_LINE_WEIGHT: usize = 1000;

/// Node kinds whose children form a reorderable sequence.
pub const LIST_PARENT_KINDS: &[&str] = &[
    "arguments",
    "formal_parameters",
    "binary_expression",
    "ternary_expression",
    "object_pattern",
    "intersection_type",
    "union_type",
];

/// A value-based summary of a node, captured by the host from its own parse.
///
/// Two parses of the same text do not share node identity, so a descriptor is matched by
/// value against a fresh tree with [`SyntaxTree::correlate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub range: Range,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Position>,
}

impl NodeDescriptor {
    /// Captures a descriptor for a node of `tree`.
    pub fn capture(tree: &SyntaxTree, id: NodeId, cursor: Option<Position>) -> Self {
        Self {
            range: tree.range(id),
            text: tree.text(id).to_string(),
            kind: tree.kind(id).to_string(),
            cursor,
        }
    }
}

impl SyntaxTree {
    /// The most specific node containing `point`.
    ///
    /// Descends from the root into the first child that contains the point and stops at
    /// the first node none of whose children do. Returns `None` when even the root does
    /// not contain the point.
    pub fn deepest_at(&self, point: Position) -> Option<NodeId> {
        let mut current = self.root();
        if !self.range(current).contains(point) {
            return None;
        }

        'descend: loop {
            for &child in self.children(current) {
                if self.range(child).contains(point) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// Among `candidates`, the one containing `point` with the smallest weighted size.
    ///
    /// Ties go to the candidate that came first.
    pub fn closest_among(
        &self,
        candidates: impl IntoIterator<Item = NodeId>,
        point: Position,
        line_weight: usize,
    ) -> Option<NodeId> {
        let mut best: Option<(NodeId, i64)> = None;
        for id in candidates {
            let range = self.range(id);
            if !range.contains(point) {
                continue;
            }
            let size = range.weighted_size(line_weight);
            if best.is_none_or(|(_, smallest)| size < smallest) {
                best = Some((id, size));
            }
        }
        best.map(|(id, _)| id)
    }

    /// The nearest proper ancestor of `id` whose kind is in `kinds`.
    pub fn ancestor_of_kind(&self, id: NodeId, kinds: &[&str]) -> Option<NodeId> {
        self.ancestors(id)
            .find(|&ancestor| kinds.contains(&self.kind(ancestor)))
    }

    /// `id` itself when its kind is in `kinds`, otherwise [`Self::ancestor_of_kind`].
    pub fn self_or_ancestor_of_kind(&self, id: NodeId, kinds: &[&str]) -> Option<NodeId> {
        if kinds.contains(&self.kind(id)) {
            Some(id)
        } else {
            self.ancestor_of_kind(id, kinds)
        }
    }

    /// The list-like node enclosing the node at `point`.
    pub fn list_parent_at(&self, point: Position) -> Option<NodeId> {
        let deepest = self.deepest_at(point)?;
        self.ancestor_of_kind(deepest, LIST_PARENT_KINDS)
    }

    /// Finds the node of this tree a descriptor refers to.
    ///
    /// The exact range is the primary key. Nodes sharing a range also share their text, so
    /// a text mismatch means the descriptor is stale and nothing matches. Several nodes on
    /// the same range are narrowed by kind; only a single survivor counts as a match.
    pub fn correlate(&self, descriptor: &NodeDescriptor) -> Option<NodeId> {
        let by_range: Vec<NodeId> = self
            .ids()
            .filter(|&id| self.range(id) == descriptor.range)
            .collect();
        let &first = by_range.first()?;
        if self.text(first) != descriptor.text {
            debug!(range = %descriptor.range, "descriptor text is stale");
            return None;
        }
        if let [only] = by_range.as_slice() {
            return Some(*only);
        }

        let by_kind: Vec<NodeId> = by_range
            .into_iter()
            .filter(|&id| self.kind(id) == descriptor.kind)
            .collect();
        match by_kind.as_slice() {
            [only] => Some(*only),
            ambiguous => {
                debug!(
                    range = %descriptor.range,
                    kind = %descriptor.kind,
                    matches = ambiguous.len(),
                    "descriptor did not correlate to a single node"
                );
                None
            }
        }
    }
}
