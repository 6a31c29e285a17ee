//! Arena-backed syntax trees built from tree-sitter parses.
//!
//! Every request parses its own snapshot of the source into a [`SyntaxTree`]. Nodes live in
//! a flat arena and refer to each other by [`NodeId`]: a parent link is a plain index and
//! children are an ordered index list, so the tree can be walked in both directions without
//! reference cycles. The arena is stored in pre-order, which makes "document order" the same
//! as index order.

mod locate;
mod render;

pub use locate::{DEFAULT_LINE_WEIGHT, LIST_PARENT_KINDS, NodeDescriptor};
pub use render::render_subtree;

use crate::error::Result;
use crate::lang::LanguageVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use tree_sitter::{Point, Tree};

/// A zero-based line/column position. Columns count bytes within the line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns the position reached after writing `text` starting here.
    pub fn advance(self, text: &str) -> Position {
        match text.rfind('\n') {
            Some(last) => Position {
                line: self.line + text.matches('\n').count(),
                column: text.len() - last - 1,
            },
            None => Position {
                line: self.line,
                column: self.column + text.len(),
            },
        }
    }

    /// Moves a position that sat `self - from` into some text starting at `from` so that it
    /// keeps the same offset relative to `to`.
    ///
    /// Only the first line of the text shifts horizontally; on later lines the column is
    /// independent of where the text starts.
    pub fn rebase(self, from: Position, to: Position) -> Position {
        if self.line == from.line {
            Position {
                line: to.line,
                column: to.column + self.column.saturating_sub(from.column),
            }
        } else {
            Position {
                line: to.line + (self.line - from.line),
                column: self.column,
            }
        }
    }
}

impl From<Point> for Position {
    fn from(point: Point) -> Self {
        Self {
            line: point.row,
            column: point.column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Creates a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Half-open containment: the start is inside the range, the end is not.
    pub fn contains(&self, point: Position) -> bool {
        self.start <= point && point < self.end
    }

    /// Size metric used to rank overlapping candidates. A single extra line always
    /// outweighs any column difference as long as `line_weight` exceeds the widest line.
    pub fn weighted_size(&self, line_weight: usize) -> i64 {
        let lines = (self.end.line - self.start.line) as i64;
        let columns = self.end.column as i64 - self.start.column as i64;
        lines * line_weight as i64 + columns
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A single node of the arena.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    /// Grammar kind, e.g. `call_expression` or `,`.
    pub kind: &'static str,
    /// False for punctuation, operators and keywords.
    pub named: bool,
    /// Role of this node within its parent, e.g. `arguments` or `body`.
    pub field: Option<&'static str>,
    pub range: Range,
    pub bytes: std::ops::Range<usize>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A parsed source snapshot.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    variant: LanguageVariant,
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Parses `source` with the grammar for `variant`.
    pub fn parse(source: &str, variant: LanguageVariant) -> Result<Self> {
        let tree = variant.parse(source)?;
        Ok(Self::from_tree(source, variant, &tree))
    }

    /// Lowers a tree-sitter tree into the arena.
    pub fn from_tree(source: &str, variant: LanguageVariant, tree: &Tree) -> Self {
        let mut nodes: Vec<SyntaxNode> = Vec::with_capacity(tree.root_node().descendant_count());
        let mut cursor = tree.walk();
        // Ancestors of the cursor's current node.
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            let node = cursor.node();
            let id = NodeId(nodes.len());
            let parent = stack.last().copied();
            nodes.push(SyntaxNode {
                kind: node.kind(),
                named: node.is_named(),
                field: cursor.field_name(),
                range: Range::new(node.start_position().into(), node.end_position().into()),
                bytes: node.byte_range(),
                parent,
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                nodes[parent.0].children.push(id);
            }

            if cursor.goto_first_child() {
                stack.push(id);
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Self {
                        source: source.to_string(),
                        variant,
                        nodes,
                    };
                }
                stack.pop();
            }
        }
    }

    /// The source snapshot this tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn variant(&self) -> LanguageVariant {
        self.variant
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &'static str {
        self.nodes[id.0].kind
    }

    pub fn range(&self, id: NodeId) -> Range {
        self.nodes[id.0].range
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// The literal source text covered by a node.
    pub fn text(&self, id: NodeId) -> &str {
        &self.source[self.nodes[id.0].bytes.clone()]
    }

    /// Source text between two byte offsets.
    pub fn slice(&self, from: usize, to: usize) -> &str {
        &self.source[from..to]
    }

    /// First child playing the given role.
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.nodes[child.0].field == Some(field))
    }

    /// Named children other than comments: the items of a list-like node.
    pub fn items(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| {
                let node = &self.nodes[child.0];
                node.named && node.kind != "comment"
            })
            .collect()
    }

    /// Children other than comments, including punctuation and operators.
    pub fn significant_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.nodes[child.0].kind != "comment")
            .collect()
    }

    /// All nodes in document order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Proper ancestors of `id`, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&current| self.parent(current))
    }

    /// All nodes whose kind is in `kinds`, in document order.
    pub fn nodes_of_kind(&self, kinds: &[&str]) -> Vec<NodeId> {
        self.ids()
            .filter(|&id| kinds.contains(&self.kind(id)))
            .collect()
    }
}

/// Converts a position into a byte offset of `source`.
///
/// Returns `None` when the line does not exist; columns past the end of a line clamp to it.
pub fn offset_of(source: &str, position: Position) -> Option<usize> {
    let mut offset = 0;
    for (line_num, line) in source.split('\n').enumerate() {
        if line_num == position.line {
            return Some(offset + position.column.min(line.len()));
        }
        offset += line.len() + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(source: &str) -> SyntaxTree {
        SyntaxTree::parse(source, LanguageVariant::Module).unwrap()
    }

    #[test]
    fn test_arena_links_are_consistent() {
        let tree = tree("f(a, b);\nconst x = 1;");
        assert_eq!(tree.kind(tree.root()), "program");
        assert!(tree.parent(tree.root()).is_none());

        for id in tree.ids() {
            for &child in tree.children(id) {
                assert_eq!(tree.parent(child), Some(id));
                assert!(child > id, "arena must be stored in pre-order");
            }
        }
    }

    #[test]
    fn test_text_and_ranges() {
        let tree = tree("f(alpha, beta);");
        let idents = tree.nodes_of_kind(&["identifier"]);
        let texts: Vec<&str> = idents.iter().map(|&id| tree.text(id)).collect();
        assert_eq!(texts, vec!["f", "alpha", "beta"]);

        let alpha = idents[1];
        assert_eq!(
            tree.range(alpha),
            Range::new(Position::new(0, 2), Position::new(0, 7))
        );
    }

    #[test]
    fn test_field_roles() {
        let tree = tree("f(a);");
        let call = tree.nodes_of_kind(&["call_expression"])[0];
        let args = tree.child_by_field(call, "arguments").unwrap();
        assert_eq!(tree.kind(args), "arguments");
        let callee = tree.child_by_field(call, "function").unwrap();
        assert_eq!(tree.text(callee), "f");
    }

    #[test]
    fn test_items_skip_punctuation() {
        let tree = tree("f(a, /* c */ b);");
        let args = tree.nodes_of_kind(&["arguments"])[0];
        let items: Vec<&str> = tree.items(args).iter().map(|&id| tree.text(id)).collect();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn test_half_open_containment() {
        let range = Range::new(Position::new(0, 2), Position::new(0, 5));
        assert!(range.contains(Position::new(0, 2)));
        assert!(range.contains(Position::new(0, 4)));
        assert!(!range.contains(Position::new(0, 5)));
        assert!(!range.contains(Position::new(0, 1)));

        let empty = Range::new(Position::new(1, 1), Position::new(1, 1));
        assert!(!empty.contains(Position::new(1, 1)));
    }

    #[test]
    fn test_weighted_size_prefers_single_line() {
        let wide = Range::new(Position::new(0, 0), Position::new(0, 900));
        let tall = Range::new(Position::new(0, 10), Position::new(1, 0));
        assert!(wide.weighted_size(1000) < tall.weighted_size(1000));
    }

    #[test]
    fn test_advance_and_rebase() {
        let start = Position::new(2, 4);
        assert_eq!(start.advance("abc"), Position::new(2, 7));
        assert_eq!(start.advance("ab\ncd"), Position::new(3, 2));
        assert_eq!(start.advance("ab\n"), Position::new(3, 0));

        // First line of the item shifts with it.
        let moved = Position::new(0, 6).rebase(Position::new(0, 4), Position::new(3, 10));
        assert_eq!(moved, Position::new(3, 12));

        // Later lines keep their column.
        let moved = Position::new(2, 1).rebase(Position::new(0, 4), Position::new(3, 10));
        assert_eq!(moved, Position::new(5, 1));
    }

    #[test]
    fn test_offset_of() {
        let source = "ab\ncde\n";
        assert_eq!(offset_of(source, Position::new(0, 1)), Some(1));
        assert_eq!(offset_of(source, Position::new(1, 0)), Some(3));
        assert_eq!(offset_of(source, Position::new(1, 9)), Some(6));
        assert_eq!(offset_of(source, Position::new(2, 0)), Some(7));
        assert_eq!(offset_of(source, Position::new(3, 0)), None);
    }
}
