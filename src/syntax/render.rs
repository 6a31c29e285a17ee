//! Indented text dumps of a subtree, for diagnostics.

use super::{NodeId, SyntaxTree};

const MARKER: &str = "  <== anchor";

/// Renders `root` and up to `max_depth` levels of its descendants, one node per line.
///
/// Each line shows the field role (if any), the kind, and the range. Leaves also show their
/// text, cut to `text_width` characters. Nodes whose children fall below the depth limit get
/// a child count instead. The `marked` node is flagged with an arrow.
pub fn render_subtree(
    tree: &SyntaxTree,
    root: NodeId,
    marked: NodeId,
    max_depth: usize,
    text_width: usize,
) -> String {
    let mut output = String::new();
    render_node(tree, root, marked, 0, max_depth, text_width, &mut output);
    output
}

fn render_node(
    tree: &SyntaxTree,
    id: NodeId,
    marked: NodeId,
    depth: usize,
    max_depth: usize,
    text_width: usize,
    output: &mut String,
) {
    let node = tree.node(id);
    output.push_str(&"  ".repeat(depth));
    if let Some(field) = node.field {
        output.push_str(field);
        output.push_str(": ");
    }
    if node.named {
        output.push_str(node.kind);
    } else {
        output.push_str(&format!("{:?}", node.kind));
    }
    output.push_str(&format!(" {}", node.range));

    if node.children.is_empty() {
        if node.named {
            output.push_str(&format!(" {:?}", truncate(tree.text(id), text_width)));
        }
    } else if depth == max_depth {
        output.push_str(&format!(" ({} children)", node.children.len()));
    }

    if id == marked {
        output.push_str(MARKER);
    }
    output.push('\n');

    if depth < max_depth {
        for &child in &node.children {
            render_node(tree, child, marked, depth + 1, max_depth, text_width, output);
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    match text.char_indices().nth(width) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::LanguageVariant;
    use crate::syntax::Position;

    #[test]
    fn test_render_marks_anchor() {
        let tree = SyntaxTree::parse("a + b;", LanguageVariant::Module).unwrap();
        let binary = tree.nodes_of_kind(&["binary_expression"])[0];
        let b = tree.deepest_at(Position::new(0, 4)).unwrap();

        let rendered = render_subtree(&tree, binary, b, 3, 40);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "binary_expression 0:0-0:5");
        assert_eq!(lines[1], "  left: identifier 0:0-0:1 \"a\"");
        assert_eq!(lines[2], "  operator: \"+\" 0:2-0:3");
        assert_eq!(lines[3], "  right: identifier 0:4-0:5 \"b\"  <== anchor");
    }

    #[test]
    fn test_render_respects_depth() {
        let tree = SyntaxTree::parse("f(g(h(x)));", LanguageVariant::Module).unwrap();
        let rendered = render_subtree(&tree, tree.root(), tree.root(), 1, 40);
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.lines().nth(1).unwrap().ends_with("(2 children)"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
