//! `point-free-to-anon`: turn a bare function reference into an arrow function.
//!
//! `items.map(format)` becomes `items.map(() => format())`. A reference qualifies when it is
//! passed directly as a call argument, or when it is the only expression of a template
//! substitution or JSX expression container.

use tracing::debug;

use super::{ModEdit, ModFailure, ModResult};
use crate::error::Result;
use crate::lang::LanguageVariant;
use crate::syntax::{NodeId, Position, SyntaxTree};

const REFERENCE_KINDS: &[&str] = &["identifier", "member_expression", "subscript_expression"];

const CHAIN_KINDS: &[&str] = &["member_expression", "subscript_expression"];

const INTERPOLATION_KINDS: &[&str] = &["template_substitution", "jsx_expression"];

const ARROW_PREFIX: &str = "() => ";

pub fn wrap_reference(tree: &SyntaxTree, point: Position, line_weight: usize) -> ModResult {
    let candidates = tree.nodes_of_kind(REFERENCE_KINDS);
    let resolved = tree
        .closest_among(candidates, point, line_weight)
        .ok_or_else(|| ModFailure::no_match("no reference at cursor"))?;
    let target = eligible_chain(tree, resolved).ok_or_else(|| {
        ModFailure::no_match("reference at cursor is not a call argument or interpolation")
    })?;

    let text = tree.text(target);
    let call = if outermost_is_optional(text, tree.variant())? {
        "?.()"
    } else {
        "()"
    };
    debug!(reference = text, call, "wrapping reference");

    let range = tree.range(target);
    let cursor = point.rebase(range.start, range.start.advance(ARROW_PREFIX));
    Ok(ModEdit::new(text, range, format!("{ARROW_PREFIX}{text}{call}")).with_cursor(cursor))
}

/// Climbs from `start` through the chains it is the object of until one is eligible.
fn eligible_chain(tree: &SyntaxTree, start: NodeId) -> Option<NodeId> {
    let mut current = start;
    loop {
        if is_eligible(tree, current) {
            return Some(current);
        }
        let parent = tree.parent(current)?;
        if !CHAIN_KINDS.contains(&tree.kind(parent))
            || tree.child_by_field(parent, "object") != Some(current)
        {
            return None;
        }
        current = parent;
    }
}

fn is_eligible(tree: &SyntaxTree, id: NodeId) -> bool {
    let Some(parent) = tree.parent(id) else {
        return false;
    };
    match tree.kind(parent) {
        "arguments" => true,
        kind if INTERPOLATION_KINDS.contains(&kind) => tree.items(parent) == [id],
        _ => false,
    }
}

/// Whether the last accessor of the chain `text` is `?.`.
///
/// Inner accessors are irrelevant: in `a?.b.c` the chain ends with a plain `.c`. The text
/// is parsed on its own so the answer comes from the whole reference, not the sub-node the
/// cursor resolved to.
fn outermost_is_optional(text: &str, variant: LanguageVariant) -> Result<bool> {
    let tree = SyntaxTree::parse(text, variant)?;
    let Some(&statement) = tree.items(tree.root()).first() else {
        return Ok(false);
    };
    let Some(&expression) = tree.items(statement).first() else {
        return Ok(false);
    };
    Ok(CHAIN_KINDS.contains(&tree.kind(expression))
        && tree
            .children(expression)
            .iter()
            .any(|&child| tree.kind(child) == "optional_chain"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mods::ErrorCode;
    use crate::syntax::DEFAULT_LINE_WEIGHT;

    fn run(source: &str, variant: LanguageVariant, line: usize, column: usize) -> ModResult {
        let tree = SyntaxTree::parse(source, variant).unwrap();
        wrap_reference(&tree, Position::new(line, column), DEFAULT_LINE_WEIGHT)
    }

    #[test]
    fn test_wraps_nested_argument() {
        let source = "items.find(x => x.match(pred));";
        let edit = run(source, LanguageVariant::Module, 0, 26).unwrap();
        assert_eq!(edit.original, "pred");
        assert_eq!(edit.replacement, "() => pred()");
        assert_eq!(edit.cursor, Some(Position::new(0, 32)));
    }

    #[test]
    fn test_wraps_whole_member_chain() {
        // Cursor on `utils`; the argument is the full `utils.format`.
        let edit = run("items.map(utils.format);", LanguageVariant::Script, 0, 11).unwrap();
        assert_eq!(edit.original, "utils.format");
        assert_eq!(edit.replacement, "() => utils.format()");
    }

    #[test]
    fn test_optional_outermost_accessor() {
        let edit = run("run(a?.b);", LanguageVariant::Module, 0, 7).unwrap();
        assert_eq!(edit.replacement, "() => a?.b?.()");
    }

    #[test]
    fn test_inner_optional_accessor_is_ignored() {
        let edit = run("run(a?.b.c);", LanguageVariant::Module, 0, 4).unwrap();
        assert_eq!(edit.replacement, "() => a?.b.c()");
    }

    #[test]
    fn test_optional_subscript() {
        let edit = run("run(handlers?.[0]);", LanguageVariant::Module, 0, 5).unwrap();
        assert_eq!(edit.replacement, "() => handlers?.[0]?.()");
    }

    #[test]
    fn test_template_substitution() {
        let edit = run("const s = `${render}`;", LanguageVariant::Module, 0, 14).unwrap();
        assert_eq!(edit.replacement, "() => render()");
    }

    #[test]
    fn test_jsx_expression() {
        let source = "const el = <button onClick={handler}>go</button>;";
        let edit = run(source, LanguageVariant::ModuleMarkup, 0, 30).unwrap();
        assert_eq!(edit.replacement, "() => handler()");
    }

    #[test]
    fn test_callee_is_not_eligible() {
        let err = run("run(a);", LanguageVariant::Module, 0, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoMatch);
    }

    #[test]
    fn test_assignment_is_not_eligible() {
        let err = run("const f = g;", LanguageVariant::Module, 0, 10).unwrap_err();
        assert_eq!(
            err.message,
            "reference at cursor is not a call argument or interpolation"
        );
    }

    #[test]
    fn test_no_reference() {
        let err = run("run(1);", LanguageVariant::Module, 0, 4).unwrap_err();
        assert_eq!(err.message, "no reference at cursor");
    }

    #[test]
    fn test_outermost_is_optional() {
        assert!(outermost_is_optional("a?.b", LanguageVariant::Module).unwrap());
        assert!(!outermost_is_optional("a?.b.c", LanguageVariant::Module).unwrap());
        assert!(!outermost_is_optional("a", LanguageVariant::Script).unwrap());
    }
}
