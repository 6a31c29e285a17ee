//! `move-left` / `move-right`: reorder the sibling under the cursor.

use tracing::debug;

use super::{ModEdit, ModFailure, ModResult};
use crate::syntax::{NodeId, Position, Range, SyntaxTree};

/// Which neighbour the item under the cursor trades places with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Swaps the operand, branch or list item at `point` with its neighbour in `direction`.
pub fn move_sibling(tree: &SyntaxTree, point: Position, direction: Direction) -> ModResult {
    let parent = tree
        .list_parent_at(point)
        .ok_or_else(|| ModFailure::no_match("no swappable expression at cursor"))?;
    debug!(kind = tree.kind(parent), %point, ?direction, "resolved list parent");

    match tree.kind(parent) {
        "binary_expression" | "union_type" | "intersection_type" => {
            swap_operands(tree, parent, point, direction)
        }
        "ternary_expression" => swap_branches(tree, parent, point, direction),
        _ => swap_items(tree, parent, point, direction),
    }
}

fn start_byte(tree: &SyntaxTree, id: NodeId) -> usize {
    tree.node(id).bytes.start
}

fn end_byte(tree: &SyntaxTree, id: NodeId) -> usize {
    tree.node(id).bytes.end
}

/// `left op right` becomes `right op left`, keeping the text around the operator.
fn swap_operands(
    tree: &SyntaxTree,
    parent: NodeId,
    point: Position,
    direction: Direction,
) -> ModResult {
    let children = tree.significant_children(parent);
    let &[left, operator, right] = children.as_slice() else {
        return Err(ModFailure::no_match("no swappable operands at cursor"));
    };

    let start = tree.range(left).start;
    let right_text = tree.text(right);
    let before_operator = tree.slice(end_byte(tree, left), start_byte(tree, operator));
    let middle = tree.slice(end_byte(tree, left), start_byte(tree, right));
    let on = |id: NodeId| tree.range(id).contains(point);

    let cursor = if on(operator) {
        let moved_to = start.advance(&format!("{right_text}{before_operator}"));
        point.rebase(tree.range(operator).start, moved_to)
    } else if on(left) {
        match direction {
            Direction::Left => return Err(ModFailure::no_match("no previous operand")),
            Direction::Right => {
                let moved_to = start.advance(&format!("{right_text}{middle}"));
                point.rebase(start, moved_to)
            }
        }
    } else if on(right) {
        match direction {
            Direction::Left => point.rebase(tree.range(right).start, start),
            Direction::Right => return Err(ModFailure::no_match("no next operand")),
        }
    } else {
        return Err(ModFailure::no_match("no operand at cursor"));
    };

    let range = Range::new(start, tree.range(right).end);
    let original = tree.slice(start_byte(tree, left), end_byte(tree, right));
    let replacement = format!("{right_text}{middle}{}", tree.text(left));
    Ok(ModEdit::new(original, range, replacement).with_cursor(cursor))
}

/// `c ? x : y` becomes `c ? y : x`.
fn swap_branches(
    tree: &SyntaxTree,
    parent: NodeId,
    point: Position,
    direction: Direction,
) -> ModResult {
    let children = tree.significant_children(parent);
    let &[condition, question, consequence, colon, alternative] = children.as_slice() else {
        return Err(ModFailure::no_match("no swappable branches at cursor"));
    };

    let start = tree.range(parent).start;
    let head = tree.slice(start_byte(tree, parent), start_byte(tree, consequence));
    let consequence_text = tree.text(consequence);
    let alternative_text = tree.text(alternative);
    let before_colon = tree.slice(end_byte(tree, consequence), start_byte(tree, colon));
    let between = tree.slice(end_byte(tree, consequence), start_byte(tree, alternative));
    let on = |id: NodeId| tree.range(id).contains(point);

    let cursor = if on(condition) || on(question) {
        return Err(ModFailure::no_match("cursor on condition"));
    } else if on(colon) {
        let moved_to = start.advance(&format!("{head}{alternative_text}{before_colon}"));
        point.rebase(tree.range(colon).start, moved_to)
    } else if on(consequence) {
        match direction {
            Direction::Left => return Err(ModFailure::no_match("no previous branch")),
            Direction::Right => {
                let moved_to = start.advance(&format!("{head}{alternative_text}{between}"));
                point.rebase(tree.range(consequence).start, moved_to)
            }
        }
    } else if on(alternative) {
        match direction {
            Direction::Left => {
                let moved_to = start.advance(head);
                point.rebase(tree.range(alternative).start, moved_to)
            }
            Direction::Right => return Err(ModFailure::no_match("no next branch")),
        }
    } else {
        return Err(ModFailure::no_match("no branch at cursor"));
    };

    let replacement = format!("{head}{alternative_text}{between}{consequence_text}");
    Ok(ModEdit::new(tree.text(parent), tree.range(parent), replacement).with_cursor(cursor))
}

/// Swaps two adjacent items of a comma list; only the pair is rewritten.
fn swap_items(
    tree: &SyntaxTree,
    parent: NodeId,
    point: Position,
    direction: Direction,
) -> ModResult {
    let items = tree.items(parent);
    let index = items
        .iter()
        .position(|&item| tree.range(item).contains(point))
        .ok_or_else(|| ModFailure::no_match("no item at cursor"))?;

    let (first, second) = match direction {
        Direction::Left if index == 0 => {
            return Err(ModFailure::no_match("no previous item"));
        }
        Direction::Left => (items[index - 1], items[index]),
        Direction::Right if index + 1 == items.len() => {
            return Err(ModFailure::no_match("no next item"));
        }
        Direction::Right => (items[index], items[index + 1]),
    };

    let start = tree.range(first).start;
    let first_text = tree.text(first);
    let second_text = tree.text(second);
    let pivot = items[index];
    let moved_to = match direction {
        Direction::Left => start,
        Direction::Right => start.advance(&format!("{second_text}, ")),
    };
    let cursor = point.rebase(tree.range(pivot).start, moved_to);

    let range = Range::new(start, tree.range(second).end);
    let original = tree.slice(start_byte(tree, first), end_byte(tree, second));
    let replacement = format!("{second_text}, {first_text}");
    Ok(ModEdit::new(original, range, replacement).with_cursor(cursor))
}
