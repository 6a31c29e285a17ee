//! Diff generation for previewing an edit.

use similar::{ChangeTag, TextDiff};

use crate::mods::ModEdit;

/// Generates a unified diff between two strings.
pub fn unified_diff(original: &str, modified: &str, label: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = format!("--- a/{label}\n+++ b/{label}\n");

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

/// Diff of `source` before and after `edit`, or `None` if the edit does not fit `source`.
pub fn edit_diff(source: &str, edit: &ModEdit, label: &str) -> Option<String> {
    let modified = edit.apply_to(source)?;
    Some(unified_diff(source, &modified, label))
}

/// Line counts of a diff.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffSummary {
    /// Creates a summary from original and modified content.
    pub fn from_diff(original: &str, modified: &str) -> Self {
        let diff = TextDiff::from_lines(original, modified);
        let mut summary = Self::default();

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => summary.insertions += 1,
                ChangeTag::Delete => summary.deletions += 1,
                ChangeTag::Equal => {}
            }
        }

        summary
    }
}

impl std::fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} insertions(+), {} deletions(-)",
            self.insertions, self.deletions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Position, Range};

    #[test]
    fn test_edit_diff() {
        let source = "function f(){}\nconst x=1;\n";
        let edit = ModEdit::new(
            "function f(){}",
            Range::new(Position::new(0, 0), Position::new(0, 14)),
            "",
        );
        let diff = edit_diff(source, &edit, "input.js").unwrap();
        assert!(diff.starts_with("--- a/input.js\n+++ b/input.js\n"));
        assert!(diff.contains("-function f(){}\n"));
        assert!(diff.contains(" const x=1;\n"));
    }

    #[test]
    fn test_summary() {
        let summary = DiffSummary::from_diff("a\nb\n", "a\nc\nd\n");
        assert_eq!(summary.insertions, 2);
        assert_eq!(summary.deletions, 1);
        assert_eq!(summary.to_string(), "2 insertions(+), 1 deletions(-)");
    }
}
