//! JavaScript language support. The grammar includes JSX.

use super::Language;
use tree_sitter::Language as TsLanguage;

/// JavaScript programming language.
pub struct JavaScript;

impl Language for JavaScript {
    fn name(&self) -> &'static str {
        "javascript"
    }

    fn extensions(&self) -> &[&'static str] {
        &["js", "cjs", "mjs", "jsx"]
    }

    fn grammar(&self) -> TsLanguage {
        tree_sitter_javascript::LANGUAGE.into()
    }
}
