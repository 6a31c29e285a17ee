//! Parser adapter for the ECMAScript-family grammars.

mod javascript;
mod typescript;

pub use javascript::JavaScript;
pub use typescript::{Tsx, TypeScript};

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tree_sitter::{Language as TsLanguage, Parser, Tree};

/// A tree-sitter grammar the engine can parse with.
pub trait Language: Send + Sync {
    /// Returns the name of the grammar.
    fn name(&self) -> &'static str;

    /// Returns the file extensions associated with this grammar.
    fn extensions(&self) -> &[&'static str];

    /// Returns the tree-sitter language grammar.
    fn grammar(&self) -> TsLanguage;

    /// Parses source code into a tree-sitter tree.
    ///
    /// Tree-sitter recovers from syntax errors, so malformed input still yields a tree
    /// containing `ERROR` nodes rather than failing.
    fn parse(&self, source: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar())
            .map_err(|e| EngineError::Parse {
                language: self.name().to_string(),
                message: format!("Failed to set language: {e}"),
            })?;

        parser.parse(source, None).ok_or_else(|| EngineError::Parse {
            language: self.name().to_string(),
            message: "Failed to parse source".to_string(),
        })
    }

    /// Checks if this grammar handles the given file extension.
    fn matches_extension(&self, ext: &str) -> bool {
        self.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// The four source flavours a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LanguageVariant {
    #[serde(rename = "script", alias = "javascript")]
    Script,
    #[default]
    #[serde(rename = "module", alias = "typescript")]
    Module,
    #[serde(rename = "script+markup", alias = "javascriptreact")]
    ScriptMarkup,
    #[serde(rename = "module+markup", alias = "typescriptreact")]
    ModuleMarkup,
}

impl LanguageVariant {
    /// All variants, in declaration order.
    pub const ALL: [LanguageVariant; 4] = [
        LanguageVariant::Script,
        LanguageVariant::Module,
        LanguageVariant::ScriptMarkup,
        LanguageVariant::ModuleMarkup,
    ];

    /// The wire name of this variant.
    pub fn name(self) -> &'static str {
        match self {
            LanguageVariant::Script => "script",
            LanguageVariant::Module => "module",
            LanguageVariant::ScriptMarkup => "script+markup",
            LanguageVariant::ModuleMarkup => "module+markup",
        }
    }

    /// The grammar used to parse this variant.
    ///
    /// The JavaScript grammar already understands JSX, so both script variants share it.
    pub fn language(self) -> &'static dyn Language {
        match self {
            LanguageVariant::Script | LanguageVariant::ScriptMarkup => &JavaScript,
            LanguageVariant::Module => &TypeScript,
            LanguageVariant::ModuleMarkup => &Tsx,
        }
    }

    /// Parses `source` with this variant's grammar.
    pub fn parse(self, source: &str) -> Result<Tree> {
        self.language().parse(source)
    }

    /// Detects the variant for a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jsx" => Some(LanguageVariant::ScriptMarkup),
            "tsx" => Some(LanguageVariant::ModuleMarkup),
            _ if JavaScript.matches_extension(ext) => Some(LanguageVariant::Script),
            _ if TypeScript.matches_extension(ext) => Some(LanguageVariant::Module),
            _ => None,
        }
    }

    /// Detects the variant for a file path.
    pub fn detect(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for LanguageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LanguageVariant {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "script" | "javascript" => Ok(LanguageVariant::Script),
            "module" | "typescript" => Ok(LanguageVariant::Module),
            "script+markup" | "javascriptreact" => Ok(LanguageVariant::ScriptMarkup),
            "module+markup" | "typescriptreact" => Ok(LanguageVariant::ModuleMarkup),
            other => Err(EngineError::UnsupportedLanguage(other.to_string())),
        }
    }
}
