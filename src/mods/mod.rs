//! The mod registry and the types every mod shares.
//!
//! A mod is a pure function of a source snapshot, its language variant and an anchor. It
//! either produces a single [`ModEdit`] or a [`ModFailure`]; it never returns a partial
//! edit. The registry is the closed [`Mod`] enum, so adding a mod means adding a variant
//! and the compiler points at every dispatch site.
//!
//! ## Available Mods
//!
//! - `move-left` / `move-right` - swap the item under the cursor with its neighbour
//! - `point-free-to-anon` - wrap a bare function reference in an arrow function
//! - `delete-function` - delete the innermost function declaration
//! - `delete-closest-tag` - delete the innermost JSX element
//! - `debug-node-under-cursor` - dump the tree around the anchor

mod debug;
mod delete;
mod point_free;
mod swap;

pub use swap::Direction;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::lang::LanguageVariant;
use crate::syntax::{NodeDescriptor, NodeId, Position, Range, SyntaxTree, offset_of};

/// Where a mod should act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Anchor {
    /// A node captured earlier, possibly from a different parse.
    Node(NodeDescriptor),
    /// A cursor position.
    Point(Position),
}

impl Anchor {
    /// The cursor position this anchor stands for.
    ///
    /// A descriptor without a recorded cursor stands at the start of its node.
    pub fn point(&self) -> Position {
        match self {
            Anchor::Point(point) => *point,
            Anchor::Node(descriptor) => descriptor.cursor.unwrap_or(descriptor.range.start),
        }
    }

    /// The node of `tree` this anchor designates.
    pub fn resolve(&self, tree: &SyntaxTree) -> Option<NodeId> {
        match self {
            Anchor::Point(point) => tree.deepest_at(*point),
            Anchor::Node(descriptor) => tree.correlate(descriptor),
        }
    }
}

impl From<Position> for Anchor {
    fn from(point: Position) -> Self {
        Anchor::Point(point)
    }
}

impl From<NodeDescriptor> for Anchor {
    fn from(descriptor: NodeDescriptor) -> Self {
        Anchor::Node(descriptor)
    }
}

/// Inputs of a single mod invocation.
#[derive(Debug, Clone)]
pub struct ModContext {
    /// The source snapshot to transform.
    pub source: String,
    /// Grammar flavour of the source.
    pub variant: LanguageVariant,
    /// Where to act.
    pub anchor: Anchor,
}

impl ModContext {
    /// Create a context anchored at the start of the source.
    pub fn new(source: impl Into<String>, variant: LanguageVariant) -> Self {
        Self {
            source: source.into(),
            variant,
            anchor: Anchor::Point(Position::default()),
        }
    }

    /// Anchor at a cursor position.
    pub fn with_point(mut self, line: usize, column: usize) -> Self {
        self.anchor = Anchor::Point(Position::new(line, column));
        self
    }

    /// Anchor at a previously captured node.
    pub fn with_descriptor(mut self, descriptor: NodeDescriptor) -> Self {
        self.anchor = Anchor::Node(descriptor);
        self
    }

    /// Set the anchor.
    pub fn with_anchor(mut self, anchor: impl Into<Anchor>) -> Self {
        self.anchor = anchor.into();
        self
    }
}

/// Classification of a failed mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Nothing at the anchor satisfies the mod's selection policy.
    NoMatch,
    /// Diagnostic output of `debug-node-under-cursor`.
    Debug,
    /// Anything else; indicates a defect.
    Error,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NoMatch => "NO_MATCH",
            ErrorCode::Debug => "DEBUG",
            ErrorCode::Error => "ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mod that declined to produce an edit.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ModFailure {
    pub code: ErrorCode,
    pub message: String,
}

impl ModFailure {
    pub fn no_match(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::NoMatch,
            message: message.into(),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Debug,
            message: message.into(),
        }
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Error,
            message: message.into(),
        }
    }
}

impl From<EngineError> for ModFailure {
    fn from(err: EngineError) -> Self {
        error!(error = %err, "mod failed unexpectedly");
        ModFailure::unclassified(err.to_string())
    }
}

/// A single replacement produced by a mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModEdit {
    /// Text that replaces `range`.
    pub replacement: String,
    /// The replaced span of the original source.
    pub range: Range,
    /// The original text of `range`.
    pub original: String,
    /// Where the cursor should go once the edit is applied.
    pub cursor: Option<Position>,
    /// Text the host should place on the clipboard.
    pub clipboard: Option<String>,
}

impl ModEdit {
    /// Create an edit replacing `original` at `range` with `replacement`.
    pub fn new(original: impl Into<String>, range: Range, replacement: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            range,
            original: original.into(),
            cursor: None,
            clipboard: None,
        }
    }

    pub fn with_cursor(mut self, cursor: Position) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn with_clipboard(mut self, text: impl Into<String>) -> Self {
        self.clipboard = Some(text.into());
        self
    }

    /// Splices this edit into `source`.
    ///
    /// Returns `None` when the range does not fit the source.
    pub fn apply_to(&self, source: &str) -> Option<String> {
        let start = offset_of(source, self.range.start)?;
        let end = offset_of(source, self.range.end)?;
        if start > end {
            return None;
        }
        let mut result = String::with_capacity(source.len() + self.replacement.len());
        result.push_str(source.get(..start)?);
        result.push_str(&self.replacement);
        result.push_str(source.get(end..)?);
        Some(result)
    }
}

/// Outcome of running a mod.
pub type ModResult = std::result::Result<ModEdit, ModFailure>;

/// Every mod the engine offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mod {
    MoveLeft,
    MoveRight,
    PointFreeToAnon,
    DeleteFunction,
    DeleteClosestTag,
    DebugNodeUnderCursor,
}

impl Mod {
    /// The registry, in presentation order.
    pub const ALL: [Mod; 6] = [
        Mod::MoveLeft,
        Mod::MoveRight,
        Mod::PointFreeToAnon,
        Mod::DeleteFunction,
        Mod::DeleteClosestTag,
        Mod::DebugNodeUnderCursor,
    ];

    /// Returns the registry name of this mod.
    pub fn name(self) -> &'static str {
        match self {
            Mod::MoveLeft => "move-left",
            Mod::MoveRight => "move-right",
            Mod::PointFreeToAnon => "point-free-to-anon",
            Mod::DeleteFunction => "delete-function",
            Mod::DeleteClosestTag => "delete-closest-tag",
            Mod::DebugNodeUnderCursor => "debug-node-under-cursor",
        }
    }

    /// Names of every registered mod.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.name()).collect()
    }

    /// Parses `ctx.source` and runs this mod against it.
    pub fn apply(self, ctx: &ModContext, config: &EngineConfig) -> ModResult {
        let tree = SyntaxTree::parse(&ctx.source, ctx.variant)?;
        debug!(
            mod_name = self.name(),
            variant = %ctx.variant,
            anchor = %ctx.anchor.point(),
            "running mod"
        );
        self.apply_to_tree(&tree, &ctx.anchor, config)
    }

    /// Runs this mod against an already parsed tree.
    pub fn apply_to_tree(self, tree: &SyntaxTree, anchor: &Anchor, config: &EngineConfig) -> ModResult {
        match self {
            Mod::MoveLeft => swap::move_sibling(tree, anchor.point(), Direction::Left),
            Mod::MoveRight => swap::move_sibling(tree, anchor.point(), Direction::Right),
            Mod::PointFreeToAnon => {
                point_free::wrap_reference(tree, anchor.point(), config.line_weight)
            }
            Mod::DeleteFunction => delete::delete_function(tree, anchor, config.line_weight),
            Mod::DeleteClosestTag => delete::delete_closest_tag(tree, anchor),
            Mod::DebugNodeUnderCursor => debug::describe_node(tree, anchor, config),
        }
    }
}

impl fmt::Display for Mod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mod {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| EngineError::UnknownMod(s.to_string()))
    }
}
