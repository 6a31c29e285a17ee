//! # Cursor Mods
//!
//! Cursor-anchored syntax-tree transformations for JavaScript and TypeScript.
//!
//! Given a source snapshot, its language variant and an anchor (a cursor position or a node
//! captured earlier), a mod resolves the anchor to a syntax node and returns one textual
//! edit: the replacement text, the exact range it replaces and where the cursor should go.
//!
//! ## Quick Start
//!
//! ```rust
//! use cursor_mods::prelude::*;
//!
//! let engine = Engine::default();
//! let ctx = ModContext::new("f(a, b, c)", LanguageVariant::Script).with_point(0, 5);
//!
//! let edit = engine.run(Mod::MoveLeft, &ctx).unwrap();
//! assert_eq!(edit.replacement, "b, a");
//! assert_eq!(edit.apply_to(&ctx.source).unwrap(), "f(b, a, c)");
//! ```
//!
//! ## Anchoring on a captured node
//!
//! Hosts often capture the node under the cursor, show a menu of mods and only then run
//! the chosen one. A [`NodeDescriptor`](syntax::NodeDescriptor) carries that node by value
//! into the later invocation, where it is matched against a fresh parse:
//!
//! ```rust
//! use cursor_mods::prelude::*;
//!
//! let source = "const a = <div><b>bold</b></div>;";
//! let tree = SyntaxTree::parse(source, LanguageVariant::ModuleMarkup)?;
//! let node = tree.deepest_at(Position::new(0, 19)).unwrap();
//! let descriptor = NodeDescriptor::capture(&tree, node, Some(Position::new(0, 19)));
//!
//! let ctx = ModContext::new(source, LanguageVariant::ModuleMarkup).with_descriptor(descriptor);
//! let edit = Engine::default().run(Mod::DeleteClosestTag, &ctx).unwrap();
//! assert_eq!(edit.clipboard.as_deref(), Some("<b>bold</b>"));
//! # Ok::<(), cursor_mods::error::EngineError>(())
//! ```
//!
//! ## Supported Languages
//!
//! - `script` - JavaScript (`.js`, `.cjs`, `.mjs`)
//! - `module` - TypeScript (`.ts`, `.mts`, `.cts`)
//! - `script+markup` - JavaScript with JSX (`.jsx`)
//! - `module+markup` - TypeScript with JSX (`.tsx`)

pub mod config;
pub mod correlator;
pub mod diff;
pub mod engine;
pub mod error;
pub mod lang;
pub mod mods;
pub mod protocol;
pub mod serve;
pub mod syntax;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::correlator::{Correlator, RequestId};
    pub use crate::engine::Engine;
    pub use crate::error::{EngineError, Result};
    pub use crate::lang::{JavaScript, Language, LanguageVariant, Tsx, TypeScript};
    pub use crate::mods::{
        Anchor, Direction, ErrorCode, Mod, ModContext, ModEdit, ModFailure, ModResult,
    };
    pub use crate::protocol::{Call, EditPayload, ModsPayload, Outcome, Request, Response};
    pub use crate::syntax::{NodeDescriptor, NodeId, Position, Range, SyntaxTree};
}

pub use prelude::*;
