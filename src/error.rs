//! Error types for the mod engine.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the engine itself, as opposed to a mod declining to act.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tree-sitter parse error for {language}: {message}")]
    Parse { language: String, message: String },

    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Unknown mod: {0}")]
    UnknownMod(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Worker task failed: {message}")]
    Worker { message: String },
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
