//! The engine: a configured entry point for running mods.

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::mods::{ErrorCode, Mod, ModContext, ModFailure, ModResult};

/// Runs mods against source snapshots.
///
/// An engine holds only its immutable configuration. Every run parses its own tree and
/// drops it afterwards, so one engine can serve any number of concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Names of every mod, in presentation order. Needs no source or anchor.
    pub fn list_mods(&self) -> Vec<&'static str> {
        Mod::names()
    }

    /// Runs a mod to completion on the calling thread.
    pub fn run(&self, m: Mod, ctx: &ModContext) -> ModResult {
        let result = m.apply(ctx, &self.config);
        match &result {
            Ok(edit) => debug!(mod_name = m.name(), range = %edit.range, "mod produced edit"),
            Err(failure) if failure.code == ErrorCode::Error => {
                warn!(mod_name = m.name(), message = %failure.message, "mod failed")
            }
            Err(failure) => debug!(mod_name = m.name(), code = %failure.code, "mod declined"),
        }
        result
    }

    /// Runs a mod by registry name.
    pub fn run_named(&self, name: &str, ctx: &ModContext) -> ModResult {
        let m: Mod = name.parse()?;
        self.run(m, ctx)
    }

    /// Runs a mod on the blocking thread pool so the caller's task is not held up by
    /// parsing large sources.
    pub async fn run_detached(&self, m: Mod, ctx: ModContext) -> ModResult {
        let engine = self.clone();
        match tokio::task::spawn_blocking(move || engine.run(m, &ctx)).await {
            Ok(result) => result,
            Err(e) => Err(ModFailure::from(EngineError::Worker {
                message: e.to_string(),
            })),
        }
    }
}
