//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EngineError, Result};
use crate::syntax::DEFAULT_LINE_WEIGHT;

/// Tunables for node selection, diagnostics and the worker loop.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # Example YAML
///
/// ```yaml
/// line_weight: 1000
/// debug_ancestor_levels: 3
/// debug_render_depth: 3
/// request_timeout_ms: 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Weight of one line when ranking overlapping candidates by size.
    pub line_weight: usize,

    /// How many ancestors above the anchor the debug mod climbs.
    pub debug_ancestor_levels: usize,

    /// How many levels below that ancestor the debug mod renders.
    pub debug_render_depth: usize,

    /// Longest leaf text shown in a debug render.
    pub debug_text_width: usize,

    /// Deadline for an in-flight `serve` request, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            line_weight: DEFAULT_LINE_WEIGHT,
            debug_ancestor_levels: 3,
            debug_render_depth: 3,
            debug_text_width: 40,
            request_timeout_ms: 30_000,
        }
    }
}

impl EngineConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, ms: u64) -> Self {
        self.request_timeout_ms = ms;
        self
    }

    /// Parse config from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| {
            EngineError::InvalidConfig(format!("Failed to parse YAML config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file, as JSON for a `.json` extension and as YAML otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(path)
        } else {
            Self::from_yaml(path)
        }
    }

    /// Load config from a YAML file.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EngineError::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file: {}", e),
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load config from a JSON file.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EngineError::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            EngineError::InvalidConfig(format!("Failed to parse JSON config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.line_weight == 0 {
            return Err(EngineError::InvalidConfig(
                "line_weight must be positive".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "request_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.line_weight, 1000);
        assert_eq!(config.debug_ancestor_levels, 3);
        assert_eq!(config.debug_render_depth, 3);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EngineConfig::from_yaml_str("request_timeout_ms: 500\n").unwrap();
        assert_eq!(config.request_timeout_ms, 500);
        assert_eq!(config.line_weight, 1000);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = EngineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_rejects_zero_weight() {
        let err = EngineConfig::from_yaml_str("line_weight: 0").unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "debug_render_depth: 5").unwrap();
        let config = EngineConfig::from_yaml(file.path()).unwrap();
        assert_eq!(config.debug_render_depth, 5);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"{{"line_weight": 200, "debug_text_width": 12}}"#).unwrap();
        let config = EngineConfig::from_json(file.path()).unwrap();
        assert_eq!(config.line_weight, 200);
        assert_eq!(config.debug_text_width, 12);
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"{{"request_timeout_ms": 0}}"#).unwrap();
        let err = EngineConfig::from_json(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        let mut json = NamedTempFile::with_suffix(".JSON").unwrap();
        write!(json, r#"{{"debug_render_depth": 7}}"#).unwrap();
        assert_eq!(EngineConfig::load(json.path()).unwrap().debug_render_depth, 7);

        let mut yaml = NamedTempFile::with_suffix(".yml").unwrap();
        writeln!(yaml, "debug_render_depth: 2").unwrap();
        assert_eq!(EngineConfig::load(yaml.path()).unwrap().debug_render_depth, 2);

        let err = EngineConfig::load("/nonexistent/cursor-mods.json").unwrap_err();
        assert!(matches!(err, EngineError::ConfigNotFound(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_yaml("/nonexistent/cursor-mods.yaml").unwrap_err();
        assert!(matches!(err, EngineError::ConfigNotFound(_)));
    }
}
