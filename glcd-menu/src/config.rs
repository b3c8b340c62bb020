//! Controller-side menu settings.
//!
//! Settings can be embedded in firmware as a `const`-like default or loaded
//! from a TOML/JSON file on the host side:
//!
//! ```toml
//! select_fallback = "first"
//! wrap_options = false
//! ```

use std::{fs, path::Path};

use anyhow::{Context, bail};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What an option cursor does when the bound value matches no option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SelectFallback {
    /// Start at the first option.
    #[default]
    First,
    /// Report `NotFound` to the controller.
    Reject,
}

/// Behaviour knobs for the editing helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MenuConfig {
    /// Policy for bound values outside their option set.
    pub select_fallback: SelectFallback,
    /// Whether stepping past the last option returns to the first one.
    pub wrap_options: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            select_fallback: SelectFallback::First,
            wrap_options: true,
        }
    }
}

impl MenuConfig {
    /// Parse settings; `ext` selects the format (`toml` or `json`).
    pub fn from_str_with_ext(content: &str, ext: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = match ext {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => bail!("Unsupported config file extension: {ext:?}"),
        };
        Ok(config)
    }

    /// Load settings from a `.toml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_str_with_ext(&content, ext)?;
        info!("menu config loaded from {}: {config:?}", path.display());
        Ok(config)
    }

    /// JSON schema of the settings file.
    pub fn schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(MenuConfig)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = MenuConfig::default();
        assert_eq!(config.select_fallback, SelectFallback::First);
        assert!(config.wrap_options);
        assert_eq!(MenuConfig::from_str_with_ext("  \n", "toml").unwrap(), config);
    }

    #[test]
    fn test_parse_toml_and_json() {
        let config =
            MenuConfig::from_str_with_ext("select_fallback = \"reject\"\n", "toml").unwrap();
        assert_eq!(config.select_fallback, SelectFallback::Reject);
        assert!(config.wrap_options);

        let config = MenuConfig::from_str_with_ext(r#"{"wrap_options": false}"#, "json").unwrap();
        assert_eq!(config.select_fallback, SelectFallback::First);
        assert!(!config.wrap_options);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(MenuConfig::from_str_with_ext("wrap_options = true", "yaml").is_err());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "wrap_options = false").unwrap();
        writeln!(file, "select_fallback = \"reject\"").unwrap();

        let config = MenuConfig::from_path(file.path()).unwrap();
        assert!(!config.wrap_options);
        assert_eq!(config.select_fallback, SelectFallback::Reject);

        assert!(MenuConfig::from_path(file.path().with_extension("missing")).is_err());
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = MenuConfig::schema();
        assert!(schema["properties"]["wrap_options"].is_object());
        assert!(schema["properties"]["select_fallback"].is_object());
    }
}
