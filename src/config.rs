//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/checktree/checktree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `CHECKTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::Glyphs;

/// Unified configuration for checktree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Hierarchy description file; the built-in sample is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<PathBuf>,
    /// Checkbox glyphs used when rendering
    pub glyphs: Glyphs,
}

/// Raw glyph config for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawGlyphs {
    pub checked: Option<String>,
    pub unchecked: Option<String>,
    pub inconsistent: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub hierarchy: Option<PathBuf>,
    pub glyphs: RawGlyphs,
}

/// Get the XDG config directory for checktree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "checktree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("checktree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Glyphs {
    fn merge(&self, overlay: &RawGlyphs) -> Self {
        Self {
            checked: overlay.checked.clone().unwrap_or_else(|| self.checked.clone()),
            unchecked: overlay
                .unchecked
                .clone()
                .unwrap_or_else(|| self.unchecked.clone()),
            inconsistent: overlay
                .inconsistent
                .clone()
                .unwrap_or_else(|| self.inconsistent.clone()),
        }
    }
}

impl Settings {
    /// Merge overlay config onto self (base). Overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            hierarchy: overlay.hierarchy.clone().or_else(|| self.hierarchy.clone()),
            glyphs: self.glyphs.merge(&overlay.glyphs),
        }
    }

    fn expand_paths(&mut self) {
        if let Some(path) = &self.hierarchy {
            self.hierarchy = Some(PathBuf::from(expand_env_vars(&path.to_string_lossy())));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist when given
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current, Self::environment())?;
        current.expand_paths();
        Ok(current)
    }

    fn environment() -> Environment {
        Environment::with_prefix("CHECKTREE")
            .prefix_separator("_")
            .separator("__")
    }

    /// Apply CHECKTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("hierarchy") {
            settings.hierarchy = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("glyphs.checked") {
            settings.glyphs.checked = val;
        }
        if let Ok(val) = config.get_string("glyphs.unchecked") {
            settings.glyphs.unchecked = val;
        }
        if let Ok(val) = config.get_string("glyphs.inconsistent") {
            settings.glyphs.inconsistent = val;
        }
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# checktree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/checktree/checktree.toml
#   File:   checktree --config <file>
#   Env:    CHECKTREE_* environment variables (e.g. CHECKTREE_GLYPHS__CHECKED)

# Hierarchy description (TOML, [[roots]] tables); built-in sample when unset
# hierarchy = "~/trees/europe.toml"

[glyphs]
# checked = "[x]"
# unchecked = "[ ]"
# inconsistent = "[-]"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> Environment {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::environment().source(Some(map))
    }

    #[test]
    fn given_default_settings_then_bracket_glyphs_and_no_file() {
        let settings = Settings::default();
        assert_eq!(settings.hierarchy, None);
        assert_eq!(settings.glyphs.checked, "[x]");
        assert_eq!(settings.glyphs.unchecked, "[ ]");
        assert_eq!(settings.glyphs.inconsistent, "[-]");
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_kept() {
        let raw: RawSettings = toml::from_str("[glyphs]\nchecked = \"☑\"\n").unwrap();
        let merged = Settings::default().merge_with(&raw);
        assert_eq!(merged.glyphs.checked, "☑");
        assert_eq!(merged.glyphs.unchecked, "[ ]");
        assert_eq!(merged.hierarchy, None);
    }

    #[test]
    fn given_env_vars_when_applying_overrides_then_replace_values() {
        let env = env_from(&[
            ("CHECKTREE_HIERARCHY", "/tmp/tree.toml"),
            ("CHECKTREE_GLYPHS__INCONSISTENT", "[~]"),
        ]);
        let settings = Settings::apply_env_overrides(Settings::default(), env).unwrap();
        assert_eq!(settings.hierarchy, Some(PathBuf::from("/tmp/tree.toml")));
        assert_eq!(settings.glyphs.inconsistent, "[~]");
        assert_eq!(settings.glyphs.checked, "[x]");
    }

    #[test]
    fn given_tilde_in_hierarchy_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            hierarchy: Some(PathBuf::from("~/tree.toml")),
            ..Settings::default()
        };
        settings.expand_paths();
        let expanded = settings.hierarchy.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("tree.toml"));
    }

    #[test]
    fn given_settings_when_to_toml_then_contains_glyph_table() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("[glyphs]"));
        assert!(!toml.contains("hierarchy"));
    }
}
