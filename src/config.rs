//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; the user file only needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Users"           # Page title prefix and listing heading
//! footer = ""               # Footer text on every page (empty = none)
//!
//! [data]
//! path = ""                 # .json or .toml data file (empty = built-in users)
//! strict = false            # Fail on rows missing required fields
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! link = "#333333"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! text = "#eeeeee"
//! link = "#cccccc"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide text.
    pub site: SiteSection,
    /// Where user rows come from and how they are hydrated.
    pub data: DataConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        if let Some(path) = self.data.path() {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !matches!(ext.to_ascii_lowercase().as_str(), "json" | "toml") {
                return Err(ConfigError::Validation(format!(
                    "data.path must end in .json or .toml, got '{}'",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub title: String,
    pub footer: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Users".to_string(),
            footer: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Data file path. Relative paths resolve against the config directory.
    pub path: String,
    /// Reject rows with missing required fields instead of defaulting them.
    pub strict: bool,
}

impl DataConfig {
    /// The configured data file, if any.
    pub fn path(&self) -> Option<&Path> {
        (!self.path.trim().is_empty()).then(|| Path::new(&self.path))
    }

    /// The data file resolved against `root`.
    pub fn resolved_path(&self, root: &Path) -> Option<PathBuf> {
        self.path().map(|p| root.join(p))
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    pub link: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            link: "#333333".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#eeeeee".to_string(),
            link: "#cccccc".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Loading
// =============================================================================

/// File name looked up in the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// [`SiteConfig::default`] as a TOML table, the base layer user files merge onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Lay `overlay` over `base`.
///
/// Sections merge key by key, so a file that only sets `[data] path` keeps the
/// default `strict` flag and every color. Any other value in `overlay`
/// replaces the base value outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut section), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                let merged = match section.remove(&key) {
                    Some(current) => merge_toml(current, value),
                    None => value,
                };
                section.insert(key, merged);
            }
            toml::Value::Table(section)
        }
        (_, overlay) => overlay,
    }
}

/// Parse `dir/config.toml` without interpreting it.
///
/// A missing file is `Ok(None)`: the site then builds from stock defaults and
/// the built-in users.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let content = match fs::read_to_string(dir.join(CONFIG_FILE)) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&content)?))
}

/// Turn the layered TOML into a checked [`SiteConfig`].
///
/// Unknown keys surface here as [`ConfigError::Toml`] and bad values (empty
/// title, unsupported data file) as [`ConfigError::Validation`].
pub fn resolve_config(
    defaults: toml::Value,
    user: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let layered = match user {
        Some(user) => merge_toml(defaults, user),
        None => defaults,
    };
    let config: SiteConfig = layered.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Site config for the directory `dir`.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let user = load_raw_config(dir)?;
    if user.is_none() {
        tracing::debug!(dir = %dir.display(), "no config.toml, using stock defaults");
    }
    resolve_config(stock_defaults_value()?, user)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# userpages configuration
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Heading of the listing page and suffix of every page title.
title = "Users"

# Text shown at the bottom of every page. Empty = no footer.
footer = ""

# ---------------------------------------------------------------------------
# Data
# ---------------------------------------------------------------------------
[data]
# Data file with one row per user: a .json array of objects, or a .toml file
# with [[rows]] tables. Relative to the config directory.
# Empty = the built-in user list.
path = ""

# When true, a row without a username fails the build.
# When false, it becomes a user with an empty username.
strict = false

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
link = "#333333"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
text = "#eeeeee"
link = "#cccccc"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-link: {light_link};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-link: {dark_link};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_link = colors.light.link,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_link = colors.dark.link,
    )
}
