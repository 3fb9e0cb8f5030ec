//! tablesync configuration system
//!
//! This crate provides centralized configuration for the table property
//! converters, loading settings from `tablesync.toml` with environment
//! variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default file name looked up by [`TableSyncConfig::load_or_default`].
pub const DEFAULT_CONFIG_FILE: &str = "tablesync.toml";

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TableSyncConfig {
    /// Table-level property defaults
    pub table: TablePropertiesConfig,
    /// Table cell property defaults
    pub table_cell: TableCellPropertiesConfig,
    /// Style processor rule families
    pub style_rules: StyleRulesConfig,
    /// View tree settings
    pub view: ViewConfig,
    /// Comma separated diagnostics channels (e.g. "upcast,downcast")
    pub diagnostics: Option<String>,
}

/// `[table]` section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TablePropertiesConfig {
    pub default_properties: DefaultProperties,
}

/// `[table_cell]` section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TableCellPropertiesConfig {
    pub default_properties: DefaultProperties,
}

/// Property defaults as written by the user. Unset entries fall back to the
/// values documented on [`DefaultProperties::normalized`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DefaultProperties {
    pub border_style: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<String>,
    pub background_color: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub alignment: Option<String>,
    pub padding: Option<String>,
    pub vertical_alignment: Option<String>,
}

/// Which optional properties take part in normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    pub include_alignment: bool,
    pub include_padding: bool,
    pub include_vertical_alignment: bool,
}

/// Fully resolved defaults. Every property has a concrete value; the empty
/// string means "no default".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDefaults {
    pub border_style: String,
    pub border_color: String,
    pub border_width: String,
    pub background_color: String,
    pub width: String,
    pub height: String,
    pub alignment: String,
    pub padding: String,
    pub vertical_alignment: String,
}

impl DefaultProperties {
    /// Resolves unset entries: `border_style` becomes `none`, alignment
    /// becomes `center` and vertical alignment `middle` (when included),
    /// everything else the empty string.
    pub fn normalized(&self, options: NormalizeOptions) -> NormalizedDefaults {
        let pick = |value: &Option<String>, fallback: &str| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        let optional = |included: bool, value: &Option<String>, fallback: &str| {
            if included {
                pick(value, fallback)
            } else {
                String::new()
            }
        };

        NormalizedDefaults {
            border_style: pick(&self.border_style, "none"),
            border_color: pick(&self.border_color, ""),
            border_width: pick(&self.border_width, ""),
            background_color: pick(&self.background_color, ""),
            width: pick(&self.width, ""),
            height: pick(&self.height, ""),
            alignment: optional(options.include_alignment, &self.alignment, "center"),
            padding: optional(options.include_padding, &self.padding, ""),
            vertical_alignment: optional(
                options.include_vertical_alignment,
                &self.vertical_alignment,
                "middle",
            ),
        }
    }
}

/// Style processor families that are registered once per editor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StyleRulesConfig {
    /// Expand `border*` shorthands into per-side longhands
    pub border: bool,
    /// Expand `background` into `background-color`
    pub background: bool,
    /// Expand `padding` into per-side longhands
    pub padding: bool,
}

/// View tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Element name of the container wrapping a rendered table
    pub wrapper_element: String,
}

impl Default for StyleRulesConfig {
    fn default() -> Self {
        Self {
            border: true,
            background: true,
            padding: true,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            wrapper_element: "figure".to_string(),
        }
    }
}

impl TableSyncConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from `tablesync.toml` in the current directory,
    /// or return the default configuration if the file is missing or invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(name) = std::env::var("TABLESYNC_WRAPPER_ELEMENT") {
            if !name.trim().is_empty() {
                self.view.wrapper_element = name.trim().to_string();
            }
        }
        if let Ok(val) = std::env::var("TABLESYNC_BORDER_RULES") {
            self.style_rules.border = parse_flag(&val);
        }
        if let Ok(val) = std::env::var("TABLESYNC_BACKGROUND_RULES") {
            self.style_rules.background = parse_flag(&val);
        }
        if let Ok(val) = std::env::var("TABLESYNC_PADDING_RULES") {
            self.style_rules.padding = parse_flag(&val);
        }
        if let Ok(diagnostics) = std::env::var("TABLESYNC_DIAGNOSTICS") {
            self.diagnostics = Some(diagnostics);
        }

        let table = &mut self.table.default_properties;
        if let Ok(val) = std::env::var("TABLESYNC_TABLE_BORDER_STYLE") {
            table.border_style = Some(val);
        }
        if let Ok(val) = std::env::var("TABLESYNC_TABLE_BORDER_COLOR") {
            table.border_color = Some(val);
        }
        if let Ok(val) = std::env::var("TABLESYNC_TABLE_BORDER_WIDTH") {
            table.border_width = Some(val);
        }
        if let Ok(val) = std::env::var("TABLESYNC_TABLE_ALIGNMENT") {
            table.alignment = Some(val);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from tablesync.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Normalized table defaults (alignment included).
    pub fn table_defaults(&self) -> NormalizedDefaults {
        self.table.default_properties.normalized(NormalizeOptions {
            include_alignment: true,
            ..Default::default()
        })
    }

    /// Normalized table cell defaults (padding and vertical alignment included).
    pub fn table_cell_defaults(&self) -> NormalizedDefaults {
        self.table_cell
            .default_properties
            .normalized(NormalizeOptions {
                include_padding: true,
                include_vertical_alignment: true,
                ..Default::default()
            })
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}
