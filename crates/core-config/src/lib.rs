//! Configuration loading and parsing.
//!
//! Parses `trailmark.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [trailing_newline]
//! glyph = "⏎"
//! show_line_number = true
//! global = false
//!
//! [view]
//! line_numbers = true
//! ```
//!
//! Every field is optional. Unknown fields are ignored (TOML deserialization
//! tolerance) and a file that fails to parse falls back to defaults. The raw
//! parsed glyph is sanitized in `Config::effective_glyph`: a glyph that spans
//! lines would break the single-row margin, so it is replaced by the default.
//! An empty glyph is kept (only the line number suffix is painted).

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// Default marker: U+23CE RETURN SYMBOL.
pub const DEFAULT_GLYPH: &str = "\u{23CE}";

#[derive(Debug, Deserialize, Clone)]
pub struct TrailingNewlineConfig {
    #[serde(default = "TrailingNewlineConfig::default_glyph")]
    pub glyph: String,
    #[serde(default = "TrailingNewlineConfig::default_show_line_number")]
    pub show_line_number: bool,
    /// Start with the global auto-enable policy switched on.
    #[serde(default)]
    pub global: bool,
}

impl Default for TrailingNewlineConfig {
    fn default() -> Self {
        Self {
            glyph: Self::default_glyph(),
            show_line_number: Self::default_show_line_number(),
            global: false,
        }
    }
}

impl TrailingNewlineConfig {
    fn default_glyph() -> String {
        DEFAULT_GLYPH.to_string()
    }
    const fn default_show_line_number() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    /// Host line-number display for newly opened documents.
    #[serde(default = "ViewConfig::default_line_numbers")]
    pub line_numbers: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            line_numbers: Self::default_line_numbers(),
        }
    }
}

impl ViewConfig {
    const fn default_line_numbers() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub trailing_newline: TrailingNewlineConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Values supplied on the command line; `Some` wins over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub glyph: Option<String>,
    pub show_line_number: Option<bool>,
    pub global: Option<bool>,
    pub line_numbers: Option<bool>,
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // Prefer a local working directory `trailmark.toml` before the platform config dir.
    let local = PathBuf::from("trailmark.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("trailmark").join("trailmark.toml");
    }
    PathBuf::from("trailmark.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => {
                info!(target: "config", path = %path.display(), "config_loaded");
                Ok(Config {
                    raw: Some(content),
                    file,
                })
            }
            Err(e) => {
                warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}

impl Config {
    /// Apply command line overrides on top of file values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        let tn = &mut self.file.trailing_newline;
        if let Some(glyph) = overrides.glyph.as_ref() {
            tn.glyph = glyph.clone();
        }
        if let Some(show) = overrides.show_line_number {
            tn.show_line_number = show;
        }
        if let Some(global) = overrides.global {
            tn.global = global;
        }
        if let Some(numbers) = overrides.line_numbers {
            self.file.view.line_numbers = numbers;
        }
    }

    /// Marker glyph safe to paint in a single margin row.
    pub fn effective_glyph(&self) -> String {
        let raw = self.file.trailing_newline.glyph.as_str();
        if raw.contains(['\n', '\r']) {
            info!(
                target: "config",
                raw,
                fallback = DEFAULT_GLYPH,
                "trailing_newline_glyph_replaced"
            );
            return DEFAULT_GLYPH.to_string();
        }
        raw.to_string()
    }

    pub fn show_line_number(&self) -> bool {
        self.file.trailing_newline.show_line_number
    }

    pub fn global(&self) -> bool {
        self.file.trailing_newline.global
    }

    pub fn line_numbers(&self) -> bool {
        self.file.view.line_numbers
    }
}
