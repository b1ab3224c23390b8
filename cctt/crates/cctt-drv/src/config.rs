//! Configuration for the cctt driver.
//!
//! A small TOML file controls defaults the flags can override. It is
//! looked up from an explicit `--config` path, then `./cctt.toml`, then
//! the user configuration directory.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::error::{CcttError, Result};
use crate::style::Styles;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "cctt.toml";

/// When to emit ANSI color codes.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color when the diagnostic stream is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

/// Driver configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Default verbosity; the `--verbose` flag overrides this.
    #[serde(default)]
    pub verbose: bool,

    /// Output-related settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output-related settings.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// When to color diagnostics.
    #[serde(default)]
    pub color: ColorChoice,
}

impl Config {
    /// Load from the default locations, falling back to defaults when
    /// no file exists.
    pub fn load() -> Result<Self> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self::load_from_path(&local);
        }

        if let Some(dir) = config_dir() {
            let global = dir.join("cctt").join(CONFIG_FILE_NAME);
            if global.is_file() {
                return Self::load_from_path(&global);
            }
        }

        Ok(Self::default())
    }

    /// Load from an explicit path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CcttError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&text)
            .map_err(|e| CcttError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Resolve the style set from configuration and flags.
    pub fn styles(&self, no_color_flag: bool) -> Styles {
        if no_color_flag {
            return Styles::PLAIN;
        }
        match self.output.color {
            ColorChoice::Never => Styles::PLAIN,
            ColorChoice::Always => Styles::COLORED,
            ColorChoice::Auto => {
                if std::io::stderr().is_terminal() {
                    Styles::COLORED
                } else {
                    Styles::PLAIN
                }
            }
        }
    }
}
