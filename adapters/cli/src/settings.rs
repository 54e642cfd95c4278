//! TOML-backed settings for the headless host.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use brutal_maze_core::Tuning;
use serde::{Deserialize, Serialize};

/// Settings file layout. Missing tables and keys fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) graphics: Graphics,
    pub(crate) tuning: Tuning,
}

/// Size of the simulated drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Graphics {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Default for Graphics {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl Settings {
    /// Reads settings from `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings in {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid settings toml")
    }

    /// Serializes the settings as a TOML document.
    pub(crate) fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize settings")
    }
}
