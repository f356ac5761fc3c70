//! Builder configuration.

use nav_core::{DEFAULT_NEST_THRESHOLD_PX, DropSettings, EmptyDropPolicy, MenuLocation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 1000;
pub const DEFAULT_ROW_HEIGHT_PX: f32 = 40.0;
pub const DEFAULT_HEADER_KEY: &str = "site-builder:menu:header";
pub const DEFAULT_FOOTER_KEY: &str = "site-builder:menu:footer";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid builder config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be empty")]
    EmptyKey { field: &'static str },
    #[error("header and footer share the storage key `{0}`")]
    SharedKey(String),
}

/// Tunables for a `MenuBuilder`. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderConfig {
    /// Horizontal drag distance per nesting level.
    pub nest_threshold_px: f32,
    /// Quiet period after the last change before autosave writes.
    pub autosave_delay_ms: u64,
    pub header_key: String,
    pub footer_key: String,
    /// Height of one builder row, for pointer hit testing.
    pub row_height_px: f32,
    pub empty_drop: EmptyDropPolicy,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            nest_threshold_px: DEFAULT_NEST_THRESHOLD_PX,
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            header_key: DEFAULT_HEADER_KEY.to_string(),
            footer_key: DEFAULT_FOOTER_KEY.to_string(),
            row_height_px: DEFAULT_ROW_HEIGHT_PX,
            empty_drop: EmptyDropPolicy::AppendToRoot,
        }
    }
}

impl BuilderConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("nestThresholdPx", self.nest_threshold_px),
            ("rowHeightPx", self.row_height_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.header_key.is_empty() {
            return Err(ConfigError::EmptyKey { field: "headerKey" });
        }
        if self.footer_key.is_empty() {
            return Err(ConfigError::EmptyKey { field: "footerKey" });
        }
        if self.header_key == self.footer_key {
            return Err(ConfigError::SharedKey(self.header_key.clone()));
        }
        Ok(())
    }

    pub fn key_for(&self, location: MenuLocation) -> &str {
        match location {
            MenuLocation::Header => &self.header_key,
            MenuLocation::Footer => &self.footer_key,
        }
    }

    pub fn drop_settings(&self) -> DropSettings {
        DropSettings {
            nest_threshold_px: self.nest_threshold_px,
            empty_drop: self.empty_drop,
        }
    }
}
