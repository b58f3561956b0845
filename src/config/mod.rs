//! Environment configuration.
//!
//! All settings come from the environment (a `.env` file is honored via
//! dotenvy in `main`). The sheet and target halves load independently so a
//! CSV-export run does not require Sheets API credentials.

use std::env;

use crate::error::{ConfigError, ConfigResult};

/// Google Sheets access settings.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    /// Spreadsheet id of the DST sheet.
    pub spreadsheet_id: String,
    /// API key with read access.
    pub api_key: String,
}

impl SheetConfig {
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            spreadsheet_id: require("DSTEG_SHEET_ID")?,
            api_key: require("GOOGLE_API_KEY")?,
        })
    }
}

/// Drupal target-site settings.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    /// Site base URL, e.g. `https://example.com`.
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl TargetConfig {
    pub fn from_env() -> ConfigResult<Self> {
        let base_url = require("DRUPAL_BASE_URL")?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidVar {
                var: "DRUPAL_BASE_URL",
                message: "must start with http:// or https://".into(),
            });
        }
        Ok(Self {
            base_url,
            username: require("DRUPAL_USERNAME")?,
            password: require("DRUPAL_PASSWORD")?,
        })
    }
}

fn require(var: &'static str) -> ConfigResult<String> {
    env::var(var).ok().filter(|v| !v.is_empty()).ok_or(ConfigError::MissingVar(var))
}
