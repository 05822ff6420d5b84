use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::CoachError;

/// Fallback variable consulted when the primary one is unset.
pub const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub api_base: String,
    pub api_key_env: String,
    /// No timeout unless set.
    pub timeout_secs: Option<u64>,
    pub artifacts_dir: String,
    pub save_request: bool,
    pub save_response: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".into(),
            api_key_env: "API_KEY".into(),
            timeout_secs: None,
            artifacts_dir: ".jimbo".into(),
            save_request: false,
            save_response: false,
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// Defaults, overlaid with a TOML file when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Self::default()),
            Some(p) => {
                let s = fs::read_to_string(p)?;
                toml::from_str(&s).with_context(|| format!("parsing {}", p.display()))
            }
        }
    }

    /// Read the credential from the environment.
    pub fn api_key(&self) -> Result<String, CoachError> {
        self.api_key_from(|name| std::env::var(name).ok())
    }

    pub fn api_key_from<F>(&self, lookup: F) -> Result<String, CoachError>
    where
        F: Fn(&str) -> Option<String>,
    {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .into_iter()
            .filter_map(|name| lookup(name))
            .find(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                CoachError::Config(format!("{} environment variable not set", self.api_key_env))
            })
    }
}
