//! Configuration handling for the wizard

use crate::state::{ConditionalFieldBinding, DISABILITY_YES_VALUES, REPORT_YES_VALUES};
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Server address used when neither the file nor the environment names one
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "CRAS_INTAKE_BASE_URL";

const DEFAULT_TOKEN_PATH: &str = "/csrf-token/";
const DEFAULT_PAGE_PATH: &str = "/";
const DEFAULT_SUBMIT_PATH: &str = "/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User configuration for the wizard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WizardConfig {
    /// Server root, e.g. `https://cras.example.gov.br`
    pub base_url: Option<String>,
    /// Token endpoint path
    pub token_path: Option<String>,
    /// Form page path, re-fetched when the token endpoint fails
    pub page_path: Option<String>,
    /// Path receiving the submitted form
    pub submit_path: Option<String>,
    /// HTTP timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Directory for the autosave file
    pub storage_dir: Option<PathBuf>,
    /// Values of `deficiente` that enable `deficiencia`
    pub disability_yes_values: Option<Vec<String>>,
    /// Values of `laudo` that enable `observacao`
    pub report_yes_values: Option<Vec<String>>,
}

impl WizardConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("br", "cras", "cras-intake")
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Platform data directory, home of the autosave and the log file
    pub fn data_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: WizardConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Server root: environment first, then file, then default
    pub fn base_url(&self) -> String {
        std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn token_path(&self) -> &str {
        self.token_path.as_deref().unwrap_or(DEFAULT_TOKEN_PATH)
    }

    pub fn page_path(&self) -> &str {
        self.page_path.as_deref().unwrap_or(DEFAULT_PAGE_PATH)
    }

    pub fn submit_path(&self) -> &str {
        self.submit_path.as_deref().unwrap_or(DEFAULT_SUBMIT_PATH)
    }

    pub fn request_timeout(&self) -> Duration {
        let secs = self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs.max(1))
    }

    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir.clone().or_else(Self::data_dir)
    }

    /// Conditional field wiring with the configured enabled values
    pub fn bindings(&self) -> Vec<ConditionalFieldBinding> {
        fn values(configured: &Option<Vec<String>>, default: &[&str]) -> Vec<String> {
            match configured {
                Some(v) if !v.is_empty() => v.clone(),
                _ => default.iter().map(|s| s.to_string()).collect(),
            }
        }
        vec![
            ConditionalFieldBinding::new(
                "deficiente",
                "deficiencia",
                values(&self.disability_yes_values, DISABILITY_YES_VALUES),
            ),
            ConditionalFieldBinding::new(
                "laudo",
                "observacao",
                values(&self.report_yes_values, REPORT_YES_VALUES),
            ),
        ]
    }
}
