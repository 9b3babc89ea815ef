use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

const CONFIG_DIR_PREFIX: &str = "plaid-sheets-sync";

// Plaid rejects /transactions/get requests with a count above this.
pub const MAX_PAGE_SIZE: u32 = 500;

// Plaid serves at most 24 months of transaction history.
pub const MAX_LOOKBACK_DAYS: u32 = 730;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub plaid: PlaidConfig,
    pub google: GoogleConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PlaidConfig {
    pub client_id: String,
    pub secret: String,
    pub env: PlaidEnvironment,
    /// Access token of the linked bank connection (item) to sync.
    pub access_token: String,
}

impl PlaidConfig {
    pub fn api_base_url(&self) -> String {
        self.env.base_url().to_string()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaidEnvironment {
    #[default]
    Sandbox,
    Development,
    Production,
}

impl PlaidEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            PlaidEnvironment::Sandbox => "https://sandbox.plaid.com",
            PlaidEnvironment::Development => "https://development.plaid.com",
            PlaidEnvironment::Production => "https://production.plaid.com",
        }
    }
}

impl FromStr for PlaidEnvironment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(PlaidEnvironment::Sandbox),
            "development" => Ok(PlaidEnvironment::Development),
            "production" => Ok(PlaidEnvironment::Production),
            other => Err(AppError::Config(format!(
                "Unknown Plaid environment '{}', expected sandbox, development or production",
                other
            ))),
        }
    }
}

impl fmt::Display for PlaidEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaidEnvironment::Sandbox => "sandbox",
            PlaidEnvironment::Development => "development",
            PlaidEnvironment::Production => "production",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GoogleConfig {
    pub spreadsheet_id: String,
    /// Path to the service account JSON key.
    pub service_account_key: PathBuf,
    /// Sheet (tab) to use. The first sheet when unset.
    pub sheet_name: Option<String>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            service_account_key: PathBuf::from("keys.json"),
            sheet_name: None,
        }
    }
}

impl GoogleConfig {
    /// Build an A1 range for the given columns, scoped to the configured sheet.
    pub fn range(&self, columns: &str) -> String {
        match self.sheet_name.as_deref() {
            Some(name) => format!("'{}'!{}", name.replace('\'', "''"), columns),
            None => columns.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SyncConfig {
    /// Number of days before today to request transactions for.
    pub lookback_days: u32,
    pub page_size: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            lookback_days: 15,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenv::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        let config_path = Self::xdg_dirs().find_config_file("config.toml");
        let contents = Self::read_config_file(config_path.as_deref())?;

        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Read an existing config file. A missing or unreachable path is not an
    /// error, the environment may supply every setting.
    fn read_config_file(path: Option<&Path>) -> Result<Option<String>> {
        match path.filter(|p| p.is_file()) {
            Some(path) => {
                debug!(?path, "Reading config file");
                Ok(Some(fs::read_to_string(path)?))
            }
            None => {
                debug!("Config file not found, using environment only");
                Ok(None)
            }
        }
    }

    /// Merge the optional TOML contents with environment overrides and validate.
    pub fn from_sources<F>(contents: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config = match contents {
            Some(contents) => toml::from_str(contents)
                .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?,
            None => Config::default(),
        };

        config.apply_env(env)?;
        config.validate()?;

        Ok(config)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("PLAID_CLIENT_ID") {
            self.plaid.client_id = v;
        }
        if let Some(v) = var("PLAID_SECRET") {
            self.plaid.secret = v;
        }
        if let Some(v) = var("PLAID_ENV") {
            self.plaid.env = v.parse()?;
        }
        if let Some(v) = var("PLAID_ACCOUNT") {
            self.plaid.access_token = v;
        }
        if let Some(v) = var("ACTIVE_SHEET") {
            self.google.spreadsheet_id = v;
        }
        if let Some(v) = var("GOOGLE_SERVICE_ACCOUNT_KEY") {
            self.google.service_account_key = PathBuf::from(v);
        }

        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        let required = [
            (&self.plaid.client_id, "plaid.client_id (PLAID_CLIENT_ID)"),
            (&self.plaid.secret, "plaid.secret (PLAID_SECRET)"),
            (&self.plaid.access_token, "plaid.access_token (PLAID_ACCOUNT)"),
            (&self.google.spreadsheet_id, "google.spreadsheet_id (ACTIVE_SHEET)"),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(value, _)| value.is_empty())
            .map(|(_, name)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )));
        }

        if self.sync.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(AppError::Config(format!(
                "sync.lookback_days must be at most {}, got {}",
                MAX_LOOKBACK_DAYS, self.sync.lookback_days
            )));
        }

        self.sync.page_size = self.sync.page_size.clamp(1, MAX_PAGE_SIZE);

        Ok(())
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.toml")
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }

    /// Get the cache directory path
    pub fn cache_dir() -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.get_cache_home()
            .ok_or_else(|| AppError::Config("Failed to determine cache directory".to_string()))
    }

    /// Get a cache file path
    pub fn cache_file(filename: &str) -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.place_cache_file(filename)
            .map_err(|e| AppError::Config(format!("Failed to create cache file path: {}", e)))
    }
}
