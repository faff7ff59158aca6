//! Configuration management for the tabload CLI
//!
//! Settings are layered: TOML file, then `TABLOAD_*` environment variables,
//! then command-line flags. The resulting [`Config`] is passed explicitly to
//! every stage; nothing reads ambient configuration after startup.

use crate::api::client::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::api::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
use crate::error::{CliError, Result};
use crate::pipeline::normalize::DEFAULT_ZERO_PLACEHOLDERS;
use crate::pipeline::{TypeOverrides, DEFAULT_BATCH_SIZE};
use crate::source::SourceType;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "tabload.toml";

/// Default collection store URL
pub const DEFAULT_ENDPOINT_BASE: &str = "http://localhost:8000";

pub const DEFAULT_TEST_COLLECTION: &str = "TabloadTest";
pub const DEFAULT_PROD_COLLECTION: &str = "Tabload";

/// Retry settings as they appear in the config file
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source CSV file
    pub source_path: Option<PathBuf>,

    /// Collection store base URL
    pub endpoint_base: String,

    pub username: Option<String>,

    pub password: Option<String>,

    /// Collection used for normal runs
    pub test_collection: String,

    /// Collection used with `--prod`
    pub prod_collection: String,

    pub batch_size: usize,

    /// Column whose value becomes each record's key
    pub primary_key: Option<String>,

    /// Forced column types, e.g. `Month = "string"`
    pub columns: BTreeMap<String, SourceType>,

    /// Tokens standing for a zero currency amount
    pub zero_placeholders: Vec<String>,

    pub retry: RetryConfig,

    pub request_timeout_secs: u64,

    /// Deadline for the whole pipeline; none means no deadline
    pub pipeline_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: None,
            endpoint_base: DEFAULT_ENDPOINT_BASE.to_string(),
            username: None,
            password: None,
            test_collection: DEFAULT_TEST_COLLECTION.to_string(),
            prod_collection: DEFAULT_PROD_COLLECTION.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            primary_key: None,
            columns: BTreeMap::new(),
            zero_placeholders: DEFAULT_ZERO_PLACEHOLDERS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            retry: RetryConfig::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            pipeline_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from a file (explicit or `tabload.toml`) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            },
            None => Self::default(),
        };

        config.merge_env()
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| CliError::config(format!("invalid config file '{}': {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        Self::default().merge_env()
    }

    /// Apply `TABLOAD_*` environment variables
    pub fn merge_env(mut self) -> Result<Self> {
        if let Ok(path) = std::env::var("TABLOAD_SOURCE") {
            self.source_path = Some(PathBuf::from(path));
        }

        if let Ok(url) = std::env::var("TABLOAD_ENDPOINT") {
            self.endpoint_base = url;
        }

        if let Ok(username) = std::env::var("TABLOAD_USERNAME") {
            self.username = Some(username);
        }

        if let Ok(password) = std::env::var("TABLOAD_PASSWORD") {
            self.password = Some(password);
        }

        if let Ok(name) = std::env::var("TABLOAD_TEST_COLLECTION") {
            self.test_collection = name;
        }

        if let Ok(name) = std::env::var("TABLOAD_PROD_COLLECTION") {
            self.prod_collection = name;
        }

        if let Ok(key) = std::env::var("TABLOAD_PRIMARY_KEY") {
            self.primary_key = Some(key);
        }

        if let Some(size) = env_number("TABLOAD_BATCH_SIZE")? {
            self.batch_size = size;
        }

        if let Some(attempts) = env_number("TABLOAD_MAX_ATTEMPTS")? {
            self.retry.max_attempts = attempts;
        }

        if let Some(delay) = env_number("TABLOAD_RETRY_DELAY_MS")? {
            self.retry.delay_ms = delay;
        }

        if let Some(secs) = env_number("TABLOAD_REQUEST_TIMEOUT_SECS")? {
            self.request_timeout_secs = secs;
        }

        if let Some(secs) = env_number("TABLOAD_PIPELINE_TIMEOUT_SECS")? {
            self.pipeline_timeout_secs = Some(secs);
        }

        Ok(self)
    }

    /// Collection to target: an explicit name wins, then `--prod`, then test
    pub fn collection<'a>(&'a self, prod: bool, explicit: Option<&'a str>) -> &'a str {
        match explicit {
            Some(name) => name,
            None if prod => &self.prod_collection,
            None => &self.test_collection,
        }
    }

    pub fn source_path(&self) -> Result<&Path> {
        self.source_path
            .as_deref()
            .ok_or_else(|| CliError::config("no source file given (use --source or TABLOAD_SOURCE)"))
    }

    pub fn batch_size(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.batch_size)
            .ok_or_else(|| CliError::config("batch size must be at least 1"))
    }

    pub fn type_overrides(&self) -> TypeOverrides {
        self.columns
            .iter()
            .fold(TypeOverrides::new(), |overrides, (name, ty)| {
                overrides.column(name.clone(), *ty)
            })
            .zero_placeholders(self.zero_placeholders.iter().cloned())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.delay_ms),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pipeline_timeout(&self) -> Option<Duration> {
        self.pipeline_timeout_secs.map(Duration::from_secs)
    }

    /// Credentials for `authenticate`
    pub fn credentials(&self) -> Result<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() => Ok((user, pass)),
            _ => Err(CliError::config(
                "credentials missing (set TABLOAD_USERNAME and TABLOAD_PASSWORD)",
            )),
        }
    }

    /// Check settings needed to read and normalize the source
    pub fn validate_local(&self) -> Result<()> {
        self.source_path()?;
        self.batch_size()?;
        Ok(())
    }

    /// Check settings needed to talk to the collection store
    pub fn validate_remote(&self, collection: &str) -> Result<()> {
        if self.endpoint_base.trim().is_empty() {
            return Err(CliError::config("endpoint base URL cannot be empty"));
        }

        if collection.trim().is_empty() {
            return Err(CliError::config("collection name cannot be empty"));
        }

        if self.retry.max_attempts == 0 {
            return Err(CliError::config("retry max_attempts must be at least 1"));
        }

        if self.request_timeout_secs == 0 {
            return Err(CliError::config("request timeout must be greater than 0"));
        }

        self.credentials()?;
        Ok(())
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CliError::config(format!("{} must be a number, got '{}'", name, value))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint_base, DEFAULT_ENDPOINT_BASE);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.retry.max_attempts, 10);
        assert!(config.pipeline_timeout().is_none());
    }

    #[test]
    fn test_column_type_aliases_in_toml() {
        let config = Config::from_toml(
            r#"
            [columns]
            Discounts = "currency"
            Month = "text"
            Units = "int"
            "#,
        )
        .unwrap();

        assert_eq!(config.columns.get("Discounts"), Some(&SourceType::Number));
        assert_eq!(config.columns.get("Month"), Some(&SourceType::String));
        assert_eq!(config.columns.get("Units"), Some(&SourceType::Integer));
        assert!(Config::from_toml("[columns]\nMonth = \"blob\"\n").is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let config = Config::from_toml(
            r#"
            source_path = "data/sales.csv"
            endpoint_base = "https://store.example.com/api"
            test_collection = "SalesTest"
            prod_collection = "Sales"
            batch_size = 50
            primary_key = "ID"
            zero_placeholders = ["$-"]
            pipeline_timeout_secs = 600

            [columns]
            Month = "string"
            Discounts = "number"

            [retry]
            max_attempts = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.source_path, Some(PathBuf::from("data/sales.csv")));
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.columns.get("Month"), Some(&SourceType::String));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay_ms, DEFAULT_RETRY_DELAY_MS);
        assert_eq!(config.pipeline_timeout(), Some(Duration::from_secs(600)));
        assert_eq!(
            config.type_overrides(),
            TypeOverrides::new()
                .column("Discounts", SourceType::Number)
                .column("Month", SourceType::String)
                .zero_placeholders(["$-"])
        );
    }

    #[test]
    fn test_collection_selection() {
        let config = Config::default();
        assert_eq!(config.collection(false, None), DEFAULT_TEST_COLLECTION);
        assert_eq!(config.collection(true, None), DEFAULT_PROD_COLLECTION);
        assert_eq!(config.collection(true, Some("Adhoc")), "Adhoc");
    }

    #[test]
    fn test_validate_remote() {
        let mut config = Config::default();
        assert!(config.validate_remote("Orders").is_err());

        config.username = Some("loader".to_string());
        config.password = Some("secret".to_string());
        assert!(config.validate_remote("Orders").is_ok());
        assert!(config.validate_remote(" ").is_err());

        config.retry.max_attempts = 0;
        assert!(config.validate_remote("Orders").is_err());
    }

    #[test]
    fn test_validate_local() {
        let mut config = Config::default();
        assert!(config.validate_local().is_err());

        config.source_path = Some(PathBuf::from("rows.csv"));
        assert!(config.validate_local().is_ok());

        config.batch_size = 0;
        assert!(config.validate_local().is_err());
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var("TABLOAD_ENDPOINT", "http://env.example.com");
        std::env::set_var("TABLOAD_BATCH_SIZE", "25");

        let config = Config::from_env().unwrap();
        assert_eq!(config.endpoint_base, "http://env.example.com");
        assert_eq!(config.batch_size, 25);

        std::env::set_var("TABLOAD_BATCH_SIZE", "many");
        assert!(Config::from_env().is_err());

        std::env::remove_var("TABLOAD_ENDPOINT");
        std::env::remove_var("TABLOAD_BATCH_SIZE");
    }
}
