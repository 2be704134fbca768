//! Configuration management for SiteGuard components

use serde::{Deserialize, Serialize};
use siteguard_core::{Error, GradeScale, Result};
use siteguard_firewall::{DenyCategory, DenyLists, ListOverride};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Result store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// The audited site
    #[serde(default)]
    pub site: SiteConfig,

    /// Scan orchestration settings
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Deny-list overrides and rule toggles
    #[serde(default)]
    pub firewall: FirewallConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Reject values no component can run with
    pub fn validate(&self) -> Result<()> {
        self.scanner.grade_thresholds.validate()?;
        if self.scanner.history_cap == 0 {
            return Err(Error::Configuration(
                "scanner.history_cap must be at least 1".into(),
            ));
        }
        if self.site.home_url.is_empty() {
            return Err(Error::Configuration("site.home_url must not be empty".into()));
        }
        Ok(())
    }

    /// Merge with environment variables (SITEGUARD_ prefix)
    pub fn merge_env(mut self) -> Self {
        // Store
        if let Ok(val) = std::env::var("SITEGUARD_DB_PATH") {
            self.store.database_path = val;
        }

        // Site
        if let Ok(val) = std::env::var("SITEGUARD_SITE_ROOT") {
            self.site.root = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("SITEGUARD_HOME_URL") {
            self.site.home_url = val;
        }

        // Scanner
        if let Ok(val) = std::env::var("SITEGUARD_PRO") {
            if let Ok(pro) = val.parse() {
                self.scanner.pro = pro;
            }
        }
        if let Ok(val) = std::env::var("SITEGUARD_HTTP_TIMEOUT") {
            if let Ok(n) = val.parse() {
                self.scanner.http_timeout_seconds = n;
            }
        }
        if let Ok(val) = std::env::var("SITEGUARD_HISTORY_CAP") {
            if let Ok(n) = val.parse() {
                self.scanner.history_cap = n;
            }
        }

        // Logging
        if let Ok(val) = std::env::var("SITEGUARD_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("SITEGUARD_LOG_FORMAT") {
            self.logging.format = val;
        }

        self
    }
}

/// Result store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite options database
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

fn default_database_path() -> String {
    String::from("/var/lib/siteguard/siteguard.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// The site being audited
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Installation root on disk
    #[serde(default = "default_site_root")]
    pub root: PathBuf,

    /// Public home URL
    #[serde(default = "default_home_url")]
    pub home_url: String,

    /// Served by Apache (enables `.htaccess` checks)
    #[serde(default)]
    pub apache: bool,

    /// Directory name of the plugin under the plugins directory
    #[serde(default = "default_plugin_slug")]
    pub plugin_slug: String,

    /// Replaces the built-in forbidden login list when set
    pub forbidden_logins: Option<Vec<String>>,

    /// Logins recorded on first run when the store holds none
    #[serde(default)]
    pub users: Vec<String>,
}

fn default_site_root() -> PathBuf {
    PathBuf::from("/var/www/html")
}

fn default_home_url() -> String {
    String::from("http://localhost")
}

fn default_plugin_slug() -> String {
    String::from("siteguard")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_site_root(),
            home_url: default_home_url(),
            apache: false,
            plugin_slug: default_plugin_slug(),
            forbidden_logins: None,
            users: vec![],
        }
    }
}

/// Scan orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Number of scan-time records kept
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    /// Timeout of outbound HTTP probes
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,

    /// Paid tier enabled
    #[serde(default)]
    pub pro: bool,

    /// Lower percent bounds of grades A to D
    #[serde(default)]
    pub grade_thresholds: GradeScale,
}

fn default_history_cap() -> usize {
    15
}

fn default_http_timeout() -> u64 {
    10
}

impl ScannerConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            history_cap: default_history_cap(),
            http_timeout_seconds: default_http_timeout(),
            pro: false,
            grade_thresholds: GradeScale::default(),
        }
    }
}

/// Firewall configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallConfig {
    /// Reject methods outside the allowed set
    #[serde(default = "default_true")]
    pub check_methods: bool,

    /// Reject user agents containing HTML tags
    #[serde(default = "default_true")]
    pub check_html_agents: bool,

    #[serde(default)]
    pub user_agents: ListOverride,

    #[serde(default)]
    pub url_contents: ListOverride,

    #[serde(default)]
    pub host_contents: ListOverride,

    #[serde(default)]
    pub referer_contents: ListOverride,
}

fn default_true() -> bool {
    true
}

impl FirewallConfig {
    pub fn list_override(&self, category: DenyCategory) -> &ListOverride {
        match category {
            DenyCategory::UserAgents => &self.user_agents,
            DenyCategory::UrlContents => &self.url_contents,
            DenyCategory::HostContents => &self.host_contents,
            DenyCategory::RefererContents => &self.referer_contents,
        }
    }

    /// Default deny lists with every override applied
    pub fn deny_lists(&self) -> DenyLists {
        let mut lists = DenyLists::default();
        for category in DenyCategory::ALL {
            lists.apply(category, self.list_override(category));
        }
        lists
    }
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            check_methods: true,
            check_html_agents: true,
            user_agents: ListOverride::default(),
            url_contents: ListOverride::default(),
            host_contents: ListOverride::default(),
            referer_contents: ListOverride::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("pretty")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Builder for constructing Config
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn database_path(mut self, path: impl Into<String>) -> Self {
        self.config.store.database_path = path.into();
        self
    }

    pub fn site_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.site.root = root.into();
        self
    }

    pub fn home_url(mut self, url: impl Into<String>) -> Self {
        self.config.site.home_url = url.into();
        self
    }

    pub fn apache(mut self, apache: bool) -> Self {
        self.config.site.apache = apache;
        self
    }

    pub fn pro(mut self, pro: bool) -> Self {
        self.config.scanner.pro = pro;
        self
    }

    pub fn history_cap(mut self, cap: usize) -> Self {
        self.config.scanner.history_cap = cap;
        self
    }

    pub fn grade_thresholds(mut self, scale: GradeScale) -> Self {
        self.config.scanner.grade_thresholds = scale;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
