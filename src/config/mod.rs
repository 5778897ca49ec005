//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `PUBMED_PAPERS` (nested keys separated
//! by `__`, e.g. `PUBMED_PAPERS_HTTP__TIMEOUT_SECS=10`).
//!
//! ```toml
//! [eutils]
//! base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! api_key = "your-ncbi-key"
//! email = "you@example.org"
//!
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [output]
//! default_file = "papers.csv"
//! max_results = 100
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "pubmed-papers.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// NCBI E-utilities settings
    #[serde(default)]
    pub eutils: EutilsConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// NCBI E-utilities settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EutilsConfig {
    /// Base URL; `esearch.fcgi` and `efetch.fcgi` are resolved against it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// NCBI API key (optional, raises the rate limit from 3 to 10 requests/second)
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// Contact e-mail sent with every request, as NCBI asks
    #[serde(default = "default_email")]
    pub email: Option<String>,

    /// Tool name sent with every request
    #[serde(default = "default_tool")]
    pub tool: String,
}

impl Default for EutilsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            email: default_email(),
            tool: default_tool(),
        }
    }
}

fn default_base_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string()
}

fn default_api_key() -> Option<String> {
    std::env::var("NCBI_API_KEY").ok().filter(|k| !k.is_empty())
}

fn default_email() -> Option<String> {
    std::env::var("NCBI_EMAIL").ok().filter(|e| !e.is_empty())
}

fn default_tool() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File written when no `--file` is given
    #[serde(default = "default_file")]
    pub default_file: PathBuf,

    /// Upper bound on identifiers requested from esearch
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_file: default_file(),
            max_results: default_max_results(),
        }
    }
}

fn default_file() -> PathBuf {
    PathBuf::from("papers.csv")
}

fn default_max_results() -> usize {
    crate::models::DEFAULT_MAX_RESULTS
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level for this crate's logs when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with environment overrides on top
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from environment variables and defaults only
pub fn get_config() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder().add_source(env_source()).build()?;

    settings.try_deserialize()
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("PUBMED_PAPERS")
        .prefix_separator("_")
        .separator("__")
}

/// Locate a configuration file in the usual places.
///
/// Checks `./pubmed-papers.toml` first, then `<config dir>/pubmed-papers/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("config.toml"))
        .filter(|path| path.is_file())
}
