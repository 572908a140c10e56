//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.bloglist.toml` files.

use crate::cli::{Args, OutputFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".bloglist.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output path. Empty means stdout.
    #[serde(default)]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Default report format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Backends to fetch from when no input is given on the command line.
    #[serde(default)]
    pub urls: Vec<String>,

    /// Bearer token for the backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Drop malformed records instead of failing.
    #[serde(default)]
    pub skip_invalid: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            token: None,
            timeout_seconds: default_timeout(),
            skip_invalid: false,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Length of the author leaderboards.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Include every post in Markdown and JSON reports.
    #[serde(default)]
    pub include_posts: bool,

    /// Ignore posts with fewer likes than this.
    #[serde(default)]
    pub min_likes: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            include_posts: false,
            min_likes: 0,
        }
    }
}

fn default_top_n() -> usize {
    5
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.bloglist.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.report.top_n == 0 {
            anyhow::bail!("report.top_n must be at least 1");
        }
        if self.source.timeout_seconds == 0 {
            anyhow::bail!("source.timeout_seconds must be at least 1");
        }
        for url in &self.source.urls {
            if !is_http_url(url) {
                anyhow::bail!("source.urls entry must start with 'http://' or 'https://': {}", url);
            }
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(ref urls) = args.url {
            self.source.urls = urls.clone();
        }
        if let Some(ref token) = args.token {
            self.source.token = Some(token.clone());
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }
        if args.skip_invalid {
            self.source.skip_invalid = true;
        }

        if let Some(top) = args.top {
            self.report.top_n = top;
        }
        if let Some(min_likes) = args.min_likes {
            self.report.min_likes = min_likes;
        }
        if args.include_posts {
            self.report.include_posts = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

/// Whether `url` uses an HTTP scheme.
pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
