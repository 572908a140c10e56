//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::is_http_url;
use crate::source::Source;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// bloglist - statistics for blog-list backends
///
/// Loads blog posts from JSON exports or a running backend and reports
/// total likes, the favorite blog, and the most prolific and most liked
/// authors.
///
/// Examples:
///   bloglist --file blogs.json
///   bloglist --dir exports/ --format markdown -o stats.md
///   bloglist --url http://localhost:3003 --token "$TOKEN"
///   bloglist --url http://a:3003,http://b:3003 --format json
///   bloglist --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON file with an array of blogs
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["dir", "url"])]
    pub file: Option<PathBuf>,

    /// Directory to search for .json blog exports
    #[arg(short, long, value_name = "DIR", conflicts_with = "url")]
    pub dir: Option<PathBuf>,

    /// Blog backend base URL(s) (comma-separated)
    ///
    /// `/api/blogs` is appended unless already present.
    #[arg(short, long, value_name = "URL", value_delimiter = ',')]
    pub url: Option<Vec<String>>,

    /// Bearer token for the backend
    #[arg(long, env = "BLOGLIST_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output file path for the report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Number of authors in each leaderboard
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Only count posts with at least this many likes
    #[arg(long, value_name = "N")]
    pub min_likes: Option<u64>,

    /// Only count posts by this author
    #[arg(long, value_name = "NAME")]
    pub author: Option<String>,

    /// Include every post in the report
    #[arg(long)]
    pub include_posts: bool,

    /// Skip malformed records instead of failing
    #[arg(long)]
    pub skip_invalid: bool,

    /// Exit with code 2 if no posts remain after filtering
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .bloglist.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not show a spinner while fetching
    #[arg(long)]
    pub no_progress: bool,

    /// Generate a default .bloglist.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text summary (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref urls) = self.url {
            if urls.is_empty() {
                return Err("At least one URL is required".to_string());
            }
            for url in urls {
                if !is_http_url(url) {
                    return Err(format!(
                        "URL must start with 'http://' or 'https://': {}",
                        url
                    ));
                }
            }
        }

        if let Some(ref file) = self.file {
            if !file.is_file() {
                return Err(format!("Input file does not exist: {}", file.display()));
            }
        }

        if let Some(ref dir) = self.dir {
            if !dir.exists() {
                return Err(format!("Directory does not exist: {}", dir.display()));
            }
            if !dir.is_dir() {
                return Err(format!("Path is not a directory: {}", dir.display()));
            }
        }

        if self.top == Some(0) {
            return Err("--top must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if let Some(ref author) = self.author {
            if author.trim().is_empty() {
                return Err("--author must not be blank".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// The input named on the command line, if any.
    pub fn source(&self) -> Option<Source> {
        if let Some(ref file) = self.file {
            Some(Source::File(file.clone()))
        } else if let Some(ref dir) = self.dir {
            Some(Source::Dir(dir.clone()))
        } else {
            self.url.as_ref().map(|urls| Source::Remote(urls.clone()))
        }
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
