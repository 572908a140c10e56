//! bloglist - statistics for blog-list backends
//!
//! A CLI tool that loads blog posts from JSON exports or a running
//! blog-list REST backend and reports aggregate statistics.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (I/O, HTTP, malformed record, bad config, etc.)
//!   2 - No posts left to aggregate and --fail-on-empty was set

mod cli;
mod config;
mod error;
mod models;
mod report;
mod source;
mod stats;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::BlogPost;
use report::ReportOptions;
use source::remote::RemoteConfig;
use source::{LoadOptions, Source};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("bloglist v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .bloglist.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging. Logs go to stderr so stdout stays usable for reports.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load posts, compute statistics, and write the report. Returns the exit code.
async fn run(args: Args, config: Config) -> Result<i32> {
    let source = args
        .source()
        .or_else(|| {
            (!config.source.urls.is_empty()).then(|| Source::Remote(config.source.urls.clone()))
        })
        .context("No input given: use --file, --dir or --url, or set source.urls in the config")?;

    let options = LoadOptions {
        skip_invalid: config.source.skip_invalid,
        remote: RemoteConfig {
            token: config.source.token.clone(),
            timeout_seconds: config.source.timeout_seconds,
            show_progress: !args.quiet && !args.no_progress,
        },
    };

    let loaded = source::load(&source, &options).await?;
    let posts = filter_posts(loaded.posts, config.report.min_likes, args.author.as_deref());

    if posts.is_empty() {
        warn!("No posts to aggregate");
    }

    let report = report::build_report(
        &posts,
        ReportOptions {
            sources: loaded.sources,
            skipped: loaded.skipped,
            top_n: config.report.top_n,
            include_posts: config.report.include_posts,
        },
    );

    let output = match config.general.format {
        OutputFormat::Text => report::generate_text_report(&report),
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    if config.general.output.is_empty() {
        print!("{}", output);
    } else {
        std::fs::write(&config.general.output, &output)
            .with_context(|| format!("Failed to write report to {}", config.general.output))?;
        info!("Report saved to {}", config.general.output);
    }

    if args.fail_on_empty && posts.is_empty() {
        eprintln!("No posts to aggregate. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Keep posts with at least `min_likes` likes, optionally by one author only.
fn filter_posts(posts: Vec<BlogPost>, min_likes: u64, author: Option<&str>) -> Vec<BlogPost> {
    let before = posts.len();

    let filtered: Vec<BlogPost> = posts
        .into_iter()
        .filter(|post| u64::from(post.likes) >= min_likes)
        .filter(|post| author.map_or(true, |name| post.author == name.trim()))
        .collect();

    if filtered.len() != before {
        debug!("Filtered {} posts down to {}", before, filtered.len());
    }

    filtered
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        Config::load(config_path)?
    } else {
        match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("Warning: ignoring {}: {:#}", CONFIG_FILE_NAME, e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    Ok(config)
}
