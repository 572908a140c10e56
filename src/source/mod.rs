//! Where posts come from.
//!
//! Records are read from local JSON exports or fetched from a blog-list
//! backend, then normalized into [`BlogPost`](crate::models::BlogPost)s.

pub mod local;
pub mod normalize;
pub mod remote;

use crate::models::BlogPost;
use anyhow::{Context, Result};
use remote::{RemoteConfig, RemoteSource};
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// An input location for blog records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A single JSON file.
    File(PathBuf),
    /// Every `.json` file under a directory.
    Dir(PathBuf),
    /// One or more backends serving `/api/blogs`.
    Remote(Vec<String>),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "file {}", path.display()),
            Source::Dir(path) => write!(f, "directory {}", path.display()),
            Source::Remote(urls) => write!(f, "{}", urls.join(", ")),
        }
    }
}

/// Options that apply while loading.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Drop malformed records instead of failing.
    pub skip_invalid: bool,
    /// HTTP settings for remote sources.
    pub remote: RemoteConfig,
}

/// The result of loading a source.
#[derive(Debug, Clone)]
pub struct LoadedPosts {
    /// Normalized posts in source order.
    pub posts: Vec<BlogPost>,
    /// Number of malformed records dropped.
    pub skipped: usize,
    /// Human-readable locations the records came from.
    pub sources: Vec<String>,
}

/// Load and normalize posts from `source`.
pub async fn load(source: &Source, options: &LoadOptions) -> Result<LoadedPosts> {
    info!("Loading blogs from {}", source);

    let batches = match source {
        Source::File(path) => vec![(path.display().to_string(), local::read_file(path)?)],
        Source::Dir(path) => local::read_dir(path)?,
        Source::Remote(bases) => {
            let client = RemoteSource::new(options.remote.clone())?;
            let batches = client.fetch_all(bases).await?;
            bases
                .iter()
                .map(|base| remote::blogs_endpoint(base))
                .zip(batches)
                .collect()
        }
    };

    let mut loaded = LoadedPosts {
        posts: Vec::new(),
        skipped: 0,
        sources: Vec::with_capacity(batches.len()),
    };

    // Record indices in errors are positions within one file or response.
    for (location, records) in batches {
        let normalized = normalize::normalize_all(&records, options.skip_invalid)
            .with_context(|| format!("Invalid blog data from {}", location))?;

        loaded.posts.extend(normalized.posts);
        loaded.skipped += normalized.skipped;
        loaded.sources.push(location);
    }

    info!("Loaded {} posts ({} skipped)", loaded.posts.len(), loaded.skipped);

    Ok(loaded)
}
