//! Data models for blog statistics.
//!
//! This module contains the core data structures used throughout
//! the application for representing posts, aggregate results, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single blog post, already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Backend identifier, if the source provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Title of the post.
    pub title: String,
    /// Name of the writer.
    pub author: String,
    /// Link to the post.
    pub url: String,
    /// Number of likes. Sums over posts are taken in `u64`.
    pub likes: u32,
}

impl BlogPost {
    /// Creates a post without a backend identifier.
    #[allow(dead_code)] // Used by tests and by callers building posts by hand
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
        likes: u32,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            url: url.into(),
            likes,
        }
    }
}

/// The most liked post, projected to the fields that matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub title: String,
    pub author: String,
    pub likes: u32,
}

impl From<&BlogPost> for Favorite {
    fn from(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            author: post.author.clone(),
            likes: post.likes,
        }
    }
}

impl fmt::Display for Favorite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" by {} ({} likes)", self.title, self.author, self.likes)
    }
}

/// Author with the most posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: usize,
}

/// Author with the most likes in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: u64,
}

/// Running per-author totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorTally {
    pub author: String,
    pub blogs: usize,
    pub likes: u64,
}

impl AuthorTally {
    /// Starts a tally with no posts counted.
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            blogs: 0,
            likes: 0,
        }
    }
}

impl From<&AuthorTally> for AuthorBlogs {
    fn from(tally: &AuthorTally) -> Self {
        Self {
            author: tally.author.clone(),
            blogs: tally.blogs,
        }
    }
}

impl From<&AuthorTally> for AuthorLikes {
    fn from(tally: &AuthorTally) -> Self {
        Self {
            author: tally.author.clone(),
            likes: tally.likes,
        }
    }
}

/// All statistics for one set of posts.
///
/// The `favorite`, `most_blogs` and `most_likes` fields are `None` only when
/// there were no posts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogStats {
    /// Number of posts aggregated.
    pub total_posts: usize,
    /// Sum of likes across all posts.
    pub total_likes: u64,
    /// The most liked post.
    pub favorite: Option<Favorite>,
    /// The author with the most posts.
    pub most_blogs: Option<AuthorBlogs>,
    /// The author with the most likes.
    pub most_likes: Option<AuthorLikes>,
    /// One row per author, in order of first appearance.
    pub authors: Vec<AuthorTally>,
}

impl BlogStats {
    /// Returns true if no posts were aggregated.
    pub fn is_empty(&self) -> bool {
        self.total_posts == 0
    }

    /// Average likes per post, or 0.0 when there are no posts.
    pub fn average_likes(&self) -> f64 {
        if self.total_posts == 0 {
            0.0
        } else {
            self.total_likes as f64 / self.total_posts as f64
        }
    }
}

/// Metadata about the statistics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the posts were loaded from.
    pub sources: Vec<String>,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of posts that passed normalization and filtering.
    pub posts_loaded: usize,
    /// Number of malformed records dropped in lenient mode.
    pub posts_skipped: usize,
    /// Length of the author leaderboards.
    pub top_n: usize,
}

/// The complete statistics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Aggregated statistics.
    pub stats: BlogStats,
    /// Top authors by number of posts.
    pub top_by_blogs: Vec<AuthorTally>,
    /// Top authors by total likes.
    pub top_by_likes: Vec<AuthorTally>,
    /// The posts the statistics were computed from.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub posts: Vec<BlogPost>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_from_post() {
        let post = BlogPost::new("Go To Statement", "Edsger W. Dijkstra", "http://x", 5);
        let favorite = Favorite::from(&post);
        assert_eq!(favorite.title, "Go To Statement");
        assert_eq!(favorite.author, "Edsger W. Dijkstra");
        assert_eq!(favorite.likes, 5);
        assert_eq!(
            favorite.to_string(),
            "\"Go To Statement\" by Edsger W. Dijkstra (5 likes)"
        );
    }

    #[test]
    fn test_post_serialization_skips_missing_id() {
        let post = BlogPost::new("A", "X", "http://a", 2);
        let json = serde_json::to_string(&post).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(json.contains("\"likes\":2"));
    }

    #[test]
    fn test_average_likes() {
        let stats = BlogStats::default();
        assert_eq!(stats.average_likes(), 0.0);
        assert!(stats.is_empty());

        let stats = BlogStats {
            total_posts: 4,
            total_likes: 10,
            ..Default::default()
        };
        assert_eq!(stats.average_likes(), 2.5);
    }

    #[test]
    fn test_tally_projections() {
        let tally = AuthorTally {
            author: "Robert C. Martin".to_string(),
            blogs: 3,
            likes: 12,
        };
        assert_eq!(
            AuthorBlogs::from(&tally),
            AuthorBlogs {
                author: "Robert C. Martin".to_string(),
                blogs: 3
            }
        );
        assert_eq!(AuthorLikes::from(&tally).likes, 12);
    }
}
