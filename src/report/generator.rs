//! Report generation.
//!
//! This module builds a [`Report`] from loaded posts and renders it as
//! plain text, Markdown, or JSON.

use crate::error::StatsError;
use crate::models::{AuthorTally, BlogPost, BlogStats, Report, ReportMetadata};
use crate::stats::{compute_stats, top_authors_by_blogs, top_authors_by_likes};
use anyhow::Result;
use chrono::Utc;

/// Inputs for [`build_report`] besides the posts themselves.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Where the posts came from.
    pub sources: Vec<String>,
    /// Malformed records dropped while loading.
    pub skipped: usize,
    /// Leaderboard length.
    pub top_n: usize,
    /// Embed the full post list.
    pub include_posts: bool,
}

/// Compute statistics and wrap them in a report.
pub fn build_report(posts: &[BlogPost], options: ReportOptions) -> Report {
    let stats = compute_stats(posts);

    Report {
        metadata: ReportMetadata {
            sources: options.sources,
            generated_at: Utc::now(),
            posts_loaded: posts.len(),
            posts_skipped: options.skipped,
            top_n: options.top_n,
        },
        top_by_blogs: top_authors_by_blogs(posts, options.top_n),
        top_by_likes: top_authors_by_likes(posts, options.top_n),
        stats,
        posts: if options.include_posts {
            posts.to_vec()
        } else {
            Vec::new()
        },
    }
}

/// Generate a short console summary.
pub fn generate_text_report(report: &Report) -> String {
    let stats = &report.stats;
    let mut lines = Vec::new();

    lines.push(format!("Sources: {}", report.metadata.sources.join(", ")));
    lines.push(format!("Posts: {}", stats.total_posts));
    if report.metadata.posts_skipped > 0 {
        lines.push(format!("Skipped records: {}", report.metadata.posts_skipped));
    }

    if stats.is_empty() {
        lines.push(StatsError::EmptyInput.to_string());
        return lines.join("\n") + "\n";
    }

    lines.push(format!("Total likes: {}", stats.total_likes));
    lines.push(format!("Average likes: {:.2}", stats.average_likes()));

    if let Some(ref favorite) = stats.favorite {
        lines.push(format!("Favorite blog: {}", favorite));
    }
    if let Some(ref best) = stats.most_blogs {
        lines.push(format!("Most blogs: {} ({})", best.author, best.blogs));
    }
    if let Some(ref best) = stats.most_likes {
        lines.push(format!("Most likes: {} ({})", best.author, best.likes));
    }

    lines.join("\n") + "\n"
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Blog Statistics\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.stats));

    if !report.stats.is_empty() {
        output.push_str(&generate_leaderboard_section(
            "Top Authors by Posts",
            &report.top_by_blogs,
        ));
        output.push_str(&generate_leaderboard_section(
            "Top Authors by Likes",
            &report.top_by_likes,
        ));
    }

    output.push_str(&generate_posts_section(&report.posts));
    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    for source in &metadata.sources {
        section.push_str(&format!("- **Source:** {}\n", source));
    }
    section.push_str(&format!("- **Posts Loaded:** {}\n", metadata.posts_loaded));
    if metadata.posts_skipped > 0 {
        section.push_str(&format!(
            "- **Records Skipped:** {}\n",
            metadata.posts_skipped
        ));
    }
    section.push('\n');

    section
}

fn generate_summary_section(stats: &BlogStats) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");

    if stats.is_empty() {
        section.push_str(&format!("*{}.*\n\n", StatsError::EmptyInput));
        return section;
    }

    section.push_str("| Posts | Authors | Total Likes | Average Likes |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {:.2} |\n\n",
        stats.total_posts,
        stats.authors.len(),
        stats.total_likes,
        stats.average_likes()
    ));

    if let Some(ref favorite) = stats.favorite {
        section.push_str(&format!(
            "- **Favorite Blog:** \"{}\" by {} ({} likes)\n",
            favorite.title, favorite.author, favorite.likes
        ));
    }
    if let Some(ref best) = stats.most_blogs {
        section.push_str(&format!(
            "- **Most Blogs:** {} ({} posts)\n",
            best.author, best.blogs
        ));
    }
    if let Some(ref best) = stats.most_likes {
        section.push_str(&format!(
            "- **Most Likes:** {} ({} likes)\n",
            best.author, best.likes
        ));
    }
    section.push('\n');

    section
}

fn generate_leaderboard_section(heading: &str, authors: &[AuthorTally]) -> String {
    if authors.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str(&format!("### {}\n\n", heading));
    section.push_str("| # | Author | Posts | Likes |\n");
    section.push_str("|:---:|:---|:---:|:---:|\n");

    for (i, tally) in authors.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            i + 1,
            escape_cell(&tally.author),
            tally.blogs,
            tally.likes
        ));
    }
    section.push('\n');

    section
}

fn generate_posts_section(posts: &[BlogPost]) -> String {
    if posts.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Posts\n\n");
    section.push_str("| Title | Author | Likes |\n");
    section.push_str("|:---|:---|:---:|\n");

    for post in posts {
        section.push_str(&format!(
            "| [{}](<{}>) | {} | {} |\n",
            escape_link_text(&post.title),
            escape_link_target(&post.url),
            escape_cell(&post.author),
            post.likes
        ));
    }
    section.push('\n');

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by bloglist*\n".to_string()
}

// Pipes would split a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn escape_link_text(text: &str) -> String {
    escape_cell(&text.replace('[', "\\[").replace(']', "\\]"))
}

/// Percent-encode the characters that would end an `<...>` link destination
/// or the table cell around it.
fn escape_link_target(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '|' => escaped.push_str("%7C"),
            '<' => escaped.push_str("%3C"),
            '>' => escaped.push_str("%3E"),
            '\n' => escaped.push_str("%0A"),
            '\r' => escaped.push_str("%0D"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
