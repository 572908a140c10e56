//! Post aggregation and statistics.
//!
//! This module provides the statistics computed over a list of blog posts.
//! Every function borrows its input and returns a fresh value, so the same
//! slice can be passed to any number of them.
//!
//! Ties are always broken by first appearance in the input: the earliest post
//! for [`favorite_blog`], the earliest author for [`most_blogs`] and
//! [`most_likes`].

use crate::error::{Result, StatsError};
use crate::models::{AuthorBlogs, AuthorLikes, AuthorTally, BlogPost, BlogStats, Favorite};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Always returns 1.
#[allow(dead_code)] // Smoke test for the test harness
pub fn dummy(_posts: &[BlogPost]) -> u64 {
    1
}

/// Sum of likes across all posts. Zero for an empty list.
pub fn total_likes(posts: &[BlogPost]) -> u64 {
    posts.iter().map(|post| u64::from(post.likes)).sum()
}

/// The post with the most likes.
pub fn favorite_blog(posts: &[BlogPost]) -> Result<Favorite> {
    let mut iter = posts.iter();
    let first = iter.next().ok_or(StatsError::EmptyInput)?;

    // Strict comparison keeps the earliest post on ties.
    let best = iter.fold(first, |best, post| {
        if post.likes > best.likes {
            post
        } else {
            best
        }
    });

    Ok(Favorite::from(best))
}

/// The author who wrote the most posts.
pub fn most_blogs(posts: &[BlogPost]) -> Result<AuthorBlogs> {
    let tallies = tally_by_author(posts);
    first_max_by_key(&tallies, |tally| tally.blogs as u64)
        .map(AuthorBlogs::from)
        .ok_or(StatsError::EmptyInput)
}

/// The author whose posts have the most likes in total.
pub fn most_likes(posts: &[BlogPost]) -> Result<AuthorLikes> {
    let tallies = tally_by_author(posts);
    first_max_by_key(&tallies, |tally| tally.likes)
        .map(AuthorLikes::from)
        .ok_or(StatsError::EmptyInput)
}

/// Count posts and sum likes per author, in order of first appearance.
pub fn tally_by_author(posts: &[BlogPost]) -> Vec<AuthorTally> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<AuthorTally> = Vec::new();

    for post in posts {
        let slot = *slots.entry(post.author.as_str()).or_insert_with(|| {
            tallies.push(AuthorTally::new(post.author.as_str()));
            tallies.len() - 1
        });

        let tally = &mut tallies[slot];
        tally.blogs += 1;
        tally.likes += u64::from(post.likes);
    }

    tallies
}

/// The `n` authors with the most posts, highest first.
pub fn top_authors_by_blogs(posts: &[BlogPost], n: usize) -> Vec<AuthorTally> {
    let mut tallies = tally_by_author(posts);
    // sort_by_key is stable, so equal counts stay in first-seen order
    tallies.sort_by_key(|tally| Reverse(tally.blogs));
    tallies.truncate(n);
    tallies
}

/// The `n` authors with the most likes, highest first.
pub fn top_authors_by_likes(posts: &[BlogPost], n: usize) -> Vec<AuthorTally> {
    let mut tallies = tally_by_author(posts);
    tallies.sort_by_key(|tally| Reverse(tally.likes));
    tallies.truncate(n);
    tallies
}

/// Compute every statistic at once.
///
/// Unlike the individual functions, an empty list is not an error here: the
/// best-of fields are simply `None`.
pub fn compute_stats(posts: &[BlogPost]) -> BlogStats {
    BlogStats {
        total_posts: posts.len(),
        total_likes: total_likes(posts),
        favorite: favorite_blog(posts).ok(),
        most_blogs: most_blogs(posts).ok(),
        most_likes: most_likes(posts).ok(),
        authors: tally_by_author(posts),
    }
}

fn first_max_by_key<F>(tallies: &[AuthorTally], key: F) -> Option<&AuthorTally>
where
    F: Fn(&AuthorTally) -> u64,
{
    let mut best: Option<&AuthorTally> = None;

    for tally in tallies {
        match best {
            Some(current) if key(tally) <= key(current) => {}
            _ => best = Some(tally),
        }
    }

    best
}
