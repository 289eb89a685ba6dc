//! Display indexes for posts.
//!
//! Server ids are opaque, so listings number posts `1, 2, 3...` in the order
//! the API returns them and commands accept either that number or an id.
//! A bare number is always read as an index; use `id:<id>` to address a post
//! whose id happens to be numeric.

use crate::model::Post;
use std::fmt;
use std::str::FromStr;

const ID_PREFIX: &str = "id:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostSelector {
    Index(usize),
    Id(String),
}

impl fmt::Display for PostSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostSelector::Index(i) => write!(f, "{}", i),
            PostSelector::Id(id) => write!(f, "{}{}", ID_PREFIX, id),
        }
    }
}

impl FromStr for PostSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty post selector".to_string());
        }
        if let Some(id) = s.strip_prefix(ID_PREFIX) {
            if id.is_empty() {
                return Err(format!("Missing id after '{}'", ID_PREFIX));
            }
            return Ok(PostSelector::Id(id.to_string()));
        }
        match s.parse::<usize>() {
            Ok(0) => Err("Indexes start at 1".to_string()),
            Ok(n) => Ok(PostSelector::Index(n)),
            Err(_) => Ok(PostSelector::Id(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplayPost {
    pub index: usize,
    pub post: Post,
}

/// Numbers posts from 1 in the order given.
pub fn index_posts(posts: Vec<Post>) -> Vec<DisplayPost> {
    posts
        .into_iter()
        .enumerate()
        .map(|(i, post)| DisplayPost { index: i + 1, post })
        .collect()
}
