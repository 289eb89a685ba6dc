//! Tag catalogue for posts.
//!
//! The editor only offers tags from a fixed catalogue (kept in config), so a
//! post can never carry a tag the blog does not know about. Catalogue names
//! must:
//! - start with an ASCII letter
//! - contain only ASCII alphanumerics, `_` and `-`
//! - not contain `--` or end with `-`

use crate::error::{BlogError, Result};
use thiserror::Error;

pub const DEFAULT_TAGS: [&str; 3] = ["Coding", "System_Architecture", "Book"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagNameError {
    #[error("tag name cannot be empty")]
    Empty,
    #[error("tag name must start with a letter, found '{0}'")]
    InvalidStart(char),
    #[error("tag name cannot end with a hyphen")]
    TrailingHyphen,
    #[error("tag name cannot contain consecutive hyphens")]
    DoubleHyphen,
    #[error("tag name contains invalid character '{0}'")]
    InvalidCharacter(char),
}

pub fn validate_tag_name(name: &str) -> std::result::Result<(), TagNameError> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(TagNameError::Empty)?;
    if !first.is_ascii_alphabetic() {
        return Err(TagNameError::InvalidStart(first));
    }

    let mut prev = first;
    for ch in chars {
        if !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-') {
            return Err(TagNameError::InvalidCharacter(ch));
        }
        if ch == '-' && prev == '-' {
            return Err(TagNameError::DoubleHyphen);
        }
        prev = ch;
    }

    if prev == '-' {
        return Err(TagNameError::TrailingHyphen);
    }
    Ok(())
}

/// The set of tags a post may be given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCatalog {
    tags: Vec<String>,
}

impl TagCatalog {
    /// Builds a catalogue, rejecting invalid names and dropping repeats.
    pub fn new<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self { tags: Vec::new() };
        for tag in tags {
            let tag = tag.into();
            validate_tag_name(&tag).map_err(|e| BlogError::InvalidTag {
                name: tag.clone(),
                reason: e.to_string(),
            })?;
            if !catalog.contains(&tag) {
                catalog.tags.push(tag);
            }
        }
        Ok(catalog)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Checks a user selection against the catalogue.
    ///
    /// Order of first appearance is kept; repeated picks collapse into one.
    pub fn select<I, S>(&self, selection: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected: Vec<String> = Vec::new();
        for tag in selection {
            let tag = tag.as_ref();
            if !self.contains(tag) {
                return Err(BlogError::InvalidTag {
                    name: tag.to_string(),
                    reason: format!("not one of: {}", self.tags.join(", ")),
                });
            }
            if !selected.iter().any(|t| t == tag) {
                selected.push(tag.to_string());
            }
        }
        Ok(selected)
    }
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}
