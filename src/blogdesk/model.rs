use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// A post as returned by the blog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    // Relative paths, resolved against the CDN base for display
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<String>,
}

impl Post {
    pub fn new(id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            published: false,
            title: title.into(),
            text: text.into(),
            tags: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.published {
            "Published"
        } else {
            "Draft"
        }
    }
}

/// GraphQL sends `null` for absent lists and scalars; treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A file picked by the user for upload.
///
/// Bytes are shared, so cloning a `LocalFile` (for a retry or a preview)
/// never copies the payload.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    file_name: String,
    content_type: String,
    bytes: Arc<[u8]>,
}

impl LocalFile {
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name);
        Self {
            file_name,
            content_type,
            bytes: Arc::from(bytes.into()),
        }
    }

    /// Reads a file from disk, keeping only its final path component as the upload name.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn guess_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Input for the `createPost` mutation.
#[derive(Debug, Clone)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub tags: &'a [String],
    pub attachments: Vec<&'a LocalFile>,
}

/// Input for the `editPost` mutation.
///
/// The three attachment lists together describe how the server's attachment
/// set should change: keep `unchanged_attachments`, drop
/// `deleted_attachments`, upload `new_attachments`.
#[derive(Debug, Clone)]
pub struct PostEdit<'a> {
    pub id: &'a str,
    pub published: bool,
    pub title: &'a str,
    pub text: &'a str,
    pub tags: &'a [String],
    pub unchanged_attachments: Vec<&'a str>,
    pub new_attachments: Vec<&'a LocalFile>,
    pub deleted_attachments: Vec<&'a str>,
}
