//! # Post Store
//!
//! The blog's posts live behind a remote GraphQL API. [`PostStore`] is the
//! seam between blogdesk's logic and that API so the logic can be exercised
//! without a network.
//!
//! ## Implementations
//!
//! - [`graphql::GraphqlStore`]: the production client. Posts JSON requests to
//!   the configured endpoint and switches to a multipart body whenever files
//!   are uploaded.
//! - [`memory::InMemoryStore`]: keeps posts in a `Vec`, assigns ids and
//!   upload paths the way the server does, and can be told to require a
//!   token or to fail the next mutation.
//!
//! ## Authentication
//!
//! Mutations always take a [`BearerToken`]. Reads take an optional one since
//! the post listing is also served to anonymous clients.

use crate::auth::BearerToken;
use crate::error::Result;
use crate::model::{NewPost, Post, PostEdit};

pub mod graphql;
pub mod memory;

pub trait PostStore {
    /// List every post visible to the caller.
    fn posts(&self, token: Option<&BearerToken>) -> Result<Vec<Post>>;

    /// Create a post, uploading its attachments.
    fn create_post(&mut self, post: &NewPost<'_>, token: &BearerToken) -> Result<Post>;

    /// Apply an edit, including the attachment diff, and return the stored post.
    fn edit_post(&mut self, edit: &PostEdit<'_>, token: &BearerToken) -> Result<Post>;

    /// Delete a post and return it as it was.
    fn delete_post(&mut self, id: &str, token: &BearerToken) -> Result<Post>;
}
