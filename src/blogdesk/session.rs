//! # Editor sessions
//!
//! An [`EditSession`] holds everything the post editor shows for one post:
//! title, text, published flag, tags and the [`AttachmentSet`]. Each user
//! action is a method; nothing outside the struct holds editor state.
//!
//! ## Submission
//!
//! `submit` builds the `editPost` input from the current state, with the
//! attachment lists taken straight from [`AttachmentSet::compute_diff`].
//! - On success the session reloads from the post the server returned, so
//!   the working set again mirrors what is persisted.
//! - On failure nothing is touched. The caller gets
//!   [`BlogError::SubmissionFailed`] and may call `submit` again; the retry
//!   sends the same diff, including the same new files.
//!
//! [`Draft`] is the create-post counterpart. Its attachment set only ever
//! holds new files.

use crate::attachments::{AttachmentId, AttachmentSet};
use crate::auth::BearerToken;
use crate::error::{BlogError, Result};
use crate::model::{LocalFile, NewPost, Post, PostEdit};
use crate::preview::PostPreview;
use crate::store::PostStore;
use crate::tags::TagCatalog;

#[derive(Debug)]
pub struct EditSession {
    post_id: String,
    title: String,
    text: String,
    published: bool,
    tags: Vec<String>,
    catalog: TagCatalog,
    attachments: AttachmentSet,
}

impl EditSession {
    pub fn open(post: &Post, catalog: TagCatalog, cdn_base: &str) -> Self {
        let mut session = Self {
            post_id: post.id.clone(),
            title: String::new(),
            text: String::new(),
            published: false,
            tags: Vec::new(),
            catalog,
            attachments: AttachmentSet::new(cdn_base),
        };
        session.load(post);
        session
    }

    fn load(&mut self, post: &Post) {
        self.post_id = post.id.clone();
        self.title = post.title.clone();
        self.text = post.text.clone();
        self.published = post.published;
        self.tags = post.tags.clone();
        self.attachments.seed(post.attachments.iter().cloned());
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn attachments(&self) -> &AttachmentSet {
        &self.attachments
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_published(&mut self, published: bool) {
        self.published = published;
    }

    /// Replaces the tag selection. An unknown tag rejects the whole selection.
    pub fn select_tags<I, S>(&mut self, selection: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = self.catalog.select(selection)?;
        Ok(())
    }

    pub fn add_files<I>(&mut self, files: I) -> Vec<AttachmentId>
    where
        I: IntoIterator<Item = LocalFile>,
    {
        self.attachments.add_new(files)
    }

    pub fn remove_attachment(&mut self, id: &str) {
        self.attachments.remove(id);
    }

    pub fn restore_attachment(&mut self, id: &str) {
        self.attachments.restore(id);
    }

    pub fn edit_input(&self) -> PostEdit<'_> {
        let diff = self.attachments.compute_diff();
        PostEdit {
            id: &self.post_id,
            published: self.published,
            title: &self.title,
            text: &self.text,
            tags: &self.tags,
            unchanged_attachments: diff.unchanged,
            new_attachments: diff.added,
            deleted_attachments: diff.deleted,
        }
    }

    pub fn submit<S: PostStore>(&mut self, store: &mut S, token: &BearerToken) -> Result<Post> {
        let outcome = {
            let edit = self.edit_input();
            tracing::info!(
                post = edit.id,
                kept = edit.unchanged_attachments.len(),
                added = edit.new_attachments.len(),
                deleted = edit.deleted_attachments.len(),
                "submitting post edit"
            );
            store.edit_post(&edit, token)
        };

        match outcome {
            Ok(post) => {
                self.load(&post);
                Ok(post)
            }
            Err(e) => {
                tracing::warn!(post = %self.post_id, error = %e, "post edit failed, session kept");
                Err(BlogError::submission(e))
            }
        }
    }

    pub fn preview(&self) -> PostPreview {
        PostPreview::from_draft(&self.title, &self.text, &self.tags, &self.attachments)
    }
}

#[derive(Debug)]
pub struct Draft {
    title: String,
    text: String,
    tags: Vec<String>,
    catalog: TagCatalog,
    attachments: AttachmentSet,
}

impl Draft {
    pub fn new(catalog: TagCatalog, cdn_base: &str) -> Self {
        Self {
            title: String::new(),
            text: String::new(),
            tags: Vec::new(),
            catalog,
            attachments: AttachmentSet::new(cdn_base),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn attachments(&self) -> &AttachmentSet {
        &self.attachments
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn select_tags<I, S>(&mut self, selection: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = self.catalog.select(selection)?;
        Ok(())
    }

    pub fn add_files<I>(&mut self, files: I) -> Vec<AttachmentId>
    where
        I: IntoIterator<Item = LocalFile>,
    {
        self.attachments.add_new(files)
    }

    pub fn remove_attachment(&mut self, id: &str) {
        self.attachments.remove(id);
    }

    pub fn new_post(&self) -> NewPost<'_> {
        NewPost {
            title: &self.title,
            text: &self.text,
            tags: &self.tags,
            attachments: self.attachments.compute_diff().added,
        }
    }

    /// Creates the post. On success the draft is emptied; on failure it is kept.
    pub fn submit<S: PostStore>(&mut self, store: &mut S, token: &BearerToken) -> Result<Post> {
        let outcome = {
            let post = self.new_post();
            tracing::info!(attachments = post.attachments.len(), "submitting new post");
            store.create_post(&post, token)
        };

        match outcome {
            Ok(post) => {
                self.title.clear();
                self.text.clear();
                self.tags.clear();
                self.attachments.seed(Vec::<String>::new());
                Ok(post)
            }
            Err(e) => {
                tracing::warn!(error = %e, "post creation failed, draft kept");
                Err(BlogError::submission(e))
            }
        }
    }

    pub fn preview(&self) -> PostPreview {
        PostPreview::from_draft(&self.title, &self.text, &self.tags, &self.attachments)
    }
}
