use crate::attachments::AttachmentDiff;
use crate::config::BlogConfig;
use crate::index::DisplayPost;
use crate::model::{LocalFile, Post};
use crate::preview::PostPreview;

pub mod config;
pub mod create;
pub mod delete;
pub mod edit;
pub mod helpers;
pub mod list;
pub mod preview;
pub mod view;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Owned copy of an [`AttachmentDiff`] for reporting after the session is gone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub unchanged: Vec<String>,
    pub deleted: Vec<String>,
    pub added: Vec<String>,
}

impl From<&AttachmentDiff<'_>> for DiffSummary {
    fn from(diff: &AttachmentDiff<'_>) -> Self {
        Self {
            unchanged: diff.unchanged.iter().map(|p| p.to_string()).collect(),
            deleted: diff.deleted.iter().map(|p| p.to_string()).collect(),
            added: diff.added.iter().map(|f| f.file_name().to_string()).collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_posts: Vec<Post>,
    pub listed_posts: Vec<DisplayPost>,
    pub diff: Option<DiffSummary>,
    pub preview: Option<PostPreview>,
    pub config: Option<BlogConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_posts(mut self, posts: Vec<Post>) -> Self {
        self.affected_posts = posts;
        self
    }

    pub fn with_listed_posts(mut self, posts: Vec<DisplayPost>) -> Self {
        self.listed_posts = posts;
        self
    }

    pub fn with_diff(mut self, diff: DiffSummary) -> Self {
        self.diff = Some(diff);
        self
    }

    pub fn with_preview(mut self, preview: PostPreview) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn with_config(mut self, config: BlogConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Fields of a post to write when creating one.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub tags: Vec<String>,
    pub files: Vec<LocalFile>,
}

/// Requested changes to an existing post. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub text: Option<String>,
    pub published: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub add_files: Vec<LocalFile>,
    pub remove: Vec<String>,
    pub restore: Vec<String>,
}

/// What to do with an edit once it has been applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Submit,
    /// Report the attachment diff without contacting the store again.
    DryRun,
    /// Return a preview of the edited post without submitting.
    Preview,
}
