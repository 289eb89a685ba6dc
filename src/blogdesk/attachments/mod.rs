//! # Attachment Reconciliation
//!
//! An edit session works on a copy of a post's image attachments. The user can
//! add new images and remove old ones; on submit the server needs to know
//! exactly which persisted images to keep, which to drop, and which files to
//! upload. [`AttachmentSet`] tracks that working copy and produces the
//! three-way [`AttachmentDiff`].
//!
//! ## Origins
//!
//! Every [`Attachment`] is either:
//! - [`Origin::Existing`]: persisted on the server, identified by its path.
//!   Removing it only sets a deletion mark, so the diff can still report it
//!   under `deleted`.
//! - [`Origin::New`]: picked locally during this session, identified by a
//!   generated `local:<uuid>` handle. Removing it drops it outright since the
//!   server never saw it.
//!
//! ## Ordering
//!
//! Entries keep insertion order: existing entries in the order the server
//! returned them, new entries appended as they are added. `visible()` and
//! every list in the diff preserve that order.
//!
//! ## Preview resources
//!
//! New entries hold a preview handle (a `blob:` URL by default) acquired from
//! a [`PreviewRegistry`]. The set owns the registry and releases each handle
//! exactly once: when the entry is removed, when the set is reseeded, or when
//! the set is dropped.
//!
//! ## Example
//!
//! ```
//! use blogdesk::attachments::AttachmentSet;
//! use blogdesk::model::LocalFile;
//!
//! let mut set = AttachmentSet::new("https://cdn.example/");
//! set.seed(["img/a.png", "img/b.png"]);
//! set.add_new([LocalFile::from_bytes("c.png", vec![0u8; 8])]);
//! set.remove("img/a.png");
//!
//! let diff = set.compute_diff();
//! assert_eq!(diff.unchanged, vec!["img/b.png"]);
//! assert_eq!(diff.deleted, vec!["img/a.png"]);
//! assert_eq!(diff.added.len(), 1);
//! ```

mod object_urls;

pub use object_urls::ObjectUrls;

use crate::model::LocalFile;
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

const LOCAL_ID_PREFIX: &str = "local:";

/// Issues and reclaims display handles for files that exist only locally.
pub trait PreviewRegistry {
    /// Registers `file` and returns a handle the view layer can display.
    fn acquire(&mut self, file: &LocalFile) -> String;

    /// Frees a handle. Unknown handles are ignored.
    fn release(&mut self, source: &str);

    /// Looks up the file behind a live handle.
    fn resolve(&self, source: &str) -> Option<&LocalFile>;
}

/// Resolves a persisted attachment path to a fetchable URL.
///
/// Plain concatenation: the base is expected to carry its own trailing
/// separator and no normalisation is applied.
pub fn resolve_url(cdn_base: &str, path: &str) -> String {
    format!("{}{}", cdn_base, path)
}

/// Stable key of an attachment within one edit session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttachmentId(String);

impl AttachmentId {
    fn existing(path: &str) -> Self {
        Self(path.to_string())
    }

    fn local() -> Self {
        Self(format!("{}{}", LOCAL_ID_PREFIX, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Existing,
    New,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Path(String),
    File(LocalFile),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    id: AttachmentId,
    origin: Origin,
    payload: Payload,
    preview_source: String,
    deletion_marked: bool,
}

impl Attachment {
    pub fn id(&self) -> &AttachmentId {
        &self.id
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Server path for existing attachments.
    pub fn path(&self) -> Option<&str> {
        match &self.payload {
            Payload::Path(path) => Some(path),
            Payload::File(_) => None,
        }
    }

    /// Local file for new attachments.
    pub fn file(&self) -> Option<&LocalFile> {
        match &self.payload {
            Payload::File(file) => Some(file),
            Payload::Path(_) => None,
        }
    }

    pub fn preview_source(&self) -> &str {
        &self.preview_source
    }

    pub fn is_deletion_marked(&self) -> bool {
        self.deletion_marked
    }

    /// A short label for listings: the path, or the picked file's name.
    pub fn label(&self) -> &str {
        match &self.payload {
            Payload::Path(path) => path,
            Payload::File(file) => file.file_name(),
        }
    }
}

/// The attachment changes of one submission, borrowed from an [`AttachmentSet`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttachmentDiff<'a> {
    pub unchanged: Vec<&'a str>,
    pub deleted: Vec<&'a str>,
    pub added: Vec<&'a LocalFile>,
}

impl AttachmentDiff<'_> {
    pub fn has_changes(&self) -> bool {
        !self.deleted.is_empty() || !self.added.is_empty()
    }
}

/// Working set of attachments for one edit session.
pub struct AttachmentSet<R: PreviewRegistry = ObjectUrls> {
    entries: Vec<Attachment>,
    cdn_base: String,
    registry: R,
}

impl AttachmentSet<ObjectUrls> {
    pub fn new(cdn_base: impl Into<String>) -> Self {
        Self::with_registry(cdn_base, ObjectUrls::new())
    }
}

impl<R: PreviewRegistry> AttachmentSet<R> {
    pub fn with_registry(cdn_base: impl Into<String>, registry: R) -> Self {
        Self {
            entries: Vec::new(),
            cdn_base: cdn_base.into(),
            registry,
        }
    }

    /// Replaces the set with the server's persisted attachments.
    ///
    /// Any previous entries are discarded first and their preview handles
    /// released. Repeated paths keep their first occurrence only.
    pub fn seed<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clear();

        let mut seen = HashSet::new();
        for path in paths {
            let path = path.into();
            if !seen.insert(path.clone()) {
                tracing::warn!(%path, "duplicate attachment path from server ignored");
                continue;
            }
            self.entries.push(Attachment {
                id: AttachmentId::existing(&path),
                origin: Origin::Existing,
                preview_source: resolve_url(&self.cdn_base, &path),
                payload: Payload::Path(path),
                deletion_marked: false,
            });
        }
        tracing::debug!(count = self.entries.len(), "attachment set seeded");
    }

    /// Appends one new attachment per file and returns their identities.
    pub fn add_new<I>(&mut self, files: I) -> Vec<AttachmentId>
    where
        I: IntoIterator<Item = LocalFile>,
    {
        let mut ids = Vec::new();
        for file in files {
            let id = self.fresh_local_id();
            let preview_source = self.registry.acquire(&file);
            tracing::debug!(%id, file = file.file_name(), "attachment added");
            self.entries.push(Attachment {
                id: id.clone(),
                origin: Origin::New,
                payload: Payload::File(file),
                preview_source,
                deletion_marked: false,
            });
            ids.push(id);
        }
        ids
    }

    /// Removes an attachment: new entries are dropped, existing ones marked.
    ///
    /// Unknown identities are ignored.
    pub fn remove(&mut self, id: &str) {
        let Some(pos) = self.position(id) else {
            tracing::debug!(id, "remove of unknown attachment ignored");
            return;
        };

        match self.entries[pos].origin {
            Origin::New => {
                let entry = self.entries.remove(pos);
                self.registry.release(&entry.preview_source);
                tracing::debug!(id, "new attachment dropped");
            }
            Origin::Existing => {
                self.entries[pos].deletion_marked = true;
                tracing::debug!(id, "existing attachment marked for deletion");
            }
        }
    }

    /// Clears the deletion mark of an existing attachment.
    ///
    /// Unknown identities and new attachments are ignored.
    pub fn restore(&mut self, id: &str) {
        if let Some(pos) = self.position(id) {
            let entry = &mut self.entries[pos];
            if entry.origin == Origin::Existing && entry.deletion_marked {
                entry.deletion_marked = false;
                tracing::debug!(id, "attachment restored");
            }
        }
    }

    /// Attachments the user still sees, in set order.
    pub fn visible(&self) -> Vec<&Attachment> {
        self.entries.iter().filter(|a| !a.deletion_marked).collect()
    }

    /// Partitions the set into the update payload. Does not change the set.
    pub fn compute_diff(&self) -> AttachmentDiff<'_> {
        let mut diff = AttachmentDiff::default();
        for entry in &self.entries {
            match (&entry.payload, entry.deletion_marked) {
                (Payload::Path(path), false) => diff.unchanged.push(path.as_str()),
                (Payload::Path(path), true) => diff.deleted.push(path.as_str()),
                (Payload::File(file), _) => diff.added.push(file),
            }
        }
        diff
    }

    pub fn get(&self, id: &str) -> Option<&Attachment> {
        self.position(id).map(|pos| &self.entries[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// All entries, including those marked for deletion.
    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cdn_base(&self) -> &str {
        &self.cdn_base
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|a| a.id.as_str() == id)
    }

    fn fresh_local_id(&self) -> AttachmentId {
        loop {
            let id = AttachmentId::local();
            if !self.contains(id.as_str()) {
                return id;
            }
        }
    }

    fn clear(&mut self) {
        for entry in self.entries.drain(..) {
            if entry.origin == Origin::New {
                self.registry.release(&entry.preview_source);
            }
        }
    }
}

impl<R: PreviewRegistry> Drop for AttachmentSet<R> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<R: PreviewRegistry> fmt::Debug for AttachmentSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentSet")
            .field("entries", &self.entries)
            .field("cdn_base", &self.cdn_base)
            .finish()
    }
}
