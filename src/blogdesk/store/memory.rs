use super::PostStore;
use crate::auth::BearerToken;
use crate::error::{BlogError, Result};
use crate::model::{LocalFile, NewPost, Post, PostEdit};
use std::collections::HashMap;

/// In-memory post storage for testing and offline use.
/// Does NOT persist data.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    posts: Vec<Post>,
    uploads: HashMap<String, LocalFile>,
    next_id: u64,
    next_upload: u64,
    required_token: Option<String>,
    fail_next: Option<String>,
    mutations: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject mutations whose token differs from `token`.
    pub fn with_required_token(mut self, token: impl Into<String>) -> Self {
        self.required_token = Some(token.into());
        self
    }

    /// Make the next mutation fail with a store error, then behave normally.
    pub fn fail_next_mutation(&mut self, message: impl Into<String>) {
        self.fail_next = Some(message.into());
    }

    /// Insert a post as if it had been persisted earlier.
    pub fn insert(&mut self, post: Post) {
        self.next_id = self
            .next_id
            .max(post.id.parse::<u64>().map(|n| n + 1).unwrap_or(0));
        self.posts.push(post);
    }

    pub fn uploaded(&self, path: &str) -> Option<&LocalFile> {
        self.uploads.get(path)
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.len()
    }

    /// Number of mutations that reached the store (successful or not).
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    fn authorize(&mut self, token: &BearerToken) -> Result<()> {
        self.mutations += 1;
        if let Some(message) = self.fail_next.take() {
            return Err(BlogError::Store(message));
        }
        match &self.required_token {
            Some(required) if required != token.as_str() => Err(BlogError::Unauthenticated),
            _ => Ok(()),
        }
    }

    fn upload(&mut self, post_id: &str, file: &LocalFile) -> String {
        self.next_upload += 1;
        let path = format!("posts/{}/{}-{}", post_id, self.next_upload, file.file_name());
        self.uploads.insert(path.clone(), file.clone());
        path
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| BlogError::PostNotFound(id.to_string()))
    }
}

impl PostStore for InMemoryStore {
    fn posts(&self, _token: Option<&BearerToken>) -> Result<Vec<Post>> {
        Ok(self.posts.clone())
    }

    fn create_post(&mut self, post: &NewPost<'_>, token: &BearerToken) -> Result<Post> {
        self.authorize(token)?;

        let id = self.next_id.to_string();
        self.next_id += 1;

        let mut created = Post::new(id.clone(), post.title, post.text);
        created.tags = post.tags.to_vec();
        for file in &post.attachments {
            let path = self.upload(&id, file);
            created.attachments.push(path);
        }

        self.posts.push(created.clone());
        Ok(created)
    }

    fn edit_post(&mut self, edit: &PostEdit<'_>, token: &BearerToken) -> Result<Post> {
        self.authorize(token)?;
        let pos = self.position(edit.id)?;

        let current = &self.posts[pos].attachments;
        for path in edit
            .unchanged_attachments
            .iter()
            .chain(edit.deleted_attachments.iter())
        {
            if !current.iter().any(|p| p == path) {
                return Err(BlogError::Store(format!(
                    "attachment {} does not belong to post {}",
                    path, edit.id
                )));
            }
        }

        // Kept paths first in the order given, then anything the edit did not mention.
        let mut attachments: Vec<String> = edit
            .unchanged_attachments
            .iter()
            .map(|p| p.to_string())
            .collect();
        for path in current {
            let mentioned = edit.unchanged_attachments.contains(&path.as_str())
                || edit.deleted_attachments.contains(&path.as_str());
            if !mentioned {
                attachments.push(path.clone());
            }
        }
        for path in &edit.deleted_attachments {
            self.uploads.remove(*path);
        }
        for file in &edit.new_attachments {
            let path = self.upload(edit.id, file);
            attachments.push(path);
        }

        let post = &mut self.posts[pos];
        post.published = edit.published;
        post.title = edit.title.to_string();
        post.text = edit.text.to_string();
        post.tags = edit.tags.to_vec();
        post.attachments = attachments;
        Ok(post.clone())
    }

    fn delete_post(&mut self, id: &str, token: &BearerToken) -> Result<Post> {
        self.authorize(token)?;
        let pos = self.position(id)?;
        let post = self.posts.remove(pos);
        for path in &post.attachments {
            self.uploads.remove(path);
        }
        Ok(post)
    }
}

// --- Test Fixtures ---


#[cfg(test)]
mod tests {
    use super::fixtures::{token, StoreFixture};
    use super::*;

    #[test]
    fn create_assigns_ids_and_upload_paths() {
        let mut store = InMemoryStore::new();
        let file = LocalFile::from_bytes("cat.png", vec![1, 2]);
        let tags = vec!["Book".to_string()];
        let created = store
            .create_post(
                &NewPost {
                    title: "Hello",
                    text: "World",
                    tags: &tags,
                    attachments: vec![&file],
                },
                &token(),
            )
            .unwrap();

        assert_eq!(created.id, "0");
        assert_eq!(created.attachments.len(), 1);
        assert!(created.attachments[0].ends_with("cat.png"));
        assert_eq!(store.uploaded(&created.attachments[0]), Some(&file));
        assert_eq!(store.posts(None).unwrap().len(), 1);
    }

    #[test]
    fn edit_applies_attachment_diff() {
        let mut store = StoreFixture::new()
            .with_post("Trip", &["img/a.png", "img/b.png"])
            .store;
        let file = LocalFile::from_bytes("c.png", vec![9]);
        let edit = PostEdit {
            id: "0",
            published: true,
            title: "Trip!",
            text: "new text",
            tags: &[],
            unchanged_attachments: vec!["img/b.png"],
            new_attachments: vec![&file],
            deleted_attachments: vec!["img/a.png"],
        };

        let post = store.edit_post(&edit, &token()).unwrap();

        assert_eq!(post.title, "Trip!");
        assert!(post.published);
        assert_eq!(post.attachments.len(), 2);
        assert_eq!(post.attachments[0], "img/b.png");
        assert!(store.uploaded("img/a.png").is_none());
    }

    #[test]
    fn edit_rejects_foreign_attachment() {
        let mut store = StoreFixture::new().with_post("Trip", &["img/a.png"]).store;
        let edit = PostEdit {
            id: "0",
            published: false,
            title: "Trip",
            text: "",
            tags: &[],
            unchanged_attachments: vec!["img/zzz.png"],
            new_attachments: vec![],
            deleted_attachments: vec![],
        };
        assert!(matches!(
            store.edit_post(&edit, &token()),
            Err(BlogError::Store(_))
        ));
    }

    #[test]
    fn edit_unknown_post_is_not_found() {
        let mut store = InMemoryStore::new();
        let edit = PostEdit {
            id: "42",
            published: false,
            title: "",
            text: "",
            tags: &[],
            unchanged_attachments: vec![],
            new_attachments: vec![],
            deleted_attachments: vec![],
        };
        assert!(matches!(
            store.edit_post(&edit, &token()),
            Err(BlogError::PostNotFound(id)) if id == "42"
        ));
    }

    #[test]
    fn required_token_is_enforced() {
        let mut store = StoreFixture::new().with_posts(1).store.with_required_token("right");
        let wrong = BearerToken::new("wrong").unwrap();
        assert!(matches!(
            store.delete_post("0", &wrong),
            Err(BlogError::Unauthenticated)
        ));

        let right = BearerToken::new("right").unwrap();
        assert!(store.delete_post("0", &right).is_ok());
    }

    #[test]
    fn fail_next_mutation_fails_once() {
        let mut store = StoreFixture::new().with_posts(2).store;
        store.fail_next_mutation("boom");

        assert!(store.delete_post("0", &token()).is_err());
        assert!(store.delete_post("0", &token()).is_ok());
        assert_eq!(store.mutation_count(), 2);
        assert_eq!(store.posts(None).unwrap().len(), 1);
    }

    #[test]
    fn delete_drops_uploads() {
        let mut store = StoreFixture::new().with_post("P", &["x.png"]).store;
        let deleted = store.delete_post("0", &token()).unwrap();
        assert_eq!(deleted.title, "P");
        assert_eq!(store.upload_count(), 0);
    }
}
