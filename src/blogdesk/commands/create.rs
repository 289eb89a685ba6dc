use crate::auth::BearerToken;
use crate::commands::{CmdMessage, CmdResult, PostDraft};
use crate::error::{BlogError, Result};
use crate::session::Draft;
use crate::store::PostStore;
use crate::tags::TagCatalog;

pub fn run<S: PostStore>(
    store: &mut S,
    token: &BearerToken,
    catalog: TagCatalog,
    cdn_base: &str,
    input: PostDraft,
) -> Result<CmdResult> {
    if input.title.trim().is_empty() {
        return Err(BlogError::Api("Title cannot be empty".into()));
    }

    let mut draft = Draft::new(catalog, cdn_base);
    draft.set_title(input.title);
    draft.set_text(input.text);
    draft.select_tags(&input.tags)?;
    draft.add_files(input.files);

    let post = draft.submit(store, token)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Post created ({}): {}",
        post.id, post.title
    )));
    if !post.attachments.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "{} attachment(s) uploaded",
            post.attachments.len()
        )));
    }
    Ok(result.with_affected_posts(vec![post]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LocalFile;
    use crate::store::memory::fixtures::token;
    use crate::store::memory::InMemoryStore;

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.into(),
            text: "Body".into(),
            tags: vec!["Coding".into()],
            files: vec![LocalFile::from_bytes("a.png", vec![1])],
        }
    }

    #[test]
    fn creates_post_with_attachments() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, &token(), TagCatalog::default(), "cdn/", draft("Hello")).unwrap();

        let post = &result.affected_posts[0];
        assert_eq!(post.title, "Hello");
        assert_eq!(post.tags, vec!["Coding"]);
        assert_eq!(post.attachments.len(), 1);
        assert_eq!(store.upload_count(), 1);
    }

    #[test]
    fn rejects_blank_title() {
        let mut store = InMemoryStore::new();
        assert!(run(&mut store, &token(), TagCatalog::default(), "cdn/", draft("  ")).is_err());
        assert_eq!(store.mutation_count(), 0);
    }

    #[test]
    fn rejects_unknown_tag_before_submitting() {
        let mut store = InMemoryStore::new();
        let mut input = draft("Hello");
        input.tags = vec!["Poetry".into()];

        let err = run(&mut store, &token(), TagCatalog::default(), "cdn/", input).unwrap_err();
        assert!(matches!(err, BlogError::InvalidTag { .. }));
        assert_eq!(store.mutation_count(), 0);
    }
}
