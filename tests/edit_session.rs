use blogdesk::attachments::Origin;
use blogdesk::auth::BearerToken;
use blogdesk::error::BlogError;
use blogdesk::model::{LocalFile, Post};
use blogdesk::session::EditSession;
use blogdesk::store::memory::InMemoryStore;
use blogdesk::store::PostStore;
use blogdesk::tags::TagCatalog;

fn store_with_trip() -> InMemoryStore {
    let mut store = InMemoryStore::new().with_required_token("secret");
    let mut post = Post::new("7", "Trip", "We went places.");
    post.attachments = vec!["img/a.png".into(), "img/b.png".into()];
    store.insert(post);
    store
}

fn token() -> BearerToken {
    BearerToken::new("secret").unwrap()
}

#[test]
fn swap_one_image_for_a_new_one() {
    let mut store = store_with_trip();
    let post = store.posts(None).unwrap().remove(0);
    let mut session = EditSession::open(&post, TagCatalog::default(), "https://cdn.test/");

    session.add_files([LocalFile::from_bytes("c.png", vec![1, 2, 3])]);
    session.remove_attachment("img/a.png");

    let visible = session.attachments().visible();
    assert_eq!(visible.len(), 2);
    assert_eq!(visible[0].path(), Some("img/b.png"));
    assert_eq!(visible[1].origin(), Origin::New);

    let diff = session.attachments().compute_diff();
    assert_eq!(diff.unchanged, vec!["img/b.png"]);
    assert_eq!(diff.deleted, vec!["img/a.png"]);
    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.added[0].file_name(), "c.png");

    let saved = session.submit(&mut store, &token()).unwrap();
    assert_eq!(saved.attachments.len(), 2);
    assert_eq!(saved.attachments[0], "img/b.png");
    assert!(store.uploaded(&saved.attachments[1]).is_some());

    // The session now mirrors what was persisted.
    assert!(session
        .attachments()
        .iter()
        .all(|a| a.origin() == Origin::Existing));
    assert!(!session.attachments().compute_diff().has_changes());
}

#[test]
fn failed_submit_can_be_retried_unchanged() {
    let mut store = store_with_trip();
    let post = store.posts(None).unwrap().remove(0);
    let mut session = EditSession::open(&post, TagCatalog::default(), "https://cdn.test/");
    session.remove_attachment("img/b.png");

    let wrong = BearerToken::new("nope").unwrap();
    let err = session.submit(&mut store, &wrong).unwrap_err();
    assert!(matches!(err, BlogError::SubmissionFailed(_)));
    assert_eq!(session.attachments().compute_diff().deleted, vec!["img/b.png"]);

    let saved = session.submit(&mut store, &token()).unwrap();
    assert_eq!(saved.attachments, vec!["img/a.png"]);
}
