use crate::auth::BearerToken;
use crate::error::{BlogError, Result};
use crate::index::{index_posts, DisplayPost, PostSelector};
use crate::store::PostStore;

pub fn indexed_posts<S: PostStore>(store: &S, token: Option<&BearerToken>) -> Result<Vec<DisplayPost>> {
    let posts = store.posts(token)?;
    Ok(index_posts(posts))
}

pub fn posts_by_selectors<S: PostStore>(
    store: &S,
    token: Option<&BearerToken>,
    selectors: &[PostSelector],
) -> Result<Vec<DisplayPost>> {
    let indexed = indexed_posts(store, token)?;

    selectors
        .iter()
        .map(|selector| {
            indexed
                .iter()
                .find(|dp| match selector {
                    PostSelector::Index(i) => dp.index == *i,
                    PostSelector::Id(id) => &dp.post.id == id,
                })
                .cloned()
                .ok_or_else(|| match selector {
                    PostSelector::Id(id) => BlogError::PostNotFound(id.clone()),
                    PostSelector::Index(i) => {
                        BlogError::Api(format!("Index {} not found ({} posts)", i, indexed.len()))
                    }
                })
        })
        .collect()
}

pub fn post_by_selector<S: PostStore>(
    store: &S,
    token: Option<&BearerToken>,
    selector: &PostSelector,
) -> Result<DisplayPost> {
    let mut found = posts_by_selectors(store, token, std::slice::from_ref(selector))?;
    Ok(found.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn resolves_index_and_id() {
        let store = StoreFixture::new().with_posts(3).store;
        let found = posts_by_selectors(
            &store,
            None,
            &[PostSelector::Index(3), PostSelector::Id("0".into())],
        )
        .unwrap();
        assert_eq!(found[0].post.title, "Test Post 3");
        assert_eq!(found[1].index, 1);
    }

    #[test]
    fn missing_index_is_error() {
        let store = StoreFixture::new().with_posts(1).store;
        let err = post_by_selector(&store, None, &PostSelector::Index(5)).unwrap_err();
        assert!(err.to_string().contains("Index 5"));
    }

    #[test]
    fn missing_id_is_not_found() {
        let store = StoreFixture::new().with_posts(1).store;
        let err = post_by_selector(&store, None, &PostSelector::Id("zz".into())).unwrap_err();
        assert!(matches!(err, BlogError::PostNotFound(id) if id == "zz"));
    }
}
