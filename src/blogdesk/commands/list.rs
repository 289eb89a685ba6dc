use crate::auth::BearerToken;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::PostStore;

use super::helpers::indexed_posts;

pub fn run<S: PostStore>(
    store: &S,
    token: Option<&BearerToken>,
    published_only: bool,
) -> Result<CmdResult> {
    let posts = indexed_posts(store, token)?;
    let listed: Vec<_> = posts
        .into_iter()
        .filter(|dp| !published_only || dp.post.published)
        .collect();

    let mut result = CmdResult::default();
    if listed.is_empty() {
        result.add_message(CmdMessage::info("No posts found."));
    }
    Ok(result.with_listed_posts(listed))
}
