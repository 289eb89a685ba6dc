use crate::auth::BearerToken;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::PostSelector;
use crate::store::PostStore;

use super::helpers::posts_by_selectors;

pub fn run<S: PostStore>(
    store: &S,
    token: Option<&BearerToken>,
    selectors: &[PostSelector],
) -> Result<CmdResult> {
    let posts = posts_by_selectors(store, token, selectors)?;
    Ok(CmdResult::default().with_listed_posts(posts))
}
