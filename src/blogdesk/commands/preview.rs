use crate::auth::BearerToken;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::PostSelector;
use crate::preview::PostPreview;
use crate::store::PostStore;

use super::helpers::post_by_selector;

pub fn run<S: PostStore>(
    store: &S,
    token: Option<&BearerToken>,
    selector: &PostSelector,
    cdn_base: &str,
) -> Result<CmdResult> {
    let dp = post_by_selector(store, token, selector)?;
    let preview = PostPreview::from_post(&dp.post, cdn_base);
    Ok(CmdResult::default()
        .with_listed_posts(vec![dp])
        .with_preview(preview))
}
