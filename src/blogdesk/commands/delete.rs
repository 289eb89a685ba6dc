use crate::auth::BearerToken;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::PostSelector;
use crate::store::PostStore;

use super::helpers::posts_by_selectors;
use std::collections::HashSet;

pub fn run<S: PostStore>(
    store: &mut S,
    token: &BearerToken,
    selectors: &[PostSelector],
) -> Result<CmdResult> {
    // Resolve everything up front so indexes don't shift between deletions.
    let mut targets = posts_by_selectors(store, Some(token), selectors)?;
    let mut seen = HashSet::new();
    targets.retain(|dp| seen.insert(dp.post.id.clone()));
    let mut result = CmdResult::default();

    for dp in targets {
        let deleted = store.delete_post(&dp.post.id, token)?;
        result.add_message(CmdMessage::success(format!(
            "Post deleted ({}): {}",
            dp.index, deleted.title
        )));
        result.affected_posts.push(deleted);
    }

    Ok(result)
}
