use crate::auth::BearerToken;
use crate::commands::{CmdMessage, CmdResult, DiffSummary, EditMode, PostChanges};
use crate::error::{BlogError, Result};
use crate::index::PostSelector;
use crate::session::EditSession;
use crate::store::PostStore;
use crate::tags::TagCatalog;

use super::helpers::post_by_selector;

/// Opens an edit session on the selected post, applies `changes`, then
/// submits, reports the diff, or previews according to `mode`.
pub fn run<S: PostStore>(
    store: &mut S,
    token: Option<&BearerToken>,
    catalog: TagCatalog,
    cdn_base: &str,
    selector: &PostSelector,
    changes: PostChanges,
    mode: EditMode,
) -> Result<CmdResult> {
    let dp = post_by_selector(store, token, selector)?;
    let mut session = EditSession::open(&dp.post, catalog, cdn_base);
    let mut result = CmdResult::default();

    apply_changes(&mut session, changes, &mut result)?;

    if session.title().trim().is_empty() {
        return Err(BlogError::Api("Title cannot be empty".into()));
    }

    let diff = DiffSummary::from(&session.attachments().compute_diff());

    match mode {
        EditMode::DryRun => {
            result.add_message(CmdMessage::info(format!(
                "Dry run: post {} not submitted",
                dp.index
            )));
            Ok(result.with_diff(diff))
        }
        EditMode::Preview => {
            let preview = session.preview();
            Ok(result.with_diff(diff).with_preview(preview))
        }
        EditMode::Submit => {
            let token = token.ok_or(BlogError::Unauthenticated)?;
            let post = session.submit(store, token)?;
            result.add_message(CmdMessage::success(format!(
                "Post updated ({}): {}",
                dp.index, post.title
            )));
            Ok(result.with_diff(diff).with_affected_posts(vec![post]))
        }
    }
}

fn apply_changes(
    session: &mut EditSession,
    changes: PostChanges,
    result: &mut CmdResult,
) -> Result<()> {
    if let Some(title) = changes.title {
        session.set_title(title);
    }
    if let Some(text) = changes.text {
        session.set_text(text);
    }
    if let Some(published) = changes.published {
        session.set_published(published);
    }
    if let Some(tags) = changes.tags {
        session.select_tags(&tags)?;
    }

    for id in &changes.restore {
        let marked = session.attachments().get(id).map(|a| a.is_deletion_marked());
        match marked {
            Some(true) => session.restore_attachment(id),
            Some(false) => {}
            None => result.add_message(CmdMessage::warning(format!(
                "No attachment {} on this post",
                id
            ))),
        }
    }
    for id in &changes.remove {
        if session.attachments().contains(id) {
            session.remove_attachment(id);
        } else {
            result.add_message(CmdMessage::warning(format!(
                "No attachment {} on this post",
                id
            )));
        }
    }

    session.add_files(changes.add_files);
    Ok(())
}
