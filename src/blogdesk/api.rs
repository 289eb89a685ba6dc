//! # API Facade
//!
//! The single entry point for blogdesk operations, whatever the UI. It
//! dispatches to `commands/*.rs`, parses selectors, and supplies the
//! configuration and token each command needs. It does no I/O of its own
//! beyond what the store does, and returns [`CmdResult`]s rather than text.
//!
//! `BlogApi<S: PostStore>` is generic over the store:
//! - Production: `BlogApi<GraphqlStore>`
//! - Testing: `BlogApi<InMemoryStore>`

use crate::auth::BearerToken;
use crate::commands;
use crate::config::BlogConfig;
use crate::error::{BlogError, Result};
use crate::index::PostSelector;
use crate::store::PostStore;
use std::path::PathBuf;
use std::str::FromStr;

pub struct BlogApi<S: PostStore> {
    store: S,
    config: BlogConfig,
    config_dir: PathBuf,
    token: Option<BearerToken>,
}

impl<S: PostStore> BlogApi<S> {
    pub fn new(store: S, config: BlogConfig, config_dir: PathBuf) -> Self {
        Self {
            store,
            config,
            config_dir,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<BearerToken>) -> Self {
        self.token = token;
        self
    }

    /// Swap in a refreshed token from the identity provider.
    pub fn set_token(&mut self, token: Option<BearerToken>) {
        self.token = token;
    }

    pub fn list_posts(&self, published_only: bool) -> Result<CmdResult> {
        commands::list::run(&self.store, self.token.as_ref(), published_only)
    }

    pub fn view_posts<I: AsRef<str>>(&self, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::view::run(&self.store, self.token.as_ref(), &selectors)
    }

    pub fn create_post(&mut self, draft: PostDraft) -> Result<CmdResult> {
        let catalog = self.config.tag_catalog()?;
        let token = self.token.as_ref().ok_or(BlogError::Unauthenticated)?;
        commands::create::run(
            &mut self.store,
            token,
            catalog,
            &self.config.cdn_base_url,
            draft,
        )
    }

    pub fn edit_post(
        &mut self,
        selector: &str,
        changes: PostChanges,
        mode: EditMode,
    ) -> Result<CmdResult> {
        let selector = parse_selector(selector)?;
        let catalog = self.config.tag_catalog()?;
        commands::edit::run(
            &mut self.store,
            self.token.as_ref(),
            catalog,
            &self.config.cdn_base_url,
            &selector,
            changes,
            mode,
        )
    }

    pub fn delete_posts<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        let token = self.token.as_ref().ok_or(BlogError::Unauthenticated)?;
        commands::delete::run(&mut self.store, token, &selectors)
    }

    pub fn preview_post(&self, selector: &str) -> Result<CmdResult> {
        let selector = parse_selector(selector)?;
        commands::preview::run(
            &self.store,
            self.token.as_ref(),
            &selector,
            &self.config.cdn_base_url,
        )
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    pub fn settings(&self) -> &BlogConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn parse_selector(input: &str) -> Result<PostSelector> {
    PostSelector::from_str(input).map_err(BlogError::Api)
}

fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<PostSelector>> {
    inputs.iter().map(|s| parse_selector(s.as_ref())).collect()
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, DiffSummary, EditMode, MessageLevel, PostChanges, PostDraft};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LocalFile;
    use crate::store::memory::fixtures::{token, StoreFixture};
    use crate::store::memory::InMemoryStore;

    fn api(store: InMemoryStore) -> BlogApi<InMemoryStore> {
        BlogApi::new(store, BlogConfig::default(), PathBuf::from("/nonexistent"))
            .with_token(Some(token()))
    }

    #[test]
    fn list_dispatches() {
        let api = api(StoreFixture::new().with_posts(2).store);
        assert_eq!(api.list_posts(false).unwrap().listed_posts.len(), 2);
    }

    #[test]
    fn view_parses_selectors() {
        let api = api(StoreFixture::new().with_posts(2).store);
        let result = api.view_posts(&["2", "id:0"]).unwrap();
        assert_eq!(result.listed_posts[0].index, 2);
        assert_eq!(result.listed_posts[1].index, 1);
    }

    #[test]
    fn invalid_selector_is_api_error() {
        let api = api(StoreFixture::new().with_posts(1).store);
        assert!(matches!(api.view_posts(&["0"]), Err(BlogError::Api(_))));
    }

    #[test]
    fn mutations_need_token() {
        let mut api = api(StoreFixture::new().with_posts(1).store);
        api.set_token(None);
        assert!(matches!(
            api.delete_posts(&["1"]),
            Err(BlogError::Unauthenticated)
        ));
        assert!(matches!(
            api.create_post(PostDraft {
                title: "T".into(),
                ..Default::default()
            }),
            Err(BlogError::Unauthenticated)
        ));
    }

    #[test]
    fn create_then_edit_roundtrip() {
        let mut api = api(InMemoryStore::new());
        api.create_post(PostDraft {
            title: "Hello".into(),
            text: "World".into(),
            tags: vec![],
            files: vec![LocalFile::from_bytes("a.png", vec![1])],
        })
        .unwrap();

        let uploaded = api.store().posts(None).unwrap()[0].attachments[0].clone();
        let result = api
            .edit_post(
                "1",
                PostChanges {
                    remove: vec![uploaded.clone()],
                    ..Default::default()
                },
                EditMode::Submit,
            )
            .unwrap();

        assert_eq!(result.diff.unwrap().deleted, vec![uploaded]);
        assert!(api.store().posts(None).unwrap()[0].attachments.is_empty());
    }

    #[test]
    fn config_dispatches_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let api = BlogApi::new(
            InMemoryStore::new(),
            BlogConfig::default(),
            dir.path().to_path_buf(),
        );

        api.config(ConfigAction::Set("cdn-base-url".into(), "https://cdn.test/".into()))
            .unwrap();
        let result = api.config(ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config.unwrap().cdn_base_url, "https://cdn.test/");
        assert!(dir.path().join("config.json").exists());
    }

    #[test]
    fn preview_dispatches() {
        let api = api(StoreFixture::new().with_post("Trip", &["p.png"]).store);
        let result = api.preview_post("1").unwrap();
        assert!(result.preview.is_some());
    }
}
