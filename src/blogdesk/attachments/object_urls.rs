use super::PreviewRegistry;
use crate::model::LocalFile;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory table of `blob:` URLs, the local analogue of a browser's object URLs.
///
/// Each `acquire` mints a new URL even for identical files; the table holds a
/// cheap clone of the file until the URL is released.
#[derive(Debug, Default)]
pub struct ObjectUrls {
    live: HashMap<String, LocalFile>,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of URLs acquired and not yet released.
    pub fn live(&self) -> usize {
        self.live.len()
    }
}

impl PreviewRegistry for ObjectUrls {
    fn acquire(&mut self, file: &LocalFile) -> String {
        let url = format!("blob:{}", Uuid::new_v4());
        self.live.insert(url.clone(), file.clone());
        url
    }

    fn release(&mut self, source: &str) {
        if self.live.remove(source).is_none() {
            tracing::debug!(source, "release of unknown object url ignored");
        }
    }

    fn resolve(&self, source: &str) -> Option<&LocalFile> {
        self.live.get(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_mints_distinct_urls() {
        let mut urls = ObjectUrls::new();
        let file = LocalFile::from_bytes("a.png", vec![1, 2, 3]);
        let first = urls.acquire(&file);
        let second = urls.acquire(&file);

        assert_ne!(first, second);
        assert!(first.starts_with("blob:"));
        assert_eq!(urls.live(), 2);
        assert_eq!(urls.resolve(&first), Some(&file));
    }

    #[test]
    fn release_forgets_url() {
        let mut urls = ObjectUrls::new();
        let url = urls.acquire(&LocalFile::from_bytes("a.png", vec![1]));
        urls.release(&url);

        assert_eq!(urls.live(), 0);
        assert!(urls.resolve(&url).is_none());
    }

    #[test]
    fn release_unknown_is_ignored() {
        let mut urls = ObjectUrls::new();
        urls.release("blob:nope");
        assert_eq!(urls.live(), 0);
    }
}
