use crate::error::{BlogError, Result};
use crate::tags::{TagCatalog, DEFAULT_TAGS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_ENDPOINT: &str = "http://localhost:8080/query";
const DEFAULT_CDN_BASE_URL: &str = "http://localhost:8080/static/";
const DEFAULT_FILE_EXT: &str = ".md";

pub const ENDPOINT_ENV: &str = "BLOGDESK_ENDPOINT";
pub const CDN_ENV: &str = "BLOGDESK_CDN";

/// Configuration for blogdesk, stored as config.json in the config dir
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogConfig {
    /// GraphQL endpoint queries and mutations are posted to
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Prefix turning a stored attachment path into a fetchable URL
    #[serde(default = "default_cdn_base_url")]
    pub cdn_base_url: String,

    /// Tags the editor offers
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,

    /// Extension of the temp file handed to $EDITOR
    #[serde(default = "default_file_ext")]
    pub file_ext: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_cdn_base_url() -> String {
    DEFAULT_CDN_BASE_URL.to_string()
}

fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            cdn_base_url: default_cdn_base_url(),
            tags: default_tags(),
            file_ext: default_file_ext(),
        }
    }
}

impl BlogConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: BlogConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Applies `BLOGDESK_ENDPOINT` / `BLOGDESK_CDN` over the file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(ENDPOINT_ENV).ok(),
            std::env::var(CDN_ENV).ok(),
        )
    }

    fn with_overrides(mut self, endpoint: Option<String>, cdn: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(cdn) = cdn.filter(|v| !v.trim().is_empty()) {
            self.cdn_base_url = cdn;
        }
        self
    }

    pub fn tag_catalog(&self) -> Result<TagCatalog> {
        TagCatalog::new(self.tags.iter().cloned())
    }

    /// Set the editor file extension (normalizes to start with a dot)
    pub fn set_file_ext(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
    }

    /// Sets a key by its CLI name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "endpoint" => self.endpoint = value.to_string(),
            "cdn-base-url" => self.cdn_base_url = value.to_string(),
            "file-ext" => self.set_file_ext(value),
            "tags" => {
                let tags: Vec<String> = value
                    .split(',')
                    .map(|t| t.trim())
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect();
                let catalog = TagCatalog::new(tags)?;
                self.tags = catalog.tags().to_vec();
            }
            other => return Err(BlogError::Api(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }

    /// Reads a key by its CLI name.
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "endpoint" => Ok(self.endpoint.clone()),
            "cdn-base-url" => Ok(self.cdn_base_url.clone()),
            "file-ext" => Ok(self.file_ext.clone()),
            "tags" => Ok(self.tags.join(",")),
            other => Err(BlogError::Api(format!("Unknown config key: {}", other))),
        }
    }

    pub fn keys() -> &'static [&'static str] {
        &["endpoint", "cdn-base-url", "tags", "file-ext"]
    }
}
