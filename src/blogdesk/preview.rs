//! Standalone HTML previews of posts and drafts.
//!
//! A [`PostPreview`] is a plain value the editor hands to whoever renders it,
//! so nothing about the draft has to be parked in shared storage between the
//! two. Rendering produces a self-contained document: persisted images link to
//! the CDN and locally picked images are inlined as `data:` URIs.
//!
//! The document comes from `templates/preview.html` with HTML auto-escaping on.
//! Only the markdown body is passed in as already-safe markup, and raw HTML in
//! the post text is rendered as text, never as markup.

use crate::attachments::{resolve_url, AttachmentSet, Payload, PreviewRegistry};
use crate::error::Result;
use crate::model::{LocalFile, Post};
use base64::Engine;
use minijinja::{context, AutoEscape, Environment, Value};
use pulldown_cmark::{html, Event, Options, Parser};
use serde::Serialize;

const PREVIEW_TEMPLATE_NAME: &str = "preview.html";
const PREVIEW_TEMPLATE: &str = include_str!("templates/preview.html");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewImage {
    Remote { url: String },
    Local { file: LocalFile },
}

impl PreviewImage {
    pub fn src(&self) -> String {
        match self {
            PreviewImage::Remote { url } => url.clone(),
            PreviewImage::Local { file } => format!(
                "data:{};base64,{}",
                file.content_type(),
                base64::engine::general_purpose::STANDARD.encode(file.bytes())
            ),
        }
    }

    fn alt(&self) -> &str {
        match self {
            PreviewImage::Remote { url } => url.rsplit('/').next().unwrap_or(url),
            PreviewImage::Local { file } => file.file_name(),
        }
    }
}

#[derive(Serialize)]
struct ImageView<'a> {
    src: String,
    alt: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPreview {
    pub title: String,
    pub tags: Vec<String>,
    pub text: String,
    pub images: Vec<PreviewImage>,
}

impl PostPreview {
    pub fn from_post(post: &Post, cdn_base: &str) -> Self {
        Self {
            title: post.title.clone(),
            tags: post.tags.clone(),
            text: post.text.clone(),
            images: post
                .attachments
                .iter()
                .map(|path| PreviewImage::Remote {
                    url: resolve_url(cdn_base, path),
                })
                .collect(),
        }
    }

    /// Builds a preview of work in progress; only visible attachments are shown.
    ///
    /// Local files are looked up through the set's registry by their preview
    /// handle. A handle the registry no longer knows is left out.
    pub fn from_draft<R: PreviewRegistry>(
        title: &str,
        text: &str,
        tags: &[String],
        attachments: &AttachmentSet<R>,
    ) -> Self {
        let images = attachments
            .visible()
            .into_iter()
            .filter_map(|a| match a.payload() {
                Payload::Path(_) => Some(PreviewImage::Remote {
                    url: a.preview_source().to_string(),
                }),
                Payload::File(_) => {
                    let resolved = attachments.registry().resolve(a.preview_source());
                    if resolved.is_none() {
                        tracing::debug!(id = %a.id(), "preview handle not live, image skipped");
                    }
                    resolved.map(|file| PreviewImage::Local { file: file.clone() })
                }
            })
            .collect();
        Self {
            title: title.to_string(),
            tags: tags.to_vec(),
            text: text.to_string(),
            images,
        }
    }

    /// The markdown body rendered to an HTML fragment. Raw HTML blocks and
    /// inline tags in the source come out escaped.
    pub fn body_html(&self) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(&self.text, options).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
        let mut out = String::new();
        html::push_html(&mut out, parser);
        out
    }

    pub fn to_html(&self) -> Result<String> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template(PREVIEW_TEMPLATE_NAME, PREVIEW_TEMPLATE)?;

        let images: Vec<ImageView<'_>> = self
            .images
            .iter()
            .map(|image| ImageView {
                src: image.src(),
                alt: image.alt(),
            })
            .collect();

        let tmpl = env.get_template(PREVIEW_TEMPLATE_NAME)?;
        Ok(tmpl.render(context! {
            title => &self.title,
            tags => &self.tags,
            body => Value::from_safe_string(self.body_html()),
            images => images,
        })?)
    }
}
