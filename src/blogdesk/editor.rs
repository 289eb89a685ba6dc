use crate::error::{BlogError, Result};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Title and body of a post as laid out in an editor buffer.
/// Format: title\n\nbody
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorContent {
    pub title: String,
    pub text: String,
}

impl EditorContent {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn to_buffer(&self) -> String {
        if self.text.is_empty() {
            format!("{}\n\n", self.title)
        } else {
            format!("{}\n\n{}", self.title, self.text)
        }
    }

    /// First non-blank line is the title, everything after it is the body.
    /// Leading and trailing blank lines around the body are dropped.
    pub fn from_buffer(buffer: &str) -> Self {
        let mut lines = buffer.lines().skip_while(|l| l.trim().is_empty());
        let title = match lines.next() {
            Some(line) => line.trim().to_string(),
            None => return Self::new("", ""),
        };
        let rest: Vec<&str> = lines.collect();
        let text = rest.join("\n").trim_matches('\n').trim_end().to_string();
        Self { title, text }
    }
}

/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(BlogError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor, waits for it to close and returns
/// the file's contents.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();
    debug!(%editor, path = %path.display(), "launching editor");

    let status = Command::new(&editor)
        .arg(path)
        .status()
        .map_err(|e| BlogError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(BlogError::Api(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    Ok(fs::read_to_string(path)?)
}

pub fn edit_content(initial: &EditorContent, file_extension: &str) -> Result<EditorContent> {
    let temp_file = env::temp_dir().join(format!(
        "blogdesk_edit_{}{}",
        std::process::id(),
        file_extension
    ));

    fs::write(&temp_file, initial.to_buffer())?;
    let edited = open_in_editor(&temp_file);
    let _ = fs::remove_file(&temp_file);

    Ok(EditorContent::from_buffer(&edited?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_buffer_with_text() {
        let ec = EditorContent::new("My Title", "Some text here.");
        assert_eq!(ec.to_buffer(), "My Title\n\nSome text here.");
    }

    #[test]
    fn to_buffer_empty_text() {
        assert_eq!(EditorContent::new("My Title", "").to_buffer(), "My Title\n\n");
    }

    #[test]
    fn from_buffer_normal() {
        let ec = EditorContent::from_buffer("My Title\n\nThis is text.\n\nMore text.\n");
        assert_eq!(ec.title, "My Title");
        assert_eq!(ec.text, "This is text.\n\nMore text.");
    }

    #[test]
    fn from_buffer_title_only() {
        let ec = EditorContent::from_buffer("My Title");
        assert_eq!(ec, EditorContent::new("My Title", ""));
    }

    #[test]
    fn from_buffer_empty() {
        assert_eq!(EditorContent::from_buffer("\n\n"), EditorContent::new("", ""));
    }

    #[test]
    fn from_buffer_skips_leading_blank_lines() {
        let ec = EditorContent::from_buffer("\n\n  Title  \nBody");
        assert_eq!(ec.title, "Title");
        assert_eq!(ec.text, "Body");
    }

    #[test]
    fn buffer_roundtrip() {
        let original = EditorContent::new("Title", "# Heading\n\n- item");
        assert_eq!(EditorContent::from_buffer(&original.to_buffer()), original);
    }
}
