//! Decides how a directory entry should be displayed.

use crate::github::RepoEntry;

/// Display category for an entry, decided before any content is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    Directory,
    /// Shown in the document view via a synthetic markdown image wrapper.
    Image,
    /// Fetched and parsed as a Jupyter notebook.
    Notebook,
    /// Fetched and rendered as markdown.
    Markdown,
    /// Fetched and wrapped in a fenced code block.
    Code { lang: String },
}

const IMAGE_SUFFIXES: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

pub fn classify(entry: &RepoEntry) -> ContentKind {
    if entry.is_dir() {
        return ContentKind::Directory;
    }
    let lower = entry.name.to_lowercase();
    if IMAGE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return ContentKind::Image;
    }
    if entry.name.ends_with(".ipynb") {
        return ContentKind::Notebook;
    }
    if entry.name.ends_with(".md") {
        return ContentKind::Markdown;
    }
    ContentKind::Code {
        lang: language_tag(&entry.name),
    }
}

/// Language tag for a fenced code block: the part after the last dot, or
/// `text` when the filename has no usable extension.
pub fn language_tag(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => name[idx + 1..].to_string(),
        _ => "text".to_string(),
    }
}

/// Wrap raw file content in a fenced code block for the markdown view.
pub fn fence(lang: &str, raw: &str) -> String {
    format!("```{}\n{}\n```", lang, raw)
}

/// Synthetic one-image markdown document for image files.
pub fn image_wrapper(name: &str, url: &str) -> String {
    format!("![{}]({})", name, url)
}
