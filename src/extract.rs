//! Pattern-based metadata extraction. Content files are hand-written HTML
//! that all follow the same shape, so instead of parsing the document we pick
//! out three things with regular expressions:
//!
//! * the text of `<title>` up to the first `|` (the site-name suffix)
//! * the first line of text inside `<div class="post-meta">`, the display date
//! * every `href="/tags/{slug}"` link
//!
//! Extraction never fails. Each field falls back to its placeholder
//! independently when its pattern doesn't match.

use regex::Regex;

use crate::config::Source;
use crate::record::{Record, UNKNOWN_DATE, UNTITLED};

/// Extracts [`Record`]s from content file contents. Holds the compiled
/// patterns so they're built once per run rather than once per file.
pub struct Extractor {
    title: Regex,
    date: Regex,
    tag: Regex,
}

impl Extractor {
    /// Compiles the extraction patterns.
    pub fn new() -> Result<Extractor, regex::Error> {
        Ok(Extractor {
            title: Regex::new(r"<title>([^|<]+)")?,
            date: Regex::new(r#"<div class="post-meta"[^>]*>\s*([^<\n]+)"#)?,
            tag: Regex::new(r#"href="/tags/([^"/]+)[^"]*""#)?,
        })
    }

    /// Builds the [`Record`] for the file `file_name` from `source`, given its
    /// `contents`.
    pub fn extract(&self, source: &Source, file_name: &str, contents: &str) -> Record {
        Record {
            category: source.category.clone(),
            title: self.title(source, contents),
            date: self.date(contents),
            tags: self.tags(contents),
            url: Record::url_for(&source.category, file_name),
        }
    }

    fn title(&self, source: &Source, contents: &str) -> String {
        let title = self
            .title
            .captures(contents)
            .and_then(|captures| captures.get(1))
            .map_or("", |m| m.as_str().trim());
        let title = match &source.title_prefix {
            Some(prefix) => strip_title_prefix(title, prefix),
            None => title,
        };
        match title.is_empty() {
            true => String::from(UNTITLED),
            false => title.to_owned(),
        }
    }

    fn date(&self, contents: &str) -> String {
        match self.date.captures(contents) {
            Some(captures) => captures[1].trim().to_owned(),
            None => String::from(UNKNOWN_DATE),
        }
    }

    fn tags(&self, contents: &str) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for captures in self.tag.captures_iter(contents) {
            let slug = &captures[1];
            if !tags.iter().any(|t| t == slug) {
                tags.push(slug.to_owned());
            }
        }
        tags
    }
}

// Strips `prefix` and any whitespace after it, so `Movie Review:` also
// matches `Movie Review:  Inception`.
fn strip_title_prefix<'a>(title: &'a str, prefix: &str) -> &'a str {
    match title.strip_prefix(prefix.trim_end()) {
        Some(rest) => rest.trim_start(),
        None => title,
    }
}
