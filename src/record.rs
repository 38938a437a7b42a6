//! Defines the [`Record`] type, the metadata extracted from one content file.

/// The metadata for a single content file. Records are built once per run by
/// [`crate::extract::Extractor`] and never mutated afterwards; the tag index
/// and the page writers only hold references to them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// The source category (e.g., `posts` or `movies`). This is also the
    /// name of the directory the file was scanned from.
    pub category: String,

    /// The display title. Falls back to [`UNTITLED`].
    pub title: String,

    /// The display date exactly as it appears in the source. Falls back to
    /// [`UNKNOWN_DATE`]. See [`crate::date`] for how it's compared.
    pub date: String,

    /// Tag slugs in first-seen order, without duplicates.
    pub tags: Vec<String>,

    /// The site-absolute URL, always `/{category}/{file_name}`.
    pub url: String,
}

/// Placeholder title for files without a usable `<title>`.
pub const UNTITLED: &str = "Untitled";

/// Placeholder date for files without a `post-meta` block.
pub const UNKNOWN_DATE: &str = "Unknown Date";

impl Record {
    /// Builds the URL for a file in a category.
    pub fn url_for(category: &str, file_name: &str) -> String {
        format!("/{}/{}", category, file_name)
    }
}
