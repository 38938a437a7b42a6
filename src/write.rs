//! Renders record lists and writes them to disk: into the marker region of
//! existing root pages ([`update_page`]) and into freshly generated tag pages
//! ([`Writer::write_tag_pages`]).

use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::date::sort_newest_first;
use crate::record::Record;
use crate::tag::TagIndex;

/// Opens the replaceable list region of a root page.
pub const START_MARKER: &str = "<!-- POSTS_LIST_START -->";

/// Closes the replaceable list region of a root page.
pub const END_MARKER: &str = "<!-- POSTS_LIST_END -->";

/// The built-in tag page template. It receives `tag`, `site_name`, and
/// `items` (the rendered list).
pub const DEFAULT_TAG_TEMPLATE: &str = include_str!("../theme/tag.html");

/// Renders `records` as a list fragment, one link per record, in the given
/// order. Fields are embedded verbatim; they were lifted out of HTML in the
/// first place. No records renders as an empty string.
pub fn render_list<R: std::borrow::Borrow<Record>>(records: &[R]) -> String {
    records
        .iter()
        .map(|record| {
            let record = record.borrow();
            format!(
                r#"
                    <a href="{}" class="post-item">
                        <span class="post-date">{}</span>
                        <span class="post-title">{}</span>
                    </a>"#,
                record.url, record.date, record.title,
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Replaces everything from the first [`START_MARKER`] through the last
/// [`END_MARKER`] in `contents` with fresh markers around `fragment`. Returns
/// `None` when the markers aren't both present (in that order).
pub fn replace_marker_region(contents: &str, fragment: &str) -> Option<String> {
    let start = contents.find(START_MARKER)?;
    let end = contents.rfind(END_MARKER)?;
    if end < start + START_MARKER.len() {
        return None;
    }

    let mut out = String::with_capacity(contents.len() + fragment.len());
    out.push_str(&contents[..start]);
    out.push_str(START_MARKER);
    out.push('\n');
    out.push_str(fragment);
    out.push_str("\n                    ");
    out.push_str(END_MARKER);
    out.push_str(&contents[end + END_MARKER.len()..]);
    Some(out)
}

/// The outcome of [`update_page`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageUpdate {
    /// The marker region was rewritten.
    Updated,

    /// The page doesn't exist, so there was nothing to do.
    Missing,

    /// The page exists but lacks the marker pair; it was left untouched.
    NoMarkers,
}

/// Rewrites the marker region of the root page at `path` with `records`,
/// newest first, keeping only the first `limit` records if a limit is given.
/// A limit of zero means no limit.
/// Content outside the region is preserved byte-for-byte.
pub fn update_page(path: &Path, records: &[&Record], limit: Option<usize>) -> Result<PageUpdate> {
    if !path.is_file() {
        return Ok(PageUpdate::Missing);
    }

    let contents = std::fs::read_to_string(path).map_err(|e| annotate_io(path, "reading", e))?;

    let mut records = records.to_vec();
    sort_newest_first(&mut records);
    if let Some(limit) = limit.filter(|&limit| limit > 0) {
        records.truncate(limit);
    }

    match replace_marker_region(&contents, &render_list(&records)) {
        None => Ok(PageUpdate::NoMarkers),
        Some(updated) => {
            std::fs::write(path, updated).map_err(|e| annotate_io(path, "writing", e))?;
            Ok(PageUpdate::Updated)
        }
    }
}

/// Writes tag pages.
pub struct Writer<'a> {
    /// The template for tag pages.
    pub tag_template: &'a Template,

    /// The directory in which tag pages are written. The page for a tag lives
    /// at `{tags_directory}/{tag}/index.html`.
    pub tags_directory: &'a Path,

    /// The site name, made available to the template as `site_name`.
    pub site_name: &'a str,
}

impl Writer<'_> {
    /// Writes one page per tag in `index`, each listing the tag's records
    /// newest first. Returns the paths of the written files. The caller is
    /// responsible for clearing out pages from previous runs.
    pub fn write_tag_pages(&self, index: &TagIndex) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(self.tags_directory)
            .map_err(|e| annotate_io(self.tags_directory, "creating", e))?;

        let mut written = Vec::with_capacity(index.len());
        for (tag, records) in index {
            let mut records = records.clone();
            sort_newest_first(&mut records);
            written.push(self.write_tag_page(tag, &records)?);
        }
        Ok(written)
    }

    fn write_tag_page(&self, tag: &str, records: &[&Record]) -> Result<PathBuf> {
        let dir = self.tags_directory.join(tag);
        std::fs::create_dir_all(&dir).map_err(|e| annotate_io(&dir, "creating", e))?;

        let file_path = dir.join("index.html");
        let mut file =
            std::fs::File::create(&file_path).map_err(|e| annotate_io(&file_path, "creating", e))?;
        self.tag_template
            .execute(&mut file, &self.context(tag, records)?)
            .map_err(|e| {
                Error::Annotated(
                    format!("rendering tag page `{}`", file_path.display()),
                    Box::new(Error::Template(e.to_string())),
                )
            })?;

        info!("wrote {} records to `{}`", records.len(), file_path.display());
        Ok(file_path)
    }

    fn context(&self, tag: &str, records: &[&Record]) -> Result<Context> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("tag".to_owned(), Value::String(tag.to_owned()));
        m.insert(
            "site_name".to_owned(),
            Value::String(self.site_name.to_owned()),
        );
        m.insert("items".to_owned(), Value::String(render_list(records)));
        Context::from(Value::Object(m)).map_err(|e| Error::Template(e.to_string()))
    }
}

/// Parses a tag page template from its source text.
pub fn parse_template(source: &str) -> Result<Template> {
    let mut template = Template::default();
    template
        .parse(source)
        .map_err(|e| Error::Template(e.to_string()))?;
    Ok(template)
}

fn annotate_io(path: &Path, action: &str, err: io::Error) -> Error {
    Error::Annotated(
        format!("{} `{}`", action, path.display()),
        Box::new(Error::Io(err)),
    )
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error parsing or executing a template.
    Template(String),

    /// An error reading or writing the output files.
    Io(io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}
