//! Exports the [`build_site`] function which stitches together the steps of a
//! run: scanning content ([`crate::scan`]), indexing tags ([`crate::tag`]),
//! updating root pages and regenerating tag pages ([`crate::write`]).

use crate::config::Config;
use crate::extract::Extractor;
use crate::record::Record;
use crate::scan::{Error as ScanError, Scanner};
use crate::tag::index_records;
use crate::write::{
    parse_template, update_page, Error as WriteError, PageUpdate, Writer, DEFAULT_TAG_TEMPLATE,
};
use gtmpl::Template;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// What a run did, for reporting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    /// Every scanned record, across all sources, in scan order.
    pub records: Vec<Record>,

    /// The root pages whose marker region was rewritten.
    pub updated_pages: Vec<PathBuf>,

    /// The tags that got a page, in lexical order.
    pub tags: Vec<String>,

    /// The tag page files written, in the same order as `tags`.
    pub tag_pages: Vec<PathBuf>,
}

/// Builds the site from a [`Config`] object. Scans every source, rewrites
/// the marker region of each existing root page, then deletes the tag output
/// directory and writes one page per tag. Missing source directories and
/// missing or unmarked root pages are skipped; I/O failures abort the run.
pub fn build_site(config: &Config) -> Result<Summary> {
    // Parse the template before touching anything on disk.
    let tag_template = load_template(config.tag_template.as_deref())?;

    // collect all records
    let extractor = Extractor::new().map_err(Error::Pattern)?;
    let scanner = Scanner::new(&extractor);
    let mut records = Vec::new();
    for source in &config.sources {
        records.extend(scanner.scan_source(source, &config.source_directory(source))?);
    }

    let mut updated_pages = Vec::new();
    for page in &config.pages {
        let path = config.root_directory.join(&page.file);
        let listed: Vec<&Record> = records
            .iter()
            .filter(|record| record.category == page.category)
            .collect();
        match update_page(&path, &listed, page.limit)? {
            PageUpdate::Updated => updated_pages.push(path),
            PageUpdate::NoMarkers => {
                warn!("`{}` has no list markers; leaving it alone", path.display())
            }
            PageUpdate::Missing => {}
        }
    }

    // Tag pages are regenerated wholesale so tags that disappeared from the
    // content don't survive.
    let (tags, tag_pages) = {
        let index = index_records(&records);
        rmdir(&config.tags_directory)?;
        let writer = Writer {
            tag_template: &tag_template,
            tags_directory: &config.tags_directory,
            site_name: &config.site_name,
        };
        let tag_pages = writer.write_tag_pages(&index)?;
        (index.keys().cloned().collect(), tag_pages)
    };
    Ok(Summary {
        records,
        updated_pages,
        tags,
        tag_pages,
    })
}

// Loads the tag page template from `path`, or the built-in one.
fn load_template(path: Option<&Path>) -> Result<Template> {
    match path {
        None => Ok(parse_template(DEFAULT_TAG_TEMPLATE)?),
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(|e| Error::OpenTemplateFile {
                path: path.to_owned(),
                err: e,
            })?;
            parse_template(&contents).map_err(|e| Error::ParseTemplate {
                path: path.to_owned(),
                err: e,
            })
        }
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during scanning,
/// writing, cleaning the tag output directory, or loading the template.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during scanning.
    Scan(ScanError),

    /// Returned for errors writing pages to disk.
    Write(WriteError),

    /// Returned for I/O problems while cleaning the tag output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening the template file.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing the template file.
    ParseTemplate { path: PathBuf, err: WriteError },

    /// Returned when an extraction pattern fails to compile.
    Pattern(regex::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Scan(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template file '{}': {}", path.display(), err)
            }
            Error::Pattern(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Scan(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate { path: _, err } => Some(err),
            Error::Pattern(err) => Some(err),
        }
    }
}

impl From<ScanError> for Error {
    /// Converts [`ScanError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ScanError) -> Error {
        Error::Scan(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}
