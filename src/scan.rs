//! The content scanner. Walks each configured [`Source`] directory and turns
//! every HTML file in it into a [`Record`] via [`Extractor`].

use std::fmt;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::Source;
use crate::extract::Extractor;
use crate::record::Record;

const HTML_EXTENSION: &str = ".html";

/// Scans content directories into [`Record`]s.
pub struct Scanner<'a> {
    extractor: &'a Extractor,
}

impl<'a> Scanner<'a> {
    /// Constructs a new scanner which extracts metadata with `extractor`.
    pub fn new(extractor: &'a Extractor) -> Scanner<'a> {
        Scanner { extractor }
    }

    /// Returns one [`Record`] per `.html` file directly inside `directory`,
    /// skipping the file names listed in [`Source::exclude`]. Files are
    /// visited in file-name order and symlinks are followed, so a linked file
    /// is scanned like any other and a dangling link is an error. A missing
    /// `directory` yields no records; any other I/O problem is an error.
    pub fn scan_source(&self, source: &Source, directory: &Path) -> Result<Vec<Record>> {
        if !directory.is_dir() {
            debug!(
                "source directory `{}` doesn't exist; skipping",
                directory.display()
            );
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for result in WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = result?;
            let os_file_name = entry.file_name();
            let file_name = os_file_name.to_string_lossy();
            if !entry.file_type().is_file()
                || !file_name.ends_with(HTML_EXTENSION)
                || source.exclude.iter().any(|excluded| *excluded == file_name)
            {
                continue;
            }
            records.push(self.scan_file(source, &file_name, entry.path())?);
        }
        Ok(records)
    }

    fn scan_file(&self, source: &Source, file_name: &str, path: &Path) -> Result<Record> {
        // Content is trusted markup; a stray invalid byte shouldn't sink the
        // whole run.
        let bytes = std::fs::read(path).map_err(|e| {
            Error::Annotated(
                format!("reading content file `{}`", path.display()),
                Box::new(Error::Io(e)),
            )
        })?;
        let contents = String::from_utf8_lossy(&bytes);
        let record = self.extractor.extract(source, file_name, &contents);
        debug!(
            "scanned `{}`: title={:?} date={:?} tags={:?}",
            record.url, record.title, record.date, record.tags
        );
        Ok(record)
    }
}

/// Represents the result of a scan operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error scanning content files.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O errors reading content files.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors listing a source directory.
    WalkDir(walkdir::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
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
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator while listing source directories.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
