//! Defines [`Config`], the site layout a run works against. The layout is
//! built in (see [`Config::from_root`]); an optional YAML project file can
//! override any part of it (see [`Config::from_project_file`]).

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A content category: a directory of HTML files under the site root whose
/// name is also the category name (and the first URL segment).
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Source {
    pub category: String,

    /// File names in the directory that aren't content (e.g., an aggregator
    /// page living next to the entries it lists).
    #[serde(default)]
    pub exclude: Vec<String>,

    /// A prefix stripped from titles before they're listed.
    #[serde(default)]
    pub title_prefix: Option<String>,
}

/// A root page whose marker region lists the records of one category.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PageTarget {
    /// Path of the page relative to the site root.
    pub file: PathBuf,

    /// The category whose records are listed.
    pub category: String,

    /// Only the newest `limit` records are listed, if set. `0` is treated the
    /// same as no limit.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Deserialize, Default)]
struct Project {
    #[serde(default)]
    site_name: Option<String>,

    #[serde(default)]
    tags_directory: Option<PathBuf>,

    #[serde(default)]
    tag_template: Option<PathBuf>,

    #[serde(default)]
    sources: Option<Vec<Source>>,

    #[serde(default)]
    pages: Option<Vec<PageTarget>>,
}

/// Everything a run needs to know about the site. All paths are absolute or
/// relative to the process's working directory (i.e., already joined onto
/// the site root).
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The site root. Source directories and root pages live under it.
    pub root_directory: PathBuf,

    /// The categories to scan, in order.
    pub sources: Vec<Source>,

    /// The root pages to update.
    pub pages: Vec<PageTarget>,

    /// The tag output root. Deleted and recreated on every run.
    pub tags_directory: PathBuf,

    /// A template file for tag pages. `None` selects the built-in template.
    pub tag_template: Option<PathBuf>,

    /// The site name shown in tag page chrome.
    pub site_name: String,
}

impl Config {
    /// The built-in layout for a site rooted at `root`: `posts/` and
    /// `movies/` content, `index.html` (newest five posts), `posts.html` and
    /// `movies.html` listings, and tag pages under `tags/`.
    pub fn from_root(root: &Path) -> Config {
        Config {
            root_directory: root.to_owned(),
            sources: vec![
                Source {
                    category: String::from("posts"),
                    exclude: Vec::new(),
                    title_prefix: None,
                },
                Source {
                    category: String::from("movies"),
                    exclude: vec![String::from("movies.html")],
                    title_prefix: Some(String::from("Movie Review: ")),
                },
            ],
            pages: vec![
                PageTarget {
                    file: PathBuf::from("index.html"),
                    category: String::from("posts"),
                    limit: Some(5),
                },
                PageTarget {
                    file: PathBuf::from("posts.html"),
                    category: String::from("posts"),
                    limit: None,
                },
                PageTarget {
                    file: PathBuf::from("movies.html"),
                    category: String::from("movies"),
                    limit: None,
                },
            ],
            tags_directory: root.join("tags"),
            tag_template: None,
            site_name: String::from("Duke Lee"),
        }
    }

    /// Loads the built-in layout for `root` and applies the overrides in the
    /// YAML file at `path`. Every key is optional:
    ///
    /// ```yaml
    /// site_name: My Blog
    /// tags_directory: tags
    /// tag_template: theme/tag.html
    /// sources:
    ///   - category: posts
    ///   - category: movies
    ///     exclude: [movies.html]
    ///     title_prefix: "Movie Review: "
    /// pages:
    ///   - file: index.html
    ///     category: posts
    ///     limit: 5
    /// ```
    ///
    /// Relative paths are resolved against `root`.
    pub fn from_project_file(root: &Path, path: &Path) -> Result<Config> {
        Self::_from_project_file(root, path).map_err(|e| {
            Error::Annotated(
                format!("loading project file `{}`", path.display()),
                Box::new(e),
            )
        })
    }

    fn _from_project_file(root: &Path, path: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(File::open(path)?)?;
        Ok(Config::from_root(root).with_project(project))
    }

    fn with_project(mut self, project: Project) -> Config {
        if let Some(site_name) = project.site_name {
            self.site_name = site_name;
        }
        if let Some(tags_directory) = project.tags_directory {
            self.tags_directory = self.root_directory.join(tags_directory);
        }
        if let Some(tag_template) = project.tag_template {
            self.tag_template = Some(self.root_directory.join(tag_template));
        }
        if let Some(sources) = project.sources {
            self.sources = sources;
        }
        if let Some(pages) = project.pages {
            self.pages = pages;
        }
        self
    }

    /// The directory scanned for `source`.
    pub fn source_directory(&self, source: &Source) -> PathBuf {
        self.root_directory.join(&source.category)
    }
}

/// The result of loading configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a project file.
#[derive(Debug)]
pub enum Error {
    /// Returned when the project file can't be read.
    Io(std::io::Error),

    /// Returned when the project file isn't valid YAML or has the wrong
    /// shape.
    DeserializeYaml(serde_yaml::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::DeserializeYaml(err) => err.fmt(f),
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
            Error::DeserializeYaml(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator when opening the project file.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}
