//! The library code for the `sitetags` build helper. A blog's HTML content
//! files are the only source of truth; every run recomputes everything from
//! them in a single pass:
//!
//! 1. Scanning content directories into [`crate::record::Record`]s
//!    ([`crate::scan`], which delegates to [`crate::extract`])
//! 2. Grouping the records by tag ([`crate::tag`])
//! 3. Writing the output ([`crate::write`])
//!
//! The third step has two halves. Root pages (the home page, the full posts
//! listing, the movies listing) are rewritten in place, but only between a
//! pair of marker comments. Tag pages are regenerated from scratch: the tag
//! output directory is deleted and one `{tag}/index.html` is written per tag,
//! so tags that disappeared from the content don't leave stale pages behind.
//!
//! Every list is sorted newest-first before rendering (see [`crate::date`]),
//! so directory listing order never leaks into the output.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod date;
pub mod extract;
pub mod record;
pub mod scan;
pub mod tag;
pub mod write;
