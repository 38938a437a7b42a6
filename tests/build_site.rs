use sitetags::build::build_site;
use sitetags::config::Config;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const LISTING_PAGE: &str = "<html>
<body>
    <div class=\"posts-list\">
                    <!-- POSTS_LIST_START -->
                    stale content
                    <!-- POSTS_LIST_END -->
    </div>
</body>
</html>
";

fn post(title: &str, date: &str, tags: &[&str]) -> String {
    let links: Vec<String> = tags
        .iter()
        .map(|t| format!("<a href=\"/tags/{}\" class=\"tag\">{}</a>", t, t))
        .collect();
    format!(
        "<!DOCTYPE html>
<html>
<head><title>{} | Duke Lee</title></head>
<body>
    <div class=\"post-meta\">
        {}
    </div>
    <div class=\"post-tags\">{}</div>
</body>
</html>
",
        title,
        date,
        links.join("\n")
    )
}

fn write(root: &Path, relative: &str, contents: &str) -> std::io::Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

fn tag_dirs(root: &Path) -> std::io::Result<BTreeSet<String>> {
    let mut dirs = BTreeSet::new();
    for entry in fs::read_dir(root.join("tags"))? {
        dirs.insert(entry?.file_name().to_string_lossy().into_owned());
    }
    Ok(dirs)
}

fn tag_page(root: &Path, tag: &str) -> PathBuf {
    root.join("tags").join(tag).join("index.html")
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_tag_pages_are_ordered_and_exact() -> TestResult {
    let site = TempDir::new()?;
    let root = site.path();
    write(root, "posts/january.html", &post("January", "2024-01-10", &["design"]))?;
    write(
        root,
        "posts/march.html",
        &post("March", "2024-03-01", &["design", "engineering"]),
    )?;

    let summary = build_site(&Config::from_root(root))?;

    assert_eq!(vec!["design", "engineering"], summary.tags);
    assert_eq!(set(&["design", "engineering"]), tag_dirs(root)?);

    let design = fs::read_to_string(tag_page(root, "design"))?;
    let march = design.find("/posts/march.html").ok_or("march missing")?;
    let january = design.find("/posts/january.html").ok_or("january missing")?;
    assert!(march < january);

    let engineering = fs::read_to_string(tag_page(root, "engineering"))?;
    assert!(engineering.contains("/posts/march.html"));
    assert!(!engineering.contains("/posts/january.html"));
    Ok(())
}

#[test]
fn test_stale_tags_are_removed() -> TestResult {
    let site = TempDir::new()?;
    let root = site.path();
    write(root, "posts/a.html", &post("A", "2024-01-10", &["old", "kept"]))?;
    build_site(&Config::from_root(root))?;
    assert_eq!(set(&["kept", "old"]), tag_dirs(root)?);

    write(root, "posts/a.html", &post("A", "2024-01-10", &["kept"]))?;
    build_site(&Config::from_root(root))?;
    assert_eq!(set(&["kept"]), tag_dirs(root)?);
    Ok(())
}

#[test]
fn test_rebuild_is_idempotent() -> TestResult {
    let site = TempDir::new()?;
    let root = site.path();
    write(root, "posts/a.html", &post("A", "2024-01-10", &["x", "y"]))?;
    write(root, "posts/b.html", &post("B", "Unknown", &["y"]))?;
    write(root, "posts/c.html", &post("C", "2024-01-10", &["y"]))?;
    write(root, "posts.html", LISTING_PAGE)?;

    build_site(&Config::from_root(root))?;
    let first_listing = fs::read_to_string(root.join("posts.html"))?;
    let first_tag = fs::read_to_string(tag_page(root, "y"))?;

    build_site(&Config::from_root(root))?;
    assert_eq!(first_listing, fs::read_to_string(root.join("posts.html"))?);
    assert_eq!(first_tag, fs::read_to_string(tag_page(root, "y"))?);
    Ok(())
}

#[test]
fn test_root_pages() -> TestResult {
    let site = TempDir::new()?;
    let root = site.path();
    for day in 1..=7 {
        write(
            root,
            &format!("posts/day{}.html", day),
            &post(&format!("Day {}", day), &format!("2024-02-0{}", day), &[]),
        )?;
    }
    write(
        root,
        "movies/inception.html",
        &post("Movie Review: Inception", "2023-07-01", &["film"]),
    )?;
    write(root, "movies/movies.html", &post("Movies", "2020-01-01", &["film"]))?;
    write(root, "index.html", LISTING_PAGE)?;
    write(root, "posts.html", LISTING_PAGE)?;
    write(root, "movies.html", LISTING_PAGE)?;
    write(root, "about.html", "<p>no markers here</p>\n")?;

    let summary = build_site(&Config::from_root(root))?;
    assert_eq!(
        vec![root.join("index.html"), root.join("posts.html"), root.join("movies.html")],
        summary.updated_pages
    );
    // the aggregator page itself isn't content
    assert_eq!(8, summary.records.len());

    let index = fs::read_to_string(root.join("index.html"))?;
    assert_eq!(5, index.matches("class=\"post-item\"").count());
    assert!(index.contains("/posts/day7.html"));
    assert!(!index.contains("/posts/day2.html"));
    assert!(!index.contains("stale content"));
    assert!(index.starts_with("<html>\n<body>\n    <div class=\"posts-list\">\n"));
    assert!(index.ends_with("<!-- POSTS_LIST_END -->\n    </div>\n</body>\n</html>\n"));

    let posts = fs::read_to_string(root.join("posts.html"))?;
    assert_eq!(7, posts.matches("class=\"post-item\"").count());
    let day7 = posts.find("/posts/day7.html").ok_or("day7 missing")?;
    let day1 = posts.find("/posts/day1.html").ok_or("day1 missing")?;
    assert!(day7 < day1);

    let movies = fs::read_to_string(root.join("movies.html"))?;
    assert!(movies.contains("<span class=\"post-title\">Inception</span>"));
    assert!(!movies.contains("/movies/movies.html"));

    assert_eq!("<p>no markers here</p>\n", fs::read_to_string(root.join("about.html"))?);
    Ok(())
}

#[test]
fn test_empty_site() -> TestResult {
    let site = TempDir::new()?;
    let root = site.path();
    write(root, "index.html", LISTING_PAGE)?;

    let summary = build_site(&Config::from_root(root))?;
    assert!(summary.records.is_empty());
    assert!(summary.tags.is_empty());
    assert!(tag_dirs(root)?.is_empty());

    let index = fs::read_to_string(root.join("index.html"))?;
    assert!(index.contains(
        "<!-- POSTS_LIST_START -->\n\n                    <!-- POSTS_LIST_END -->"
    ));
    Ok(())
}

#[test]
fn test_placeholders() -> TestResult {
    let site = TempDir::new()?;
    let root = site.path();
    write(root, "posts/bare.html", "<p>no metadata at all</p>")?;
    write(root, "posts.html", LISTING_PAGE)?;

    let summary = build_site(&Config::from_root(root))?;
    assert_eq!(1, summary.records.len());
    let record = &summary.records[0];
    assert_eq!("Untitled", record.title);
    assert_eq!("Unknown Date", record.date);
    assert!(record.tags.is_empty());
    assert_eq!("/posts/bare.html", record.url);
    Ok(())
}
