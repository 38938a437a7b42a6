use clap::{crate_version, App, Arg};
use sitetags::build::{build_site, Summary};
use sitetags::config::Config;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = App::new("sitetags")
        .version(crate_version!())
        .about("Regenerates post listings and tag pages for an HTML blog")
        .arg(
            Arg::with_name("root")
                .long("root")
                .short("r")
                .takes_value(true)
                .default_value(".")
                .help("The site root containing the content directories and root pages"),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .takes_value(true)
                .help("A YAML file overriding the built-in site layout"),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // `root` has a default value, so it's always present.
    let root = Path::new(matches.value_of("root").unwrap_or("."));
    if let Err(e) = run(root, matches.value_of("config").map(Path::new)) {
        eprintln!("ERROR {}", e);
        std::process::exit(1);
    }
}

fn run(root: &Path, project_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = match project_file {
        Some(path) => Config::from_project_file(root, path)?,
        None => Config::from_root(root),
    };
    report(&build_site(&config)?, root);
    Ok(())
}

fn report(summary: &Summary, root: &Path) {
    for page in &summary.updated_pages {
        let name = page.strip_prefix(root).unwrap_or(page);
        println!("✓ Updated {}", name.display());
    }
    println!(
        "\nSummary: Automation complete. Tag pages generated for: {}",
        summary.tags.join(", ")
    );
}
