//! Ls command implementation

use crate::cli::{lister_for, LsArgs};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::listing::{normalize_path, DirectoryEntry, ListingResponse};
use crate::view::breadcrumb;

/// Run the ls command
pub async fn run(args: LsArgs, config: &Config) -> Result<()> {
    let repository = args.repository.trim();
    if repository.is_empty() {
        return Err(Error::InvalidRepository);
    }

    let lister = lister_for(config, &args.source)?;
    let path = normalize_path(args.path.as_deref().unwrap_or(""));
    let entries = lister.list_directory(repository, path).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&ListingResponse::ok(path, entries))?
        );
    } else {
        print!("{}", format_listing(path, &entries));
    }

    Ok(())
}

fn format_listing(path: &str, entries: &[DirectoryEntry]) -> String {
    let crumbs = breadcrumb(path);
    let labels: Vec<&str> = crumbs.iter().map(|c| c.label.as_str()).collect();
    let mut out = format!("{}\n", labels.join(" / "));
    for entry in entries {
        if entry.is_dir() {
            out.push_str(&format!("{}/\n", entry.name));
        } else {
            out.push_str(&format!("{}\n", entry.name));
        }
    }
    out
}
