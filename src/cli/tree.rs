//! Tree command implementation
//!
//! Loads a repository, opens any requested folders and prints the result.
//!
//! @module cli/tree

use futures::future::join_all;
use std::io::IsTerminal;

use crate::cli::{lister_for, OutputFormat, TreeArgs};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::explorer::{Command, Effect, TreeExplorer};
use crate::listing::normalize_path;
use crate::view::{ascii, html};

/// Run the tree command
pub async fn run(args: TreeArgs, config: &Config) -> Result<()> {
    let lister = lister_for(config, &args.source)?;
    let highlight = args.highlight.as_deref().unwrap_or("");

    let explorer = match TreeExplorer::load(lister, &args.repository, highlight).await {
        Ok(explorer) => explorer,
        Err(e @ Error::ListingFailed { .. }) => {
            eprintln!(
                "\x1b[31m>\x1b[0m Failed to load file tree: {}",
                e.user_message()
            );
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    // Each requested folder opens its own ancestors; folders run concurrently
    let expansions = args.expand.iter().map(|path| expand_path(&explorer, path));
    for (path, result) in args.expand.iter().zip(join_all(expansions).await) {
        if let Err(e) = result {
            eprintln!("\x1b[33m>\x1b[0m Could not expand {}: {}", path, e.user_message());
        }
    }

    let view = explorer.view();
    match args.format {
        OutputFormat::Human => {
            let color = !args.no_color && std::io::stdout().is_terminal();
            print!("{}", ascii::render(&view, color));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Html => println!("{}", html::render_fragment(&view)),
    }

    Ok(())
}

/// Expand `path` and every folder above it, outermost first
async fn expand_path(explorer: &TreeExplorer, path: &str) -> Result<()> {
    let path = normalize_path(path);
    let mut prefix = String::new();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);

        let effect = explorer
            .dispatch(Command::ExpandNode {
                path: prefix.clone(),
            })
            .await?;
        if let Effect::RowError { path, message } = effect {
            return Err(Error::ExpandFailed { path, message });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{DirectoryEntry, MemoryLister};
    use std::sync::Arc;

    fn lister() -> Arc<MemoryLister> {
        Arc::new(
            MemoryLister::new("octo/repo")
                .with_dir(
                    "",
                    vec![DirectoryEntry::dir("src", ""), DirectoryEntry::dir("docs", "")],
                )
                .with_dir("src", vec![DirectoryEntry::dir("src/app", "")])
                .with_dir("src/app", vec![DirectoryEntry::file("src/app/main.rs", "")])
                .with_failure("docs", "rate limited"),
        )
    }

    #[tokio::test]
    async fn test_expand_path_opens_ancestors() {
        let lister = lister();
        let explorer = TreeExplorer::load(lister.clone(), "octo/repo", "")
            .await
            .unwrap();

        expand_path(&explorer, "/src/app/").await.unwrap();

        explorer.with_tree(|tree| {
            assert!(tree.find("src").unwrap().is_expanded());
            assert!(tree.find("src/app").unwrap().is_expanded());
            assert!(tree.find("src/app/main.rs").is_some());
        });
        assert_eq!(lister.calls(), vec!["", "src", "src/app"]);
    }

    #[tokio::test]
    async fn test_expand_path_reports_failure() {
        let explorer = TreeExplorer::load(lister(), "octo/repo", "").await.unwrap();

        let err = expand_path(&explorer, "docs").await.unwrap_err();
        assert!(matches!(err, Error::ExpandFailed { .. }));
        assert_eq!(err.user_message(), "rate limited");

        let err = expand_path(&explorer, "missing/dir").await.unwrap_err();
        assert!(matches!(err, Error::UnknownNode { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_expansions_share_ancestors() {
        let lister = lister();
        let gate = lister.hold("src");
        let explorer = TreeExplorer::load(lister.clone(), "octo/repo", "")
            .await
            .unwrap();

        // Both expansions start while the `src` fetch is still held open
        let (a, b, ()) = tokio::join!(
            expand_path(&explorer, "src"),
            expand_path(&explorer, "src/app"),
            async {
                while lister.calls_for("src") == 0 {
                    tokio::task::yield_now().await;
                }
                gate.notify_one();
            }
        );
        a.unwrap();
        b.unwrap();

        explorer.with_tree(|tree| {
            assert!(tree.find("src/app").unwrap().is_expanded());
            assert!(tree.find("src/app/main.rs").is_some());
        });

        assert_eq!(lister.calls_for("src"), 1);
        assert_eq!(lister.calls_for("src/app"), 1);
    }
}
