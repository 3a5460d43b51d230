// Command line definitions, shared with build.rs for man page generation.
// Keep this file free of crate-internal imports.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const LONG_ABOUT: &str = r#"
Browse GitHub repositories as a lazily loaded file tree.

Directories are fetched one level at a time, only when opened. Pointing
the tree at a file opens every folder on the way to it and marks it.

LISTING SOURCES:
    api       The gitgutter listing API (POST /api/repository-tree)
    github    The GitHub contents API directly

EXAMPLES:
    gitgutter tree octo/repo                         Top level of a repository
    gitgutter tree octo/repo -H src/index.js         Open the path to a file
    gitgutter tree octo/repo -e docs -e src          Open several folders
    gitgutter ls octo/repo src --json                One listing as JSON
    gitgutter serve --open                           Web explorer in the browser
"#;

/// Lazy file tree explorer for GitHub repositories
#[derive(Parser, Debug)]
#[command(name = "gitgutter")]
#[command(author, version)]
#[command(about = "Lazy file tree explorer for GitHub repositories")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: $GITGUTTER_HOME/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a repository's file tree
    #[command(visible_alias = "t")]
    Tree(TreeArgs),

    /// Print one directory listing
    Ls(LsArgs),

    /// Serve the web explorer and the listing API
    #[command(visible_alias = "s")]
    Serve(ServeArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Html,
}

/// Listing source override
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Api,
    Github,
}

/// Where listings come from, shared by `tree` and `ls`
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Listing source (default: from config)
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// Listing API base URL (implies --source api)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Bypass the listing cache
    #[arg(long)]
    pub no_cache: bool,
}

/// Arguments for the tree command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    gitgutter tree octo/repo
    gitgutter tree octo/repo --highlight src/index.js
    gitgutter tree octo/repo --expand docs --expand src
    gitgutter tree octo/repo --format json")]
pub struct TreeArgs {
    /// Repository as owner/name
    pub repository: String,

    /// File to open the tree at and mark
    #[arg(short = 'H', long)]
    pub highlight: Option<String>,

    /// Directory to expand after loading (repeatable)
    #[arg(short, long)]
    pub expand: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Repository as owner/name
    pub repository: String,

    /// Directory path (default: repository root)
    pub path: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// JSON output
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    gitgutter serve                 Start on localhost:5001
    gitgutter serve --port 8080     Use custom port
    gitgutter serve --open          Auto-open browser")]
pub struct ServeArgs {
    /// Port to serve on (default: from config, 5001)
    #[arg(long)]
    pub port: Option<u16>,

    /// Auto-open browser
    #[arg(long)]
    pub open: bool,
}
