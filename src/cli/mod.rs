//! CLI command definitions and handlers

mod args;
pub mod ls;
pub mod serve;
pub mod tree;

pub use args::*;

use crate::core::config::{Config, SourceKind};
use crate::core::error::Result;
use crate::listing::{build_lister, DirectoryLister};
use std::path::Path;
use std::sync::Arc;

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Api => SourceKind::Api,
            SourceArg::Github => SourceKind::Github,
        }
    }
}

/// Load the config file given on the command line, or the default one
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Apply command line overrides to the config
pub fn resolve_source(config: &Config, args: &SourceArgs) -> (Config, SourceKind) {
    let mut config = config.clone();

    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
    }
    if args.no_cache {
        config.cache.enabled = false;
    }

    let source = match (args.source, &args.api_url) {
        (Some(source), _) => source.into(),
        (None, Some(_)) => SourceKind::Api,
        (None, None) => config.general.source,
    };

    (config, source)
}

/// Build the lister selected by config and command line
pub fn lister_for(config: &Config, args: &SourceArgs) -> Result<Arc<dyn DirectoryLister>> {
    let (config, source) = resolve_source(config, args);
    build_lister(&config, source)
}
