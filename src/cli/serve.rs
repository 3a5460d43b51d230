//! Serve command implementation
//!
//! @module cli/serve

use crate::cli::ServeArgs;
use crate::core::config::Config;
use crate::core::error::Result;

/// Run the serve command
pub async fn run(args: ServeArgs, config: &Config) -> Result<()> {
    let port = args.port.unwrap_or(config.web.port);
    crate::web::server::run(config, port, args.open).await
}
