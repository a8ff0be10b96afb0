// Diagnostics logging for the CLI

use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber filtered by `directive` (e.g. `info`, `topup_service=debug`)
pub fn init(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .wrap_err_with(|| format!("invalid log level '{}'", directive))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| eyre!("failed to install log subscriber: {}", e))
}
