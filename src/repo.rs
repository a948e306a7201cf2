//! Repository and configuration bootstrap shared by every subcommand.

use anyhow::{Context, Result};
use restash_git::GitCli;
use tracing::debug;

use crate::config::RestashConfig;

/// Discover the repository containing the current directory, load its
/// `.restash.toml`, and apply the configured invocation deadline.
pub fn open() -> Result<(GitCli, RestashConfig)> {
    let cwd = std::env::current_dir().context("could not determine the current directory")?;
    let cli = GitCli::discover(&cwd)?;
    let config = RestashConfig::load(cli.repo_root())?;
    debug!(
        root = %cli.repo_root().display(),
        timeout_seconds = config.git.timeout_seconds,
        "opened repository"
    );
    let cli = cli.with_timeout(config.git.timeout());
    Ok((cli, config))
}
