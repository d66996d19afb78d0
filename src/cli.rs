//! Command-line interface definition for osync.
//!
//! The parser is shared between the main binary and xtask, which renders
//! man pages and shell completions from it.
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use crate::config::{CONFIG_PATH_ENV, Settings};
use crate::filter::Direction;
use crate::resolver::{PROXY_ROOT_ENV, REMOTE_USER_HOST_ENV};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Main CLI structure for osync.
#[derive(Parser, Debug)]
#[command(
    name = "osync",
    version = crate::VERSION,
    about = "Opinionated rsyncing to my remotes",
    long_about = "Push or pull a path between a local proxy tree and a remote host with rsync, \
                  applying the include/exclude rules from the nearest osync.toml"
)]
#[command(group(
    ArgGroup::new("direction")
        .args(["push", "pull"])
        .required(true)
        .multiple(false)
))]
pub struct Cli {
    /// Send the path from the local proxy tree to the remote host
    #[arg(long)]
    pub push: bool,

    /// Fetch the path from the remote host into the local proxy tree
    #[arg(long)]
    pub pull: bool,

    #[arg(
        long,
        help = "Just sync this thing, don't consider the pre-configured include/exclude patterns"
    )]
    pub force: bool,

    #[arg(long, help = "Perform a dry run (don't actually sync)")]
    pub dry_run: bool,

    #[arg(
        value_name = "PATH",
        help = "The remote/local path to sync (will smartly obtain the counterpart path)"
    )]
    pub path: PathBuf,

    /// Filter configuration file (default: nearest osync.toml upward from the current directory)
    #[arg(long, value_name = "FILE", env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Local directory mirroring the remote root
    #[arg(long, value_name = "DIR", env = PROXY_ROOT_ENV, hide_env_values = true)]
    pub proxy_root: Option<PathBuf>,

    /// Remote identity as user@host
    #[arg(long, value_name = "USER@HOST", env = REMOTE_USER_HOST_ENV, hide_env_values = true)]
    pub remote: Option<String>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Direction selected by `--push` / `--pull`.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        if self.push {
            Direction::Push
        } else {
            Direction::Pull
        }
    }

    /// Startup overrides collected from the command line.
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            proxy_root: self.proxy_root.clone(),
            remote_user_host: self.remote.clone(),
            config_path: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_push_flags() {
        let cli = Cli::try_parse_from(["osync", "--push", "--force", "--dry-run", "some/path"])
            .unwrap();
        assert_eq!(cli.direction(), Direction::Push);
        assert!(cli.force);
        assert!(cli.dry_run);
        assert_eq!(cli.path, PathBuf::from("some/path"));
    }

    #[test]
    fn test_pull_defaults() {
        let cli = Cli::try_parse_from(["osync", "--pull", "."]).unwrap();
        assert_eq!(cli.direction(), Direction::Pull);
        assert!(!cli.force);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_push_and_pull_conflict() {
        let err = Cli::try_parse_from(["osync", "--push", "--pull", "."]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_direction_required() {
        let err = Cli::try_parse_from(["osync", "."]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_path_required() {
        let err = Cli::try_parse_from(["osync", "--push"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_overrides_become_settings() {
        let cli = Cli::try_parse_from([
            "osync",
            "--push",
            "--proxy-root",
            "/srv/proxy",
            "--remote",
            "me@box",
            "--config",
            "/tmp/osync.toml",
            "x",
        ])
        .unwrap();

        let settings = cli.settings();
        assert_eq!(settings.proxy_root, Some(PathBuf::from("/srv/proxy")));
        assert_eq!(settings.remote_user_host.as_deref(), Some("me@box"));
        assert_eq!(settings.config_path, Some(PathBuf::from("/tmp/osync.toml")));
    }
}
