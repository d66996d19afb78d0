//! `osync.toml` discovery and loading.
//!
//! The file holds an array of `[[filter]]` tables:
//!
//! ```toml
//! [[filter]]
//! direction = "push"
//! kind = "include"
//! patterns = ["*.py", "*.md"]
//! ```

/// TOML deserialization into validated filter groups.
pub mod parser;
/// Non-fatal checks for unknown keys and repeated groups.
pub mod validator;

use crate::error::{Error, Result};
use crate::filter::{Direction, FilterGroup};
use crate::resolver::PathResolver;
use crate::utils::expand_tilde;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the filter configuration file looked up from the working directory.
pub const CONFIG_FILE_NAME: &str = "osync.toml";

/// Environment variable that pins the configuration file path.
pub const CONFIG_PATH_ENV: &str = "OSYNC_CONFIG";

/// Validated contents of `osync.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Filter groups in file order
    pub filters: Vec<FilterGroup>,
}

impl FilterConfig {
    /// Load and validate a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file is not valid TOML or has mistyped fields
    /// - Any filter group fails validation
    pub fn load(path: &Path) -> Result<Self> {
        let config = parser::parse_config_file(path)?;
        validator::ConfigValidator::new().warn_duplicates(&config);
        Ok(config)
    }

    /// Discover `osync.toml` from `start` upward and load it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] when no ancestor holds the file, or
    /// any error of [`FilterConfig::load`].
    pub fn discover(start: &Path) -> Result<(PathBuf, Self)> {
        let path = find_up(start, CONFIG_FILE_NAME)?;
        let config = Self::load(&path)?;
        Ok((path, config))
    }

    /// Groups taking part in a transfer going `direction`, in file order.
    pub fn for_direction(&self, direction: Direction) -> impl Iterator<Item = &FilterGroup> {
        self.filters
            .iter()
            .filter(move |group| group.applies_to(direction))
    }
}

/// Startup values given on the command line.
///
/// Anything left `None` falls back to the environment (proxy root, host
/// identity) or to discovery from the working directory (config file).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Overrides `OSYNC_PROXY_ROOT`
    pub proxy_root: Option<PathBuf>,
    /// Overrides `OSYNC_REMOTE_USER_HOST`
    pub remote_user_host: Option<String>,
    /// Skips discovery and loads this file
    pub config_path: Option<PathBuf>,
}

impl Settings {
    /// Build the path resolver, failing if either required value is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEnv`] or [`Error::PathResolution`].
    pub fn resolve(&self) -> Result<PathResolver> {
        PathResolver::new(self.proxy_root.as_deref(), self.remote_user_host.as_deref())
    }

    /// Configuration file to load: the explicit one, or the nearest
    /// `osync.toml` above the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] when discovery fails, or
    /// [`Error::PathResolution`] if the working directory is unavailable.
    pub fn config_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.config_path {
            return Ok(expand_tilde(path));
        }

        let cwd = std::env::current_dir().map_err(|source| Error::PathResolution {
            path: PathBuf::from("."),
            source,
        })?;
        find_up(&cwd, CONFIG_FILE_NAME)
    }
}

/// Search `start` and each of its ancestors for a regular file called `name`.
///
/// The search stops at the filesystem root.
///
/// # Errors
///
/// Returns [`Error::ConfigNotFound`] if no directory on the way up contains the file.
pub fn find_up(start: &Path, name: &str) -> Result<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(name);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "Found configuration file");
            return Ok(candidate);
        }
        dir = current.parent();
    }

    Err(Error::ConfigNotFound {
        name: name.to_string(),
        start: start.to_path_buf(),
    })
}
