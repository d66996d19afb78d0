#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # osync - Opinionated rsync between a local proxy tree and a remote host
//!
//! A local directory (the *proxy root*) stands in for `/` on one remote
//! host. Given any path, osync works out its counterpart on the other side
//! and runs `rsync` with the include/exclude rules configured for that
//! direction in the nearest `osync.toml`.
//!
//! ## Architecture
//!
//! - [`filter`]: validated include/exclude rule groups
//! - [`resolver`]: local/remote path translation
//! - [`rsync`]: argument vector construction and execution
//! - [`config`]: `osync.toml` discovery, parsing and validation
//! - [`commands`]: the push/pull operation tying the pieces together
//! - [`output`]: colored user-facing messages
//!
//! ## Example Usage
//!
//! ```no_run
//! use osync::OsyncContext;
//! use osync::config::Settings;
//! use osync::filter::Direction;
//! use std::path::Path;
//!
//! # fn main() -> osync::Result<()> {
//! let ctx = OsyncContext::new(&Settings::default())?;
//! osync::commands::transfer::execute(&ctx, Direction::Push, Path::new("."), false, true)?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface definition (argument parsing structures).
pub mod cli;

/// Command implementations.
pub mod commands;

/// Configuration discovery, parsing, and validation.
pub mod config;

/// Error types and exit status mapping.
pub mod error;

/// Include/exclude filter groups.
pub mod filter;

/// Output formatting for the terminal.
pub mod output;

/// Local/remote path resolution.
pub mod resolver;

/// rsync command construction and execution.
pub mod rsync;

/// Utility functions and helpers.
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use error::{Error, ErrorKind, Result};

use config::{FilterConfig, Settings};
use resolver::PathResolver;
use std::path::PathBuf;

/// Current version of the osync binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding tracing filter directives.
pub const LOG_ENV: &str = "OSYNC_LOG";

/// Everything one transfer needs, assembled once at startup.
///
/// # Examples
///
/// ```no_run
/// use osync::OsyncContext;
/// use osync::config::{FilterConfig, Settings};
/// use osync::resolver::PathResolver;
/// use std::path::{Path, PathBuf};
///
/// # fn main() -> osync::Result<()> {
/// // From command-line overrides, the environment and the nearest osync.toml
/// let ctx = OsyncContext::new(&Settings::default())?;
///
/// // From explicit values (for testing)
/// let resolver = PathResolver::new(Some(Path::new("/srv/proxy")), Some("me@box"))?;
/// let ctx = OsyncContext::new_explicit(resolver, PathBuf::new(), FilterConfig::default());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OsyncContext {
    /// Path mapping between the proxy tree and the remote host.
    pub resolver: PathResolver,

    /// Configuration file the filter groups came from.
    pub config_path: PathBuf,

    /// Loaded filter groups.
    pub config: FilterConfig,
}

impl OsyncContext {
    /// Creates a context from startup settings.
    ///
    /// The proxy root and host identity are checked before the filter file
    /// is looked up, so missing environment is reported first.
    ///
    /// # Errors
    /// Returns an error if a required setting is missing, or if the
    /// configuration file cannot be found, read, or validated.
    pub fn new(settings: &Settings) -> Result<Self> {
        let resolver = settings.resolve()?;
        let config_path = settings.config_file()?;
        let config = FilterConfig::load(&config_path)?;

        Ok(Self {
            resolver,
            config_path,
            config,
        })
    }

    /// Creates a context from already-built parts.
    #[must_use]
    pub const fn new_explicit(
        resolver: PathResolver,
        config_path: PathBuf,
        config: FilterConfig,
    ) -> Self {
        Self {
            resolver,
            config_path,
            config,
        }
    }
}
