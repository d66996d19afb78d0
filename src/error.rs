//! Error taxonomy for osync.
//!
//! Every failure belongs to one of three classes (see [`ErrorKind`]):
//!
//! - **Config**: required settings or the filter file are missing or unreadable
//! - **Validation**: a value was read but is not acceptable (bad literal,
//!   empty pattern list, unresolvable path)
//! - **Process**: the external `rsync` could not be run or exited non-zero
//!
//! The binary maps each error to an exit status through [`Error::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or unreadable configuration.
    Config,
    /// A configured or user-supplied value was rejected.
    Validation,
    /// The external synchronization tool failed.
    Process,
}

/// All errors produced by the osync library.
#[derive(Error, Debug)]
pub enum Error {
    /// Required environment variables were unset or empty (comma-separated names).
    #[error("Undefined or empty environment variable {0}")]
    MissingEnv(String),

    /// The filter configuration file was not found in any ancestor directory.
    #[error("file not found: {name} (searched upward from {})", .start.display())]
    ConfigNotFound {
        /// File name that was searched for
        name: String,
        /// Directory the search started from
        start: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        /// Path of the unreadable file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has mistyped fields.
    #[error("Failed to parse config file {}: {message}", .path.display())]
    ConfigParse {
        /// Path of the malformed file
        path: PathBuf,
        /// Parser diagnostic
        message: String,
    },

    /// A `direction` literal other than `push` or `pull`.
    #[error("'{0}' is not a valid Direction (expected 'push' or 'pull')")]
    InvalidDirection(String),

    /// A `kind` literal other than `include` or `exclude`.
    #[error("'{0}' is not a valid Kind (expected 'include' or 'exclude')")]
    InvalidKind(String),

    /// A filter group without any pattern.
    #[error("Filter group '{0}' must have at least 1 pattern")]
    EmptyPatterns(String),

    /// A relative path that does not live under the proxy root was given a remote mapping.
    #[error(
        "Cannot determine remote path for a relative path outside the proxy root: {}",
        .0.display()
    )]
    RelativeOutsideRoot(PathBuf),

    /// A path that rsync would not receive byte for byte.
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// Filesystem error while resolving a path (e.g. unreadable cwd).
    #[error("Failed to resolve path {}: {source}", .path.display())]
    PathResolution {
        /// Path being resolved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The synchronization program is not on `PATH`.
    #[error("'{program}' not found in PATH: {source}")]
    ToolNotFound {
        /// Program name that was looked up
        program: String,
        /// Lookup failure
        #[source]
        source: which::Error,
    },

    /// Spawning the synchronization program failed.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The synchronization program exited with a non-zero status.
    #[error("{program} failed with code {code}")]
    CommandFailed {
        /// Program that failed
        program: String,
        /// Exit status reported by the program
        code: i32,
    },

    /// The synchronization program was killed by a signal.
    #[error("{program} was terminated by signal {signal}")]
    CommandKilled {
        /// Program that was killed
        program: String,
        /// Signal number
        signal: i32,
    },
}

impl Error {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingEnv(_)
            | Self::ConfigNotFound { .. }
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. } => ErrorKind::Config,
            Self::InvalidDirection(_)
            | Self::InvalidKind(_)
            | Self::EmptyPatterns(_)
            | Self::RelativeOutsideRoot(_)
            | Self::NonUtf8Path(_)
            | Self::PathResolution { .. } => ErrorKind::Validation,
            Self::ToolNotFound { .. }
            | Self::Spawn { .. }
            | Self::CommandFailed { .. }
            | Self::CommandKilled { .. } => ErrorKind::Process,
        }
    }

    /// Exit status the binary should terminate with for this error.
    ///
    /// A failed transfer passes the tool's own status through so that
    /// scripts can tell rsync's failure modes apart.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } => *code,
            Self::CommandKilled { signal, .. } => 128 + *signal,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_message_names_variable() {
        let err = Error::MissingEnv("OSYNC_PROXY_ROOT".into());
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("environment variable OSYNC_PROXY_ROOT"));
    }

    #[test]
    fn test_validation_errors_are_classified() {
        assert_eq!(
            Error::InvalidDirection("sideways".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(Error::InvalidKind("maybe".into()).kind(), ErrorKind::Validation);
        assert_eq!(
            Error::RelativeOutsideRoot("a/b".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(Error::NonUtf8Path("/x".into()).kind(), ErrorKind::Validation);
        assert_eq!(Error::NonUtf8Path("/x".into()).exit_code(), 1);
    }

    #[test]
    fn test_command_failed_propagates_code() {
        let err = Error::CommandFailed {
            program: "rsync".into(),
            code: 23,
        };
        assert_eq!(err.kind(), ErrorKind::Process);
        assert_eq!(err.exit_code(), 23);
        assert_eq!(err.to_string(), "rsync failed with code 23");
    }

    #[test]
    fn test_killed_maps_to_shell_convention() {
        let err = Error::CommandKilled {
            program: "rsync".into(),
            signal: 2,
        };
        assert_eq!(err.exit_code(), 130);
    }

    #[test]
    fn test_config_errors_exit_one() {
        let err = Error::ConfigNotFound {
            name: "osync.toml".into(),
            start: "/tmp".into(),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("file not found: osync.toml"));
    }
}
