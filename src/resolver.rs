//! Translation between the local proxy tree and the remote filesystem.
//!
//! The proxy root is a local directory standing in for `/` on the remote
//! host. A path under it maps to the same relative location under `/`
//! remotely, and an absolute path outside it is taken to already be a
//! remote path:
//!
//! ```text
//!   local                              remote
//!   <proxy_root>/project/file.txt  <-> user@host:/project/file.txt
//!   <proxy_root>/etc/hosts         <-> user@host:/etc/hosts
//! ```
//!
//! Which namespace a CLI argument was meant in is inferred from its shape:
//! under the proxy root, relative, or absolute outside the root.

use crate::error::{Error, Result};
use crate::filter::Direction;
use crate::utils::paths;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the local proxy root.
pub const PROXY_ROOT_ENV: &str = "OSYNC_PROXY_ROOT";

/// Environment variable holding the `user@host` remote identity.
pub const REMOTE_USER_HOST_ENV: &str = "OSYNC_REMOTE_USER_HOST";

/// Maps paths between the local proxy tree and the remote host.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Resolved absolute proxy root
    proxy_root: PathBuf,
    /// `user@host` prefix for remote specifications
    remote_user_host: String,
}

/// A resolved `(source, destination)` pair ready for the command builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Where files are read from
    pub source: String,
    /// Directory files are written into
    pub dest: String,
}

impl PathResolver {
    /// Creates a resolver from explicit values, falling back to the
    /// environment for whichever is `None`.
    ///
    /// An empty value counts as missing.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingEnv`] listing each value neither given nor set in the environment
    /// - [`Error::PathResolution`] if the proxy root cannot be made absolute
    pub fn new(proxy_root: Option<&Path>, remote_user_host: Option<&str>) -> Result<Self> {
        let proxy_root = match proxy_root {
            Some(root) if !root.as_os_str().is_empty() => Some(root.to_path_buf()),
            _ => env_value(PROXY_ROOT_ENV).map(PathBuf::from),
        };
        let remote_user_host = match remote_user_host {
            Some(host) if !host.is_empty() => Some(host.to_string()),
            _ => env_value(REMOTE_USER_HOST_ENV),
        };

        let (proxy_root, remote_user_host) = match (proxy_root, remote_user_host) {
            (Some(root), Some(host)) => (root, host),
            (root, host) => {
                let missing: Vec<&str> = [
                    root.is_none().then_some(PROXY_ROOT_ENV),
                    host.is_none().then_some(REMOTE_USER_HOST_ENV),
                ]
                .into_iter()
                .flatten()
                .collect();
                return Err(Error::MissingEnv(missing.join(", ")));
            }
        };

        let expanded = paths::expand_tilde(&proxy_root);
        let proxy_root = paths::resolve(&expanded).map_err(|source| Error::PathResolution {
            path: expanded.clone(),
            source,
        })?;

        debug!(proxy_root = %proxy_root.display(), remote = %remote_user_host, "Path resolver ready");

        Ok(Self {
            proxy_root,
            remote_user_host,
        })
    }

    /// Creates a resolver purely from `OSYNC_PROXY_ROOT` and `OSYNC_REMOTE_USER_HOST`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEnv`] naming every unset variable.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None)
    }

    /// Resolved absolute proxy root.
    #[must_use]
    pub fn proxy_root(&self) -> &Path {
        &self.proxy_root
    }

    /// Current `user@host` identity.
    #[must_use]
    pub fn remote_user_host(&self) -> &str {
        &self.remote_user_host
    }

    /// Retargets subsequent remote specifications at another host.
    pub fn set_remote_user_host(&mut self, remote_user_host: impl Into<String>) {
        self.remote_user_host = remote_user_host.into();
    }

    /// Prefixes a remote path with `user@host:`.
    #[must_use]
    pub fn qualify(&self, remote: &Path) -> String {
        format!("{}:{}", self.remote_user_host, remote.display())
    }

    /// Remote-side path for `path`, without the host prefix.
    ///
    /// # Errors
    ///
    /// - [`Error::RelativeOutsideRoot`] for a relative path that does not resolve under the proxy root
    /// - [`Error::PathResolution`] if the working directory is unavailable
    pub fn remote_path(&self, path: &Path) -> Result<PathBuf> {
        let resolved = canonical(path)?;

        if let Ok(relative) = resolved.strip_prefix(&self.proxy_root) {
            let remote = Path::new("/").join(relative);
            debug!(path = %path.display(), remote = %remote.display(), "Under proxy root");
            return Ok(remote);
        }

        if !path.is_absolute() {
            return Err(Error::RelativeOutsideRoot(path.to_path_buf()));
        }

        debug!(path = %path.display(), "Absolute path outside proxy root, already remote");
        Ok(path.to_path_buf())
    }

    /// Host-qualified remote specification for `path`.
    ///
    /// # Errors
    ///
    /// Same as [`PathResolver::remote_path`], plus [`Error::NonUtf8Path`]
    /// when the remote path cannot be passed to rsync unchanged.
    pub fn to_remote(&self, path: &Path) -> Result<String> {
        let remote = self.remote_path(path)?;
        utf8(&remote)?;
        Ok(self.qualify(&remote))
    }

    /// Local path for `path`.
    ///
    /// - under the proxy root: its canonical form
    /// - relative and outside: resolved against the working directory
    /// - absolute and outside: a remote path, re-rooted under the proxy root
    ///   after folding `.` and `..`
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathResolution`] if the working directory is unavailable.
    pub fn to_local(&self, path: &Path) -> Result<PathBuf> {
        let resolved = canonical(path)?;

        if paths::is_within_directory(&resolved, &self.proxy_root) || !path.is_absolute() {
            return Ok(resolved);
        }

        // `..` is folded first so the result can never climb above the proxy root.
        let remote = paths::normalize_lexically(path);
        let relative = remote.strip_prefix("/").unwrap_or(&remote);
        if relative.as_os_str().is_empty() {
            return Ok(self.proxy_root.clone());
        }
        let local = self.proxy_root.join(relative);
        debug!(path = %path.display(), local = %local.display(), "Re-rooted remote path under proxy root");
        Ok(local)
    }

    /// Source and destination for a transfer of `path` going `direction`.
    ///
    /// The destination is the counterpart's parent directory followed by
    /// `/.`, so the item keeps its relative location on the receiving side.
    /// The proxy root itself pairs with the remote root: its contents are
    /// synced into `/.` on push, and the remote root's contents into
    /// `<proxy_root>/.` on pull.
    ///
    /// Only UTF-8 paths can be handed to rsync.
    ///
    /// # Errors
    ///
    /// Propagates [`PathResolver::to_local`] and [`PathResolver::remote_path`]
    /// errors, and returns [`Error::NonUtf8Path`] for a path rsync would
    /// receive altered.
    pub fn endpoints(&self, direction: Direction, path: &Path) -> Result<Endpoints> {
        let remote = self.remote_path(path)?;
        let is_root = remote == Path::new("/");

        let endpoints = match direction {
            Direction::Push if is_root => Endpoints {
                source: contents_of(&self.proxy_root)?,
                dest: format!("{}:/.", self.remote_user_host),
            },
            Direction::Push => Endpoints {
                source: utf8(&self.to_local(path)?)?.to_string(),
                dest: format!("{}:{}", self.remote_user_host, into_directory(&remote)?),
            },
            Direction::Pull if is_root => Endpoints {
                source: self.to_remote(path)?,
                dest: contents_of(&self.proxy_root)?,
            },
            Direction::Pull => Endpoints {
                source: self.to_remote(path)?,
                dest: into_directory(&self.to_local(path)?)?,
            },
        };
        debug!(%direction, source = %endpoints.source, dest = %endpoints.dest, "Endpoints resolved");
        Ok(endpoints)
    }
}

/// Canonical absolute form of `path`.
fn canonical(path: &Path) -> Result<PathBuf> {
    paths::resolve(path).map_err(|source| Error::PathResolution {
        path: path.to_path_buf(),
        source,
    })
}

/// Borrows `path` as UTF-8 text.
fn utf8(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))
}

/// Directory `path` written as `<path>/.`, meaning its contents.
fn contents_of(path: &Path) -> Result<String> {
    let dir = utf8(path)?;
    if dir.ends_with('/') {
        Ok(format!("{dir}."))
    } else {
        Ok(format!("{dir}/."))
    }
}

/// Parent directory of `path` written as `<parent>/.`.
fn into_directory(path: &Path) -> Result<String> {
    contents_of(path.parent().unwrap_or(path))
}

/// Reads a variable, treating an empty value as unset.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
