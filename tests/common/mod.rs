#![allow(dead_code)]

use anyhow::Result;
use osync::OsyncContext;
use osync::config::{CONFIG_FILE_NAME, FilterConfig};
use osync::resolver::PathResolver;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Remote identity used throughout the tests
pub const HOST: &str = "user@host";

/// Proxy root fixture with an `osync.toml` at its top
pub struct TestProxy {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl TestProxy {
    /// Create a proxy root whose configuration file holds `config`
    pub fn new(config: &str) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().canonicalize()?;
        fs::write(root.join(CONFIG_FILE_NAME), config)?;
        Ok(Self { temp_dir, root })
    }

    /// Proxy root without any configuration file
    pub fn bare() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().canonicalize()?;
        Ok(Self { temp_dir, root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn resolver(&self) -> Result<PathResolver> {
        Ok(PathResolver::new(Some(&self.root), Some(HOST))?)
    }

    pub fn context(&self) -> Result<OsyncContext> {
        let config = FilterConfig::load(&self.config_path())?;
        Ok(OsyncContext::new_explicit(
            self.resolver()?,
            self.config_path(),
            config,
        ))
    }

    /// Create a file (and its parents) under the proxy root
    pub fn create_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }
}

/// A stand-in `rsync` that records its arguments, one per line, and exits
/// with `$FAKE_RSYNC_EXIT` (default 0)
#[cfg(unix)]
pub struct FakeRsync {
    pub temp_dir: TempDir,
    pub argv_file: PathBuf,
}

#[cfg(unix)]
impl FakeRsync {
    pub fn new() -> Result<Self> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new()?;
        let argv_file = temp_dir.path().join("argv");
        let script = temp_dir.path().join("rsync");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\nexit \"${{FAKE_RSYNC_EXIT:-0}}\"\n",
                argv_file.display()
            ),
        )?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;

        Ok(Self {
            temp_dir,
            argv_file,
        })
    }

    /// `PATH` value that finds the fake first
    pub fn path_env(&self) -> String {
        let inherited = std::env::var("PATH").unwrap_or_default();
        format!("{}:{inherited}", self.temp_dir.path().display())
    }

    /// Arguments the fake received on its last run
    pub fn recorded_args(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.argv_file)?;
        Ok(content.lines().map(ToString::to_string).collect())
    }

    pub fn was_called(&self) -> bool {
        self.argv_file.exists()
    }
}
