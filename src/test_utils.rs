#[cfg(test)]
pub mod fixtures {
    use crate::OsyncContext;
    use crate::config::{CONFIG_FILE_NAME, FilterConfig};
    use crate::resolver::PathResolver;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// A throwaway proxy root with an `osync.toml` at its top.
    pub struct TestProxy {
        pub temp_dir: TempDir,
        pub config_path: PathBuf,
    }

    impl TestProxy {
        pub fn with_config(content: &str) -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
            fs::write(&config_path, content).unwrap();

            Self {
                temp_dir,
                config_path,
            }
        }

        pub fn resolver(&self) -> PathResolver {
            PathResolver::new(Some(self.temp_dir.path()), Some("user@host")).unwrap()
        }

        pub fn context(&self) -> OsyncContext {
            let config = FilterConfig::load(&self.config_path).unwrap();
            OsyncContext::new_explicit(self.resolver(), self.config_path.clone(), config)
        }

        pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
            let path = self.temp_dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
            path
        }
    }
}

#[cfg(test)]
pub use fixtures::TestProxy;
