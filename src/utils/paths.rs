use std::io;
use std::path::{Component, Path, PathBuf};

/// Expands a leading `~` to the home directory
///
/// Paths without a tilde, and paths when the home directory is unknown,
/// are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Some(path_str) = path.to_str() else {
        return path.to_path_buf();
    };

    if path_str == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    if let Some(rest) = path_str.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

/// Makes a path absolute, resolving relative paths from current directory
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined
pub fn make_absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir()?;
        Ok(current_dir.join(path))
    }
}

/// Folds `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !path.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(if path.has_root() { "/" } else { "." });
    }
    out
}

/// Resolves a path to a canonical absolute form without requiring it to exist
///
/// The longest existing ancestor is canonicalized (following symlinks) and
/// the remaining, not-yet-existing components are appended after lexical
/// normalization.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    let absolute = normalize_lexically(&make_absolute(path)?);

    let mut existing = absolute.as_path();
    let mut tail = Vec::new();
    loop {
        match existing.canonicalize() {
            Ok(canonical) => {
                let mut resolved = canonical;
                for name in tail.iter().rev() {
                    resolved.push(name);
                }
                return Ok(resolved);
            }
            Err(_) => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    tail.push(name.to_os_string());
                    existing = parent;
                }
                _ => return Ok(absolute),
            },
        }
    }
}

/// Checks if a path is within a base directory (both taken as already resolved)
#[must_use]
pub fn is_within_directory(path: &Path, base: &Path) -> bool {
    path.starts_with(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();

        let tilde_path = PathBuf::from("~/documents");
        assert_eq!(expand_tilde(&tilde_path), home.join("documents"));

        let just_tilde = PathBuf::from("~");
        assert_eq!(expand_tilde(&just_tilde), home);

        let no_tilde = PathBuf::from("/absolute/path");
        assert_eq!(expand_tilde(&no_tilde), no_tilde);

        let other_user = PathBuf::from("~alice/x");
        assert_eq!(expand_tilde(&other_user), other_user);
    }

    #[test]
    fn test_make_absolute() {
        let absolute = PathBuf::from("/absolute/path");
        assert_eq!(make_absolute(&absolute).unwrap(), absolute);

        let relative = PathBuf::from("relative/path");
        let result = make_absolute(&relative).unwrap();
        assert!(result.is_absolute());
        assert!(result.ends_with("relative/path"));
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(normalize_lexically(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(normalize_lexically(Path::new("/")), PathBuf::from("/"));
        assert_eq!(normalize_lexically(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(normalize_lexically(Path::new("../a")), PathBuf::from("../a"));
    }

    #[test]
    fn test_resolve_missing_leaf() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();

        let missing = base.join("not/yet/here.txt");
        assert_eq!(resolve(&missing).unwrap(), missing);
    }

    #[test]
    fn test_resolve_follows_existing_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let real = base.join("real");
        fs::create_dir_all(&real).unwrap();

        #[cfg(unix)]
        {
            let link = base.join("link");
            std::os::unix::fs::symlink(&real, &link).unwrap();
            assert_eq!(
                resolve(&link.join("file.txt")).unwrap(),
                real.join("file.txt")
            );
        }
    }

    #[test]
    fn test_resolve_folds_dot_dot_before_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();

        let path = base.join("missing/../other.txt");
        assert_eq!(resolve(&path).unwrap(), base.join("other.txt"));
    }

    #[test]
    fn test_is_within_directory() {
        let base = Path::new("/srv/proxy");
        assert!(is_within_directory(Path::new("/srv/proxy/a/b"), base));
        assert!(is_within_directory(Path::new("/srv/proxy"), base));
        assert!(!is_within_directory(Path::new("/srv/proxy2/a"), base));
        assert!(!is_within_directory(Path::new("/tmp/outside"), base));
    }
}
