//! Path normalization helpers.
use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` to `home`.
///
/// Only the bare `~` and `~/...` forms are expanded; `~user` is left alone.
/// Returns `None` if `path` needs expanding but `home` is unknown.
#[must_use]
pub fn expand_home(path: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Some(path.to_path_buf());
    };
    let home = home?;
    if rest.as_os_str().is_empty() {
        Some(home.to_path_buf())
    } else {
        Some(home.join(rest))
    }
}

/// Make `path` absolute against `cwd` and fold `.` and `..` lexically.
///
/// Symlinks are not resolved and the path does not need to exist, so
/// template placeholders such as `{{NAME}}` pass through untouched.
#[must_use]
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    dunce::simplified(&normalize_lexically(&joined)).to_path_buf()
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root, matching POSIX semantics.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(Component::ParentDir),
            },
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(Component::CurDir);
    }
    out
}

/// The user's home directory: `HOME` if set and non-empty, otherwise the
/// account database entry.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_home_bare_tilde() {
        let home = Path::new("/home/ops");
        assert_eq!(expand_home(Path::new("~"), Some(home)).as_deref(), Some(home));
    }

    #[test]
    fn expand_home_tilde_prefix() {
        assert_eq!(
            expand_home(Path::new("~/svc"), Some(Path::new("/home/ops"))),
            Some(PathBuf::from("/home/ops/svc"))
        );
    }

    #[test]
    fn expand_home_leaves_other_paths() {
        let home = Some(Path::new("/home/ops"));
        for path in ["/opt/svc", "~ops/svc", "svc/~"] {
            assert_eq!(expand_home(Path::new(path), home), Some(PathBuf::from(path)));
        }
    }

    #[test]
    fn expand_home_without_home_fails_for_tilde() {
        assert_eq!(expand_home(Path::new("~/svc"), None), None);
        assert_eq!(expand_home(Path::new("~"), None), None);
    }

    #[test]
    fn expand_home_without_home_keeps_plain_paths() {
        assert_eq!(
            expand_home(Path::new("/opt/svc"), None),
            Some(PathBuf::from("/opt/svc"))
        );
    }

    #[test]
    fn absolutize_relative_joins_cwd() {
        assert_eq!(
            absolutize(Path::new("svc/./exporters"), Path::new("/work")),
            PathBuf::from("/work/svc/exporters")
        );
    }

    #[test]
    fn absolutize_folds_parent_components() {
        assert_eq!(
            absolutize(Path::new("../svc/a/../b"), Path::new("/work/dir")),
            PathBuf::from("/work/svc/b")
        );
    }

    #[test]
    fn absolutize_keeps_absolute_input() {
        assert_eq!(
            absolutize(Path::new("/srv/{{NAME}}"), Path::new("/work")),
            PathBuf::from("/srv/{{NAME}}")
        );
    }

    #[test]
    fn parent_of_root_is_root() {
        assert_eq!(normalize_lexically(Path::new("/../x")), PathBuf::from("/x"));
    }

    #[test]
    fn normalize_relative_keeps_leading_parent() {
        assert_eq!(normalize_lexically(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(normalize_lexically(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(normalize_lexically(Path::new("../../x")), PathBuf::from("../../x"));
    }
}
