use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Platform user directory: `%APPDATA%` on Windows, `$HOME` elsewhere.
fn user_base_dir() -> Result<PathBuf> {
    let var = if cfg!(windows) { "APPDATA" } else { "HOME" };
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("{var} is not set; cannot resolve home_dir"))
}

/// Resolve the server home directory.
///
/// * `None` (or empty) gives `<user dir>/<default_subdir>`.
/// * A leading `~` is expanded against the user directory.
/// * Relative paths are made absolute against the current directory.
///
/// With `create`, the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured.as_deref().map(str::trim) {
        None | Some("") => user_base_dir()?.join(default_subdir),
        Some("~") => user_base_dir()?,
        Some(p) => match p.strip_prefix("~/").or_else(|| p.strip_prefix("~\\")) {
            Some(rest) => user_base_dir()?.join(rest),
            None => PathBuf::from(p),
        },
    };

    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("cannot read current directory")?
            .join(path)
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home_dir {}", path.display()))?;
    }
    Ok(path)
}

/// Join `file` onto `base` unless it is already absolute.
pub fn resolve_under(base: &Path, file: &str) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_absolute_dir_is_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("a/b");

        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().into_owned()), ".x", true).unwrap();

        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn relative_dir_becomes_absolute() {
        let resolved = resolve_home_dir(Some("some/rel".into()), ".x", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/rel"));
    }

    #[test]
    fn resolve_under_keeps_absolute_paths() {
        let tmp = tempdir().unwrap();
        let abs = tmp.path().join("x.log");
        assert_eq!(resolve_under(Path::new("/base"), abs.to_str().unwrap()), abs);
        assert_eq!(
            resolve_under(Path::new("/base"), "logs/x.log"),
            Path::new("/base").join("logs/x.log")
        );
    }
}
