/// Shared filesystem helpers.
pub mod fs {
    use std::path::Path;

    use anyhow::{Context, Result, anyhow, bail};
    use camino::Utf8PathBuf;

    pub fn current_working_dir() -> Result<Utf8PathBuf> {
        let cwd = std::env::current_dir().context("determining current directory")?;
        Utf8PathBuf::from_path_buf(cwd).map_err(|_| anyhow!("current directory is not valid UTF-8"))
    }

    /// Absolute, symlink-free form of an existing directory.
    pub fn canonical_dir(path: &Path) -> Result<Utf8PathBuf> {
        let resolved = std::fs::canonicalize(path)
            .with_context(|| format!("resolving {}", path.display()))?;
        if !resolved.is_dir() {
            bail!("{} is not a directory", resolved.display());
        }
        Utf8PathBuf::from_path_buf(resolved)
            .map_err(|path| anyhow!("{} is not valid UTF-8", path.display()))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn canonical_dir_resolves_dot_segments() {
            let tmp = TempDir::new().unwrap();
            std::fs::create_dir(tmp.path().join("inner")).unwrap();
            let messy = tmp.path().join("inner").join("..").join("inner");
            let resolved = canonical_dir(&messy).unwrap();
            assert!(resolved.is_absolute());
            assert!(resolved.ends_with("inner"));
            assert!(!resolved.as_str().contains(".."));
        }

        #[test]
        fn canonical_dir_rejects_files_and_missing_paths() {
            let tmp = TempDir::new().unwrap();
            let file = tmp.path().join("f.txt");
            std::fs::write(&file, "").unwrap();
            assert!(canonical_dir(&file).unwrap_err().to_string().contains("not a directory"));
            assert!(canonical_dir(&tmp.path().join("missing")).is_err());
        }
    }
}
