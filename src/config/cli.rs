use crate::core::combine::normalize_path;
use crate::core::Storage;
use crate::utils::error::{CombineError, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn list_files(&self) -> Result<Vec<OsString>> {
        let list_error = |source| CombineError::ListDirectoryError {
            path: self.base_path.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.base_path)
            .await
            .map_err(list_error)?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(list_error)? {
            // Follows symlinks. Entries that cannot be stat'ed (dangling or
            // unreadable links) stay listed so reading them fails loudly.
            match tokio::fs::metadata(entry.path()).await {
                Ok(meta) if !meta.is_file() => {
                    tracing::debug!("Skipping {:?}: not a regular file", entry.file_name());
                }
                _ => names.push(entry.file_name()),
            }
        }

        Ok(names)
    }

    async fn read_file(&self, name: &OsStr) -> Result<Vec<u8>> {
        tokio::fs::read(self.full_path(name))
            .await
            .map_err(|source| CombineError::ReadSourceError {
                file: name.to_string_lossy().into_owned(),
                source,
            })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);
        let write_error = |source| CombineError::WriteOutputError {
            path: full_path.clone(),
            source,
        };

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
            }
        }

        tokio::fs::write(&full_path, data).await.map_err(write_error)?;
        Ok(())
    }

    fn location(&self, path: &str) -> String {
        self.full_path(path).display().to_string()
    }

    async fn is_same_file(&self, path: &str, name: &OsStr) -> bool {
        let target = self.full_path(path);
        let candidate = self.full_path(name);
        if normalize_path(&target) == normalize_path(&candidate) {
            return true;
        }

        // Different spellings (absolute vs relative, symlinked dirs) of an
        // existing output. An output that does not exist yet is not listed.
        match (
            tokio::fs::canonicalize(&target).await,
            tokio::fs::canonicalize(&candidate).await,
        ) {
            (Ok(target), Ok(candidate)) => target == candidate,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_files_skips_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "h\n1\n").unwrap();
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let storage = LocalStorage::new(dir.path());
        let names = storage.list_files().await.unwrap();

        assert_eq!(names, vec![OsString::from("a.txt")]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_is_listed_and_fails_to_read() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("b.txt")).unwrap();

        let storage = LocalStorage::new(dir.path());
        let names = storage.list_files().await.unwrap();
        assert_eq!(names, vec![OsString::from("b.txt")]);

        let err = storage.read_file(OsStr::new("b.txt")).await.unwrap_err();
        assert!(matches!(err, CombineError::ReadSourceError { ref file, .. } if file == "b.txt"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_names_are_listed() {
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"caf\xe9.txt");
        std::fs::write(dir.path().join(name), "h\n1\n").unwrap();

        let storage = LocalStorage::new(dir.path());
        assert_eq!(storage.list_files().await.unwrap(), vec![name.to_os_string()]);
        assert_eq!(storage.read_file(name).await.unwrap(), b"h\n1\n");
    }

    #[tokio::test]
    async fn test_missing_directory_is_a_list_error() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("missing"));

        let err = storage.list_files().await.unwrap_err();
        assert!(matches!(err, CombineError::ListDirectoryError { .. }));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("out/combined.csv", b"a,1\n").await.unwrap();
        assert_eq!(
            storage.read_file(OsStr::new("out/combined.csv")).await.unwrap(),
            b"a,1\n"
        );

        let err = storage.read_file(OsStr::new("nope.txt")).await.unwrap_err();
        assert!(matches!(err, CombineError::ReadSourceError { ref file, .. } if file == "nope.txt"));
    }

    #[tokio::test]
    async fn test_is_same_file_across_spellings() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("merged.txt"), "").unwrap();
        let storage = LocalStorage::new(dir.path());
        let name = OsStr::new("merged.txt");

        assert!(storage.is_same_file("merged.txt", name).await);
        assert!(storage.is_same_file("./merged.txt", name).await);
        assert!(storage.is_same_file("sub/../merged.txt", name).await);

        let absolute = dir.path().join("merged.txt");
        assert!(storage.is_same_file(absolute.to_str().unwrap(), name).await);

        assert!(!storage.is_same_file("other.txt", name).await);
        assert!(!storage.is_same_file("sub/merged.txt", name).await);
    }
}
