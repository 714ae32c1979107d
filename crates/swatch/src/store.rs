// ABOUTME: Read-only access to token files behind a trait
// ABOUTME: Filesystem store for real runs, in-memory store for plan tests

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Source of token file listings and contents
pub trait TokenStore {
    /// Names of the regular files directly inside `dir`, sorted
    fn list(&self, dir: &Path) -> io::Result<Vec<String>>;

    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Names in `files` ending in `.{extension}`, case-insensitively
pub fn with_extension(files: &[String], extension: &str) -> Vec<String> {
    files
        .iter()
        .filter(|name| {
            Path::new(name)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsTokenStore;

impl TokenStore for FsTokenStore {
    fn list(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Files held in memory, keyed by full path
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl TokenStore for MemoryTokenStore {
    fn list(&self, dir: &Path) -> io::Result<Vec<String>> {
        let names: Vec<String> = self
            .files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect();

        if names.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            ));
        }
        Ok(names)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_lists_direct_children_sorted() {
        let store = MemoryTokenStore::new()
            .with_file("tokens/themes/ember.json", "{}")
            .with_file("tokens/themes/dusk.json", "{}")
            .with_file("tokens/themes/nested/x.json", "{}")
            .with_file("tokens/semantic/light.json", "{}");

        assert_eq!(
            store.list(Path::new("tokens/themes")).unwrap(),
            vec!["dusk.json", "ember.json"]
        );
        assert!(store.list(Path::new("tokens/missing")).is_err());
    }

    #[test]
    fn test_memory_store_read() {
        let store = MemoryTokenStore::new().with_file("a.json", "{\"a\": 1}");
        assert_eq!(store.read(Path::new("a.json")).unwrap(), "{\"a\": 1}");
        let err = store.read(Path::new("b.json")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_fs_store_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.css"), "").unwrap();
        std::fs::write(dir.path().join("a.css"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub.css")).unwrap();

        let names = FsTokenStore.list(dir.path()).unwrap();
        assert_eq!(names, vec!["a.css", "b.css"]);
    }

    #[test]
    fn test_with_extension() {
        let files = vec![
            "arctic.css".to_string(),
            "README.md".to_string(),
            "ember.CSS".to_string(),
            "css".to_string(),
        ];
        assert_eq!(with_extension(&files, "css"), vec!["arctic.css", "ember.CSS"]);
    }
}
