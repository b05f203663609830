//! 스크립트 디렉토리 탐색.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{MigrationError, Result};

/// `*.sql` 스크립트 탐색기.
///
/// 하위 디렉토리는 보지 않으며 반환 순서는 보장하지 않습니다.
#[derive(Debug, Clone)]
pub struct ScriptLocator {
    extension: String,
}

impl Default for ScriptLocator {
    fn default() -> Self {
        Self {
            extension: "sql".to_string(),
        }
    }
}

impl ScriptLocator {
    /// 새 탐색기 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 디렉토리에서 스크립트 파일 목록 조회.
    ///
    /// # Errors
    ///
    /// - `MigrationError::DirectoryNotFound`: 디렉토리가 없음
    /// - `MigrationError::NoScriptsFound`: 일치하는 파일이 없음
    pub fn locate(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(MigrationError::DirectoryNotFound(dir.to_path_buf()));
        }

        let entries = fs::read_dir(dir).map_err(|e| MigrationError::io(dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MigrationError::io(dir, e))?;
            let path = entry.path();
            if path.is_file() && self.matches(&path) {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(MigrationError::NoScriptsFound(dir.to_path_buf()));
        }

        debug!(count = files.len(), dir = %dir.display(), "scripts located");
        Ok(files)
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = ScriptLocator::new().locate(&missing).unwrap_err();
        assert!(matches!(err, MigrationError::DirectoryNotFound(p) if p == missing));
    }

    #[test]
    fn test_no_scripts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), "not sql").unwrap();

        let err = ScriptLocator::new().locate(dir.path()).unwrap_err();
        assert!(matches!(err, MigrationError::NoScriptsFound(_)));
    }

    #[test]
    fn test_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("010_domains.sql"), "CREATE DOMAIN d AS INT;").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("020_tables.sql"), "").unwrap();
        fs::create_dir(dir.path().join("folder.sql")).unwrap();

        let files = ScriptLocator::new().locate(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("010_domains.sql")]);
    }
}
