use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::PipelineError;

/// Write `contents` to `path` via a temp file in the same directory, so the
/// destination is either the old file or the complete new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PipelineError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| PipelineError::write(path, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PipelineError::write(path, e))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| PipelineError::write(path, e))?;
    tmp.persist(path)
        .map_err(|e| PipelineError::write(path, e.error))?;
    Ok(())
}

/// Remove a file if present; a missing file is not an error.
pub fn remove_if_exists(path: &Path) -> Result<(), PipelineError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PipelineError::write(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("out.csv");

        write_atomic(&path, b"year,count\n").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"year,count\n");
    }

    #[test]
    fn test_write_atomic_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        fs::write(&path, "old contents that are longer").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        // No temp files left behind
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_reports_failing_path() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is expected
        let blocker = temp_dir.path().join("data");
        fs::write(&blocker, "").unwrap();
        let path = blocker.join("out.csv");

        match write_atomic(&path, b"x").unwrap_err() {
            PipelineError::Write { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_remove_if_exists_ignores_missing() {
        let temp_dir = TempDir::new().unwrap();
        remove_if_exists(&temp_dir.path().join("it_ran.txt")).unwrap();
    }
}
