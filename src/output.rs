//! Output File System - injectable capability for everything the pipeline
//! touches on disk besides the rasterizer itself.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputPathError {
    #[error("Output directory does not exist: {0}")]
    Missing(PathBuf),

    #[error("Output path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

pub trait OutputFs {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    /// Must succeed when the directory already exists
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    /// Must succeed when the file does not exist
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// The real file system
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl OutputFs for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

pub fn validate_output_root(fs: &dyn OutputFs, out_dir: &Path) -> Result<(), OutputPathError> {
    if !fs.exists(out_dir) {
        return Err(OutputPathError::Missing(out_dir.to_path_buf()));
    }
    if !fs.is_dir(out_dir) {
        return Err(OutputPathError::NotADirectory(out_dir.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_directory_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_output_root(&StdFs, dir.path()).is_ok());
    }

    #[test]
    fn test_missing_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            validate_output_root(&StdFs, &missing),
            Err(OutputPathError::Missing(_))
        ));
    }

    #[test]
    fn test_regular_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out.txt");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            validate_output_root(&StdFs, &file),
            Err(OutputPathError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_create_dir_all_tolerates_existing() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("16x16");
        StdFs.create_dir_all(&sub).unwrap();
        StdFs.create_dir_all(&sub).unwrap();
        assert!(sub.is_dir());
    }

    #[test]
    fn test_remove_file_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gear.png");
        StdFs.remove_file(&file).unwrap();

        fs::write(&file, b"old").unwrap();
        StdFs.remove_file(&file).unwrap();
        assert!(!file.exists());
    }
}
