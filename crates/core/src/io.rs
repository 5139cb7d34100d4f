//! File output for build artifacts.

use std::{
    fs::{create_dir_all, read, write},
    path::{Path, PathBuf},
};

use crate::error::{Result, io_error};

/// A font file on disk.
#[derive(Debug, Clone)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        read(&self.path).map_err(io_error(&self.path))
    }

    /// Write font data, creating missing parent directories.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_parent_dir()?;
        write(&self.path, data).map_err(io_error(&self.path))
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent).map_err(io_error(parent))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = FontFile::new(dir.path().join("Foo/TTF/Foo-Bold.ttf"));
        file.write(b"font").unwrap();
        assert_eq!(file.read().unwrap(), b"font");
    }
}
