//! # File I/O Primitive
//!
//! Thin wrapper over the OS file used by the writer thread. It only knows
//! how to open, append, truncate and measure the log file; rotation policy
//! and buffering live in [`worker`](crate::worker).

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;

/// An open log file. Owned and touched by the writer thread only, so no
/// locking is needed around it.
#[derive(Debug)]
pub struct FileIo {
    file: File,
    path: PathBuf,
}

impl FileIo {
    /// Opens (creating if necessary) the log file at `path`.
    ///
    /// With `append` set, existing content is kept and writes go to the end;
    /// otherwise the file is truncated on open.
    pub fn open(path: impl Into<PathBuf>, append: bool) -> Result<Self, Error> {
        let path = path.into();
        let file = if append {
            OpenOptions::new().create(true).append(true).open(&path)?
        } else {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)?
        };
        Ok(FileIo { file, path })
    }

    /// Writes a full batch to the file.
    pub fn write(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.file.write_all(bytes)
    }

    /// Truncates the file to empty and rewinds the cursor.
    pub fn truncate(&mut self) -> std::io::Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Current file size in bytes, 0 when the metadata query fails.
    pub fn size(&self) -> u64 {
        self.file.metadata().map(|m| m.len()).unwrap_or(0)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("io.log");
        let io = FileIo::open(&path, true).unwrap();
        assert!(path.exists());
        assert_eq!(io.size(), 0);
        assert_eq!(io.path(), path.as_path());
    }

    #[test]
    fn test_write_and_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("io.log");
        let mut io = FileIo::open(&path, true).unwrap();
        io.write(b"hello\n").unwrap();
        assert_eq!(io.size(), 6);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_append_mode_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("io.log");
        fs::write(&path, "old\n").unwrap();

        let mut io = FileIo::open(&path, true).unwrap();
        io.write(b"new\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_truncate_mode_discards_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("io.log");
        fs::write(&path, "old\n").unwrap();

        let io = FileIo::open(&path, false).unwrap();
        assert_eq!(io.size(), 0);
    }

    #[test]
    fn test_truncate_then_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("io.log");
        let mut io = FileIo::open(&path, true).unwrap();
        io.write(b"a long first batch\n").unwrap();
        io.truncate().unwrap();
        io.write(b"second\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
        assert_eq!(io.size(), 7);
    }

    #[test]
    fn test_open_bad_path_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("io.log");
        assert!(FileIo::open(&path, true).is_err());
    }
}
