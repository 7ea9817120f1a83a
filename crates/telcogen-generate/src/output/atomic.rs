use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::GenerationError;

/// File written under a temporary name and renamed into place on commit.
///
/// Dropping an uncommitted file removes the temporary, so a failed run never
/// leaves a partially written artifact at the final path.
pub struct AtomicFile {
    path: PathBuf,
    tmp_path: PathBuf,
    writer: Option<CountingWriter<BufWriter<File>>>,
}

impl AtomicFile {
    pub fn create(path: &Path) -> Result<Self, GenerationError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent).map_err(|err| GenerationError::write(parent, err))?;
            }
        }

        let tmp_path = temp_path(path)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&tmp_path)
            .map_err(|err| GenerationError::write(&tmp_path, err))?;

        Ok(Self {
            path: path.to_path_buf(),
            tmp_path,
            writer: Some(CountingWriter::new(BufWriter::new(file))),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush, sync and rename into place. Returns the bytes written.
    ///
    /// On failure the temporary file is removed before the error is returned.
    pub fn commit(mut self) -> Result<u64, GenerationError> {
        let Some(writer) = self.writer.take() else {
            return Err(GenerationError::write(
                &self.path,
                io::Error::other("atomic file already committed"),
            ));
        };
        let bytes = writer.bytes_written();
        if let Err(err) = self.persist(writer) {
            let _ = std::fs::remove_file(&self.tmp_path);
            return Err(err);
        }
        Ok(bytes)
    }

    fn persist(&self, writer: CountingWriter<BufWriter<File>>) -> Result<(), GenerationError> {
        let file = writer
            .into_inner()
            .into_inner()
            .map_err(|err| GenerationError::write(&self.tmp_path, err.into_error()))?;
        file.sync_all()
            .map_err(|err| GenerationError::write(&self.tmp_path, err))?;
        drop(file);

        std::fs::rename(&self.tmp_path, &self.path)
            .map_err(|err| GenerationError::write(&self.path, err))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                sync_dir(parent).map_err(|err| GenerationError::write(parent, err))?;
            }
        }
        Ok(())
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(io::Error::other("atomic file already committed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for AtomicFile {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            let _ = std::fs::remove_file(&self.tmp_path);
        }
    }
}

/// Write pretty JSON followed by a newline. Returns the bytes written.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<u64, GenerationError> {
    let mut file = AtomicFile::create(path)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.write_all(b"\n")
        .map_err(|err| GenerationError::write(path, err))?;
    file.commit()
}

fn temp_path(path: &Path) -> Result<PathBuf, GenerationError> {
    let file_name = path.file_name().ok_or_else(|| {
        GenerationError::InvalidConfiguration(format!(
            "invalid artifact path '{}'",
            path.display()
        ))
    })?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

/// Writer adapter counting the bytes that reach the inner writer.
pub struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("telcogen_atomic_{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn commit_moves_file_into_place() {
        let dir = temp_dir();
        let path = dir.join("nested").join("data.jsonl");
        let mut file = AtomicFile::create(&path).unwrap();
        file.write_all(b"{}\n").unwrap();
        assert!(!path.exists());
        assert_eq!(file.commit().unwrap(), 3);
        assert_eq!(std::fs::read(&path).unwrap(), b"{}\n");
        assert!(!dir.join("nested").join(".data.jsonl.tmp").exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn failed_rename_removes_the_temporary() {
        let dir = temp_dir();
        let path = dir.join("taken");
        let mut file = AtomicFile::create(&path).unwrap();
        file.write_all(b"a,b\n").unwrap();
        // A non-empty directory at the destination makes the rename fail.
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(matches!(
            file.commit(),
            Err(GenerationError::WriteFailure { .. })
        ));
        assert!(!dir.join(".taken.tmp").exists());
        assert!(path.join("occupied").is_dir());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn dropped_file_leaves_nothing_behind() {
        let dir = temp_dir();
        let path = dir.join("data.csv");
        {
            let mut file = AtomicFile::create(&path).unwrap();
            file.write_all(b"a,b\n").unwrap();
        }
        assert!(!path.exists());
        assert!(!dir.join(".data.csv.tmp").exists());
        let _ = std::fs::remove_dir_all(dir);
    }
}
