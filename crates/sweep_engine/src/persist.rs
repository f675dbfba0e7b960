use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {path:?} is unusable: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` if needed and checks that files can be created inside it.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => return Err(unusable("not a directory".into())),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| unusable(e.to_string()))?;
        }
        Err(err) => return Err(unusable(err.to_string())),
    }
    NamedTempFile::new_in(dir).map_err(|e| unusable(e.to_string()))?;
    Ok(())
}

/// Writes whole files into one directory via temp file + rename, so a
/// reader never sees a half-written report.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
