use std::fs::File;
use std::path::{Path, PathBuf};

use super::SubStream;
use crate::error::{Error, Result};

/// A freshly opened local file, remembered together with its size.
pub struct LocalFile {
    path: PathBuf,
    file: File,
    size: u64,
}

impl LocalFile {
    pub fn open(path: &Path) -> Result<Self> {
        let open_err = |source| Error::Open {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(open_err)?;
        let size = file.metadata().map_err(open_err)?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file,
            size,
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Hand the file over to a [`SubStream`] covering `[start, end)`.
    pub fn into_window(self, start: u64, end: u64) -> Result<SubStream<File>> {
        let path = self.path;
        SubStream::new(self.file, start, end).map_err(|source| Error::EntrySeek {
            path,
            start,
            source,
        })
    }

    /// Hand the file over to a [`SubStream`] covering all of it.
    pub fn into_stream(self) -> Result<SubStream<File>> {
        let size = self.size;
        self.into_window(0, size)
    }

    pub(crate) fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }
}
