use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unhandled BSA type 0x{tag:04x} in {path}")]
    UnknownArchiveType { path: PathBuf, tag: u16 },

    #[error("Compressed entry \"{name}\" in {path} is not supported")]
    CompressedEntry { path: PathBuf, name: String },

    #[error("Failed to seek to archive footer ({count} entries) in {path}")]
    FooterSeek { path: PathBuf, count: u16 },

    #[error("Failed reading archive footer ({count} entries) in {path}")]
    TruncatedFooter { path: PathBuf, count: u16 },

    #[error("Entry {index} in {path} extends past the archive payload")]
    EntryOutOfBounds { path: PathBuf, index: usize },

    #[error("Duplicate entry name \"{name}\" in {path}")]
    DuplicateName { path: PathBuf, name: String },

    #[error("Failed to seek to entry at offset {start} in {path}: {source}")]
    EntrySeek {
        path: PathBuf,
        start: u64,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
