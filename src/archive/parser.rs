//! BSA directory parser.
//!
//! ## Parsing Strategy
//!
//! The directory lives at the very end of the file:
//! 1. Read the 4-byte header for the record count and layout tag
//! 2. Seek to `count * record_size` bytes before the end of the file
//! 3. Read the whole footer in one go and decode each record
//! 4. Lay the entries out back to back, starting right after the header
//!
//! Payload offsets are never stored; they follow from the declared sizes
//! and the footer order.

use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map::Entry;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::warn;

use super::structures::*;
use crate::error::{Error, Result};

/// Lookup from key to position in the entry list
#[derive(Debug, Clone)]
pub enum ArchiveIndex {
    Named(BTreeMap<String, usize>),
    Indexed(BTreeMap<u32, usize>),
}

/// Everything a directory parse produces
#[derive(Debug)]
pub struct ParsedDirectory {
    pub index: ArchiveIndex,
    /// Entries in footer order
    pub entries: Vec<ArchiveEntry>,
    /// Offset where the footer starts, i.e. the end of the payload region
    pub payload_end: u64,
}

/// Parser over a seekable archive source.
///
/// `path` is only used for error messages and logging.
pub struct DirectoryParser<'a, R: Read + Seek> {
    reader: R,
    path: &'a Path,
}

impl<'a, R: Read + Seek> DirectoryParser<'a, R> {
    pub fn new(reader: R, path: &'a Path) -> Self {
        Self { reader, path }
    }

    /// Parse the header and footer into a [`ParsedDirectory`].
    ///
    /// # Errors
    ///
    /// Unknown type tags, compressed named entries, footers that do not fit
    /// the file and duplicate names all fail the whole parse.
    pub fn parse(mut self) -> Result<ParsedDirectory> {
        let header = ArchiveHeader::read(&mut self.reader);
        let Some(record_size) = header.kind.record_size() else {
            return Err(Error::UnknownArchiveType {
                path: self.path.to_path_buf(),
                tag: header.kind.as_u16(),
            });
        };

        let (payload_end, footer) = self.read_footer(header.count, record_size)?;
        let mut cursor = Cursor::new(footer.as_slice());
        let mut layout = Layout::new(self.path, payload_end);

        let index = match header.kind {
            ArchiveKind::Named => {
                let mut names = Vec::with_capacity(header.count as usize);
                for _ in 0..header.count {
                    let record = NamedRecord::read(&mut cursor)?;
                    if record.compression != 0 {
                        return Err(Error::CompressedEntry {
                            path: self.path.to_path_buf(),
                            name: record.name,
                        });
                    }
                    layout.push(record.size)?;
                    names.push(record);
                }
                ArchiveIndex::Named(self.index_names(names)?)
            }
            _ => {
                let mut ids = Vec::with_capacity(header.count as usize);
                for _ in 0..header.count {
                    let record = IndexedRecord::read(&mut cursor)?;
                    layout.push(record.size)?;
                    ids.push(record.id);
                }
                ArchiveIndex::Indexed(self.index_ids(&ids))
            }
        };

        Ok(ParsedDirectory {
            index,
            entries: layout.entries,
            payload_end,
        })
    }

    /// Seek to the footer and read it whole.
    ///
    /// Returns the footer's start offset and its bytes.
    fn read_footer(&mut self, count: u16, record_size: u64) -> Result<(u64, Vec<u8>)> {
        let footer_len = count as u64 * record_size;
        let footer_seek = || Error::FooterSeek {
            path: self.path.to_path_buf(),
            count,
        };

        let footer_start = self
            .reader
            .seek(SeekFrom::End(-(footer_len as i64)))
            .map_err(|_| footer_seek())?;
        if footer_start < ArchiveHeader::SIZE {
            return Err(footer_seek());
        }

        let mut footer = vec![0u8; footer_len as usize];
        self.reader
            .read_exact(&mut footer)
            .map_err(|_| Error::TruncatedFooter {
                path: self.path.to_path_buf(),
                count,
            })?;

        Ok((footer_start, footer))
    }

    /// Duplicate raw name fields are fatal. Distinct raw fields that decode
    /// to the same lookup name are tolerated; the first record wins.
    fn index_names(&self, records: Vec<NamedRecord>) -> Result<BTreeMap<String, usize>> {
        let mut seen = BTreeSet::new();
        let mut index = BTreeMap::new();
        for (position, record) in records.into_iter().enumerate() {
            if !seen.insert(record.raw) {
                return Err(Error::DuplicateName {
                    path: self.path.to_path_buf(),
                    name: record.name,
                });
            }
            match index.entry(record.name) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(slot) => {
                    warn!(name = %slot.key(), path = %self.path.display(), "Ambiguous entry name");
                }
            }
        }
        Ok(index)
    }

    /// Duplicate ids are tolerated; the first record for an id wins.
    fn index_ids(&self, ids: &[u32]) -> BTreeMap<u32, usize> {
        let mut index = BTreeMap::new();
        for (position, &id) in ids.iter().enumerate() {
            if let Entry::Vacant(slot) = index.entry(id) {
                slot.insert(position);
            } else {
                warn!(id, path = %self.path.display(), "Duplicate entry ID");
            }
        }
        index
    }
}

/// Forward accumulation of entry ranges from the end of the header.
struct Layout<'a> {
    path: &'a Path,
    limit: u64,
    next: u64,
    entries: Vec<ArchiveEntry>,
}

impl<'a> Layout<'a> {
    fn new(path: &'a Path, limit: u64) -> Self {
        Self {
            path,
            limit,
            next: ArchiveHeader::SIZE,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, size: u32) -> Result<()> {
        let start = self.next;
        let end = start + size as u64;
        if end > self.limit {
            return Err(Error::EntryOutOfBounds {
                path: self.path.to_path_buf(),
                index: self.entries.len(),
            });
        }
        self.entries.push(ArchiveEntry { start, end });
        self.next = end;
        Ok(())
    }
}
