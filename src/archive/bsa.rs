use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::parser::{ArchiveIndex, DirectoryParser};
use super::structures::{ArchiveEntry, ArchiveHeader, ArchiveKind};
use crate::error::Result;
use crate::io::{LocalFile, SubStream};

/// A loaded BSA directory over one physical file.
///
/// The directory is read once by [`Archive::load`] and never changes. Every
/// open goes back to the file on disk with a new handle.
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
    entries: Vec<ArchiveEntry>,
    index: ArchiveIndex,
    payload_end: u64,
}

impl Archive {
    /// Load the directory of the archive at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = LocalFile::open(path)?;
        let size = file.size();
        let parsed = DirectoryParser::new(BufReader::new(file.file_mut()), path).parse()?;

        debug!(
            path = %path.display(),
            entries = parsed.entries.len(),
            size,
            "Loaded archive"
        );

        Ok(Self {
            path: path.to_path_buf(),
            entries: parsed.entries,
            index: parsed.index,
            payload_end: parsed.payload_end,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ArchiveKind {
        match self.index {
            ArchiveIndex::Named(_) => ArchiveKind::Named,
            ArchiveIndex::Indexed(_) => ArchiveKind::Indexed,
        }
    }

    /// Number of directory records, duplicates included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in directory order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// The region between the header and the footer
    pub fn payload_range(&self) -> (u64, u64) {
        (ArchiveHeader::SIZE, self.payload_end)
    }

    pub fn entry_by_name(&self, name: &str) -> Option<&ArchiveEntry> {
        let position = self.name_index()?.get(name)?;
        self.entries.get(*position)
    }

    pub fn entry_by_id(&self, id: u32) -> Option<&ArchiveEntry> {
        let position = self.id_index()?.get(&id)?;
        self.entries.get(*position)
    }

    /// Names in sorted order; empty for an indexed archive
    pub fn names(&self) -> impl Iterator<Item = (&str, &ArchiveEntry)> {
        self.name_index()
            .into_iter()
            .flat_map(|index| index.iter())
            .map(|(name, &position)| (name.as_str(), &self.entries[position]))
    }

    /// Ids in ascending order; empty for a named archive
    pub fn ids(&self) -> impl Iterator<Item = (u32, &ArchiveEntry)> {
        self.id_index()
            .into_iter()
            .flat_map(|index| index.iter())
            .map(|(&id, &position)| (id, &self.entries[position]))
    }

    /// Open the entry called `name`.
    ///
    /// Returns `Ok(None)` if this archive has no such entry.
    pub fn open(&self, name: &str) -> Result<Option<SubStream<File>>> {
        match self.entry_by_name(name) {
            Some(entry) => self.open_entry(entry).map(Some),
            None => Ok(None),
        }
    }

    /// Open the entry with numeric id `id`.
    ///
    /// Returns `Ok(None)` if this archive has no such entry.
    pub fn open_id(&self, id: u32) -> Result<Option<SubStream<File>>> {
        match self.entry_by_id(id) {
            Some(entry) => self.open_entry(entry).map(Some),
            None => Ok(None),
        }
    }

    fn open_entry(&self, entry: &ArchiveEntry) -> Result<SubStream<File>> {
        LocalFile::open(&self.path)?.into_window(entry.start, entry.end)
    }

    fn name_index(&self) -> Option<&BTreeMap<String, usize>> {
        match &self.index {
            ArchiveIndex::Named(index) => Some(index),
            ArchiveIndex::Indexed(_) => None,
        }
    }

    fn id_index(&self) -> Option<&BTreeMap<u32, usize>> {
        match &self.index {
            ArchiveIndex::Indexed(index) => Some(index),
            ArchiveIndex::Named(_) => None,
        }
    }
}
