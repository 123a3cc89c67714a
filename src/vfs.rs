//! The overlay manager.
//!
//! [`Vfs`] owns an ordered list of search roots plus the two id-keyed
//! archives. Name lookups walk the roots from the most recently added to the
//! first, so later data paths shadow same-named entries in earlier ones.
//! The architecture and sound archives are only reachable by id and are
//! never shadowed.
//!
//! A `Vfs` is built once at startup and is read-only afterwards; share it by
//! reference or `Arc`. Each open hands out a [`SubStream`] with its own file
//! handle.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::archive::Archive;
use crate::config::VfsConfig;
use crate::error::{Error, Result};
use crate::io::{LocalFile, SubStream};

/// Named archives loaded from the base path, lowest priority first.
pub const BASE_ARCHIVES: [&str; 4] = ["MAPS.BSA", "BLOCKS.BSA", "MONSTER.BSA", "MIDI.BSA"];

/// Id-keyed archive holding 3D architecture models.
pub const ARCHITECTURE_ARCHIVE: &str = "ARCH3D.BSA";

/// Id-keyed archive holding sound effects.
pub const SOUND_ARCHIVE: &str = "DAGGER.SND";

/// One participant in name resolution.
#[derive(Debug, Clone)]
pub enum SearchRoot {
    Archive(Archive),
    /// Loose files in a directory, looked up by file name
    Directory(PathBuf),
}

impl SearchRoot {
    pub fn path(&self) -> &Path {
        match self {
            SearchRoot::Archive(archive) => archive.path(),
            SearchRoot::Directory(dir) => dir,
        }
    }

    pub fn open(&self, name: &str) -> Result<Option<SubStream<File>>> {
        match self {
            SearchRoot::Archive(archive) => archive.open(name),
            SearchRoot::Directory(dir) => {
                let Some(path) = loose_file_path(dir, name) else {
                    return Ok(None);
                };
                LocalFile::open(&path)?.into_stream().map(Some)
            }
        }
    }

    fn collect_entries(&self, out: &mut BTreeMap<String, ListedEntry>) -> Result<()> {
        match self {
            SearchRoot::Archive(archive) => {
                for (name, entry) in archive.names() {
                    out.entry(name.to_string()).or_insert_with(|| ListedEntry {
                        name: name.to_string(),
                        start: entry.start,
                        end: entry.end,
                        source: archive.path().to_path_buf(),
                    });
                }
            }
            SearchRoot::Directory(dir) => {
                for item in fs::read_dir(dir)? {
                    let item = item?;
                    // Follows symlinks, like the `is_file` check in `open`
                    let metadata = fs::metadata(item.path())?;
                    if !metadata.is_file() {
                        continue;
                    }
                    let name = item.file_name().to_string_lossy().into_owned();
                    out.entry(name.clone()).or_insert_with(|| ListedEntry {
                        name,
                        start: 0,
                        end: metadata.len(),
                        source: item.path(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Whether `name` is a single plain path component, so joining it onto a
/// directory stays inside that directory.
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Resolve `name` inside `dir`, refusing anything but a plain file name.
fn loose_file_path(dir: &Path, name: &str) -> Option<PathBuf> {
    if !is_plain_name(name) {
        return None;
    }
    let path = dir.join(name);
    path.is_file().then_some(path)
}

/// A name visible through the overlay and where it currently comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: String,
    pub start: u64,
    pub end: u64,
    /// Archive or loose file providing the winning copy
    pub source: PathBuf,
}

impl ListedEntry {
    pub fn size(&self) -> u64 {
        self.end - self.start
    }
}

/// The archive registry.
#[derive(Debug, Clone)]
pub struct Vfs {
    roots: Vec<SearchRoot>,
    architecture: Archive,
    sound: Archive,
}

impl Vfs {
    /// Load the base archive set from `base_path`.
    ///
    /// # Errors
    ///
    /// Fails if any of the six base archives is missing or malformed.
    pub fn initialize(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref();
        info!(root = %base_path.display(), "Initializing VFS");

        let roots = BASE_ARCHIVES
            .iter()
            .map(|name| Archive::load(base_path.join(name)).map(SearchRoot::Archive))
            .collect::<Result<Vec<_>>>()?;
        let architecture = Archive::load(base_path.join(ARCHITECTURE_ARCHIVE))?;
        let sound = Archive::load(base_path.join(SOUND_ARCHIVE))?;

        Ok(Self {
            roots,
            architecture,
            sound,
        })
    }

    /// Load the base archive set, then add each of `data_paths` in order.
    pub fn with_data_paths<I, P>(base_path: impl AsRef<Path>, data_paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut vfs = Self::initialize(base_path)?;
        for path in data_paths {
            vfs.add_data_path(path)?;
        }
        Ok(vfs)
    }

    pub fn from_config(config: &VfsConfig) -> Result<Self> {
        Self::with_data_paths(&config.base_path, &config.data_paths)
    }

    /// Add one more search root that outranks every root added before it.
    ///
    /// A file is loaded as a named archive, a directory is served as loose
    /// files.
    pub fn add_data_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!(path = %path.display(), "Adding data path");

        let root = if path.is_dir() {
            SearchRoot::Directory(path.to_path_buf())
        } else {
            SearchRoot::Archive(Archive::load(path)?)
        };
        self.roots.push(root);
        Ok(())
    }

    /// Search roots, lowest priority first
    pub fn roots(&self) -> &[SearchRoot] {
        &self.roots
    }

    pub fn architecture(&self) -> &Archive {
        &self.architecture
    }

    pub fn sound(&self) -> &Archive {
        &self.sound
    }

    /// Open `name` from the highest-priority root that has it.
    ///
    /// A root that has the name but fails to open it is skipped. If no root
    /// succeeds, the last such failure is returned; if no root has the name
    /// at all the result is `Ok(None)`.
    pub fn open(&self, name: &str) -> Result<Option<SubStream<File>>> {
        let mut failure: Option<Error> = None;

        for root in self.roots.iter().rev() {
            match root.open(name) {
                Ok(Some(stream)) => {
                    debug!(name, root = %root.path().display(), "Resolved entry");
                    return Ok(Some(stream));
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(name, root = %root.path().display(), error = %err, "Failed to open entry");
                    failure = Some(err);
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    pub fn open_architecture_by_id(&self, id: u32) -> Result<Option<SubStream<File>>> {
        self.architecture.open_id(id)
    }

    pub fn open_sound_by_id(&self, id: u32) -> Result<Option<SubStream<File>>> {
        self.sound.open_id(id)
    }

    /// Every name visible through the overlay, sorted, each with the root
    /// that wins it.
    pub fn list(&self) -> Result<Vec<ListedEntry>> {
        let mut visible = BTreeMap::new();
        for root in self.roots.iter().rev() {
            root.collect_entries(&mut visible)?;
        }
        Ok(visible.into_values().collect())
    }
}
