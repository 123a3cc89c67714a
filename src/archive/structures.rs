use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::io::read_le16;

/// BSA directory layouts, discriminated by the header's type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Entries keyed by 12-byte names
    Named,
    /// Entries keyed by numeric ids
    Indexed,
    Unknown(u16),
}

impl ArchiveKind {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0100 => ArchiveKind::Named,
            0x0200 => ArchiveKind::Indexed,
            _ => ArchiveKind::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            ArchiveKind::Named => 0x0100,
            ArchiveKind::Indexed => 0x0200,
            ArchiveKind::Unknown(v) => *v,
        }
    }

    /// Size of one footer record, if the layout is known
    pub fn record_size(&self) -> Option<u64> {
        match self {
            ArchiveKind::Named => Some(NamedRecord::SIZE as u64),
            ArchiveKind::Indexed => Some(IndexedRecord::SIZE as u64),
            ArchiveKind::Unknown(_) => None,
        }
    }
}

/// Archive header - 4 bytes at the start of the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub count: u16,
    pub kind: ArchiveKind,
}

impl ArchiveHeader {
    pub const SIZE: u64 = 4;

    /// Read the header. A truncated file decodes as zero fields, which
    /// surfaces as an unknown type tag.
    pub fn read<R: Read>(reader: &mut R) -> Self {
        let count = read_le16(reader);
        let kind = ArchiveKind::from_u16(read_le16(reader));
        Self { count, kind }
    }
}

/// Named footer record - 18 bytes
#[derive(Debug, Clone)]
pub struct NamedRecord {
    /// The name field exactly as stored
    pub raw: [u8; NamedRecord::NAME_LEN],
    /// Lookup form of `raw`
    pub name: String,
    pub compression: u16,
    pub size: u32,
}

impl NamedRecord {
    pub const NAME_LEN: usize = 12;
    pub const SIZE: usize = 18;

    pub fn read(cursor: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        let mut raw = [0u8; Self::NAME_LEN];
        cursor.read_exact(&mut raw)?;

        Ok(Self {
            raw,
            name: decode_name(&raw),
            compression: cursor.read_u16::<LittleEndian>()?,
            size: cursor.read_u32::<LittleEndian>()?,
        })
    }
}

/// Indexed footer record - 8 bytes
#[derive(Debug, Clone, Copy)]
pub struct IndexedRecord {
    pub id: u32,
    pub size: u32,
}

impl IndexedRecord {
    pub const SIZE: usize = 8;

    pub fn read(cursor: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        Ok(Self {
            id: cursor.read_u32::<LittleEndian>()?,
            size: cursor.read_u32::<LittleEndian>()?,
        })
    }
}

/// Fixed-length names are NUL padded; everything from the first NUL on is
/// dropped.
pub fn decode_name(raw: &[u8]) -> String {
    let len = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..len]).into_owned()
}

/// Byte range of one entry within its archive file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArchiveEntry {
    pub start: u64,
    pub end: u64,
}

impl ArchiveEntry {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
