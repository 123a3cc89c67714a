//! Little-endian integer readers used by the archive parser and by the
//! record decoders that sit on top of the VFS.
//!
//! A short read is not an error here: the value decodes as zero and the
//! source is left wherever the failed read put it. Callers that derive record
//! counts from these values therefore see an empty record set on truncation.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

/// Read a little-endian `u16`, or `0` if fewer than 2 bytes are available.
pub fn read_le16<R: Read + ?Sized>(reader: &mut R) -> u16 {
    reader.read_u16::<LittleEndian>().unwrap_or(0)
}

/// Read a little-endian `u32`, or `0` if fewer than 4 bytes are available.
pub fn read_le32<R: Read + ?Sized>(reader: &mut R) -> u32 {
    reader.read_u32::<LittleEndian>().unwrap_or(0)
}

/// Method-call form of [`read_le16`] and [`read_le32`] for any reader.
pub trait ReadLeExt: Read {
    fn read_le16(&mut self) -> u16 {
        read_le16(self)
    }

    fn read_le32(&mut self) -> u32 {
        read_le32(self)
    }
}

impl<R: Read + ?Sized> ReadLeExt for R {}
