//! BSA archive loading.
//!
//! ## Format Overview
//!
//! A BSA file consists of:
//! 1. A 4-byte header: record count (`u16`) and layout tag (`u16`)
//! 2. The entry payloads, back to back, in directory order
//! 3. The directory footer: one fixed-size record per entry
//!
//! All integers are little-endian. Two layouts exist:
//!
//! | tag      | record                                         | key         |
//! |----------|------------------------------------------------|-------------|
//! | `0x0100` | `name: [u8; 12]`, `compression: u16`, `size: u32` | name     |
//! | `0x0200` | `id: u32`, `size: u32`                          | numeric id |
//!
//! Compressed named entries are rejected. Duplicate names fail the load;
//! duplicate ids are logged and the first record for the id is kept.

mod bsa;
mod parser;
mod structures;

pub use bsa::Archive;
pub use parser::{ArchiveIndex, DirectoryParser, ParsedDirectory};
pub use structures::*;
