//! # bsavfs
//!
//! A read-only virtual file system over BSA packed archives.
//!
//! Several archives are overlaid into one namespace: an entry in an archive
//! registered later shadows the entry of the same name in every archive
//! registered before it. Entries are served as [`SubStream`]s, seekable
//! windows over the archive file that behave like independent files.
//!
//! ## Features
//!
//! - Named (`0x0100`) and indexed (`0x0200`) BSA directory layouts
//! - Priority-ordered name resolution across archives and loose directories
//! - Id lookups into the architecture and sound archives
//! - Truncation-tolerant little-endian readers for record decoders
//!
//! ## Example
//!
//! ```no_run
//! use std::io::Read;
//! use bsavfs::Vfs;
//!
//! fn main() -> bsavfs::Result<()> {
//!     let vfs = Vfs::with_data_paths("/games/dagger/ARENA2", ["/games/dagger/mods"])?;
//!
//!     if let Some(mut stream) = vfs.open("TEXTURE.001")? {
//!         let mut data = Vec::new();
//!         stream.read_to_end(&mut data)?;
//!         println!("{} bytes", data.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod vfs;

pub use archive::{Archive, ArchiveEntry, ArchiveKind};
pub use cli::Cli;
pub use config::VfsConfig;
pub use error::{Error, Result};
pub use io::{ReadLeExt, SubStream, read_le16, read_le32};
pub use vfs::{ListedEntry, SearchRoot, Vfs};
