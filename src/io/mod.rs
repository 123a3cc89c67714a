//! Stream plumbing shared by the archive layer and its consumers.
//!
//! - [`SubStream`]: a seekable, read-only window over part of a larger file
//! - [`LocalFile`]: a local file opened together with its size
//! - [`read_le16`] / [`read_le32`]: truncation-tolerant integer decoding

mod bounded;
mod local;
mod primitive;

pub use bounded::SubStream;
pub use local::LocalFile;
pub use primitive::{ReadLeExt, read_le16, read_le32};
