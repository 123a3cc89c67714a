#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use bsavfs::vfs::{ARCHITECTURE_ARCHIVE, BASE_ARCHIVES, SOUND_ARCHIVE};

/// Bytes of a named (0x0100) archive holding `entries` in order.
pub fn named_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = header(entries.len(), 0x0100);
    for (_, data) in entries {
        out.extend_from_slice(data);
    }
    for (name, data) in entries {
        let mut raw = [0u8; 12];
        raw[..name.len()].copy_from_slice(name.as_bytes());
        out.extend_from_slice(&raw);
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    }
    out
}

/// Bytes of an indexed (0x0200) archive holding `entries` in order.
pub fn indexed_archive(entries: &[(u32, &[u8])]) -> Vec<u8> {
    let mut out = header(entries.len(), 0x0200);
    for (_, data) in entries {
        out.extend_from_slice(data);
    }
    for (id, data) in entries {
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    }
    out
}

fn header(count: usize, tag: u16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(count as u16).to_le_bytes());
    out.extend_from_slice(&tag.to_le_bytes());
    out
}

/// Deterministic filler so every byte position is distinguishable.
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}

pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Lay out a complete base data directory.
///
/// `MAPS.BSA` gets `maps`, the other named archives are empty, the
/// architecture and sound archives get `arch` and `sound`.
pub fn base_set(dir: &Path, maps: &[(&str, &[u8])], arch: &[(u32, &[u8])], sound: &[(u32, &[u8])]) {
    for name in BASE_ARCHIVES {
        let entries: &[(&str, &[u8])] = if name == "MAPS.BSA" { maps } else { &[] };
        write(dir, name, &named_archive(entries));
    }
    write(dir, ARCHITECTURE_ARCHIVE, &indexed_archive(arch));
    write(dir, SOUND_ARCHIVE, &indexed_archive(sound));
}
