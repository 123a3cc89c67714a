mod common;

use std::io::{Read, Seek, SeekFrom};

use bsavfs::{Archive, ArchiveKind, Error};
use common::{indexed_archive, named_archive, pattern, write};
use tempfile::TempDir;

#[test]
fn named_entries_read_back_exactly() {
    let dir = TempDir::new().unwrap();
    let a = pattern(10, 1);
    let b = pattern(5000, 2);
    let c = pattern(0, 3);
    let bytes = named_archive(&[("A.DAT", &a), ("B.DAT", &b), ("C.DAT", &c)]);
    let path = write(dir.path(), "TEST.BSA", &bytes);

    let archive = Archive::load(&path).unwrap();
    assert_eq!(archive.kind(), ArchiveKind::Named);
    assert_eq!(archive.len(), 3);

    for (name, expected) in [("A.DAT", &a), ("B.DAT", &b), ("C.DAT", &c)] {
        let mut stream = archive.open(name).unwrap().unwrap();
        assert_eq!(stream.len(), expected.len() as u64);

        let entry = archive.entry_by_name(name).unwrap();
        let mut data = Vec::new();
        stream.read_to_end(&mut data).unwrap();
        assert_eq!(&data, expected);
        assert_eq!(data, bytes[entry.start as usize..entry.end as usize]);
    }

    assert!(archive.open("MISSING").unwrap().is_none());
    assert!(archive.open_id(0).unwrap().is_none());
}

#[test]
fn ranges_cover_the_payload() {
    let dir = TempDir::new().unwrap();
    let payloads: Vec<Vec<u8>> = (0..6).map(|i| pattern(i * 37 + 1, i as u8)).collect();
    let records: Vec<(u32, &[u8])> = payloads
        .iter()
        .enumerate()
        .map(|(i, p)| (100 - i as u32, p.as_slice()))
        .collect();
    let bytes = indexed_archive(&records);
    let path = write(dir.path(), "ARCH.BSA", &bytes);

    let archive = Archive::load(&path).unwrap();
    let (payload_start, payload_end) = archive.payload_range();
    assert_eq!(payload_start, 4);
    assert_eq!(payload_end, (bytes.len() - records.len() * 8) as u64);

    let mut next = payload_start;
    for entry in archive.entries() {
        assert_eq!(entry.start, next);
        assert!(entry.end >= entry.start);
        next = entry.end;
    }
    assert_eq!(next, payload_end);
}

#[test]
fn indexed_entries_concatenate_to_payload() {
    let dir = TempDir::new().unwrap();
    let payloads: Vec<Vec<u8>> = (0..5).map(|i| pattern(i * 100 + 3, i as u8)).collect();
    // Ids deliberately out of storage order
    let ids = [40u32, 7, 99, 1, 63];
    let records: Vec<(u32, &[u8])> = ids
        .iter()
        .zip(&payloads)
        .map(|(&id, p)| (id, p.as_slice()))
        .collect();
    let bytes = indexed_archive(&records);
    let path = write(dir.path(), "DAGGER.SND", &bytes);

    let archive = Archive::load(&path).unwrap();
    assert_eq!(archive.kind(), ArchiveKind::Indexed);
    assert_eq!(archive.names().count(), 0);

    let mut by_range: Vec<_> = archive.ids().collect();
    by_range.sort_by_key(|(_, entry)| entry.start);

    let mut joined = Vec::new();
    for (id, _) in by_range {
        archive
            .open_id(id)
            .unwrap()
            .unwrap()
            .read_to_end(&mut joined)
            .unwrap();
    }

    let (start, end) = archive.payload_range();
    assert_eq!(joined, bytes[start as usize..end as usize]);
}

#[test]
fn seek_within_and_outside_entry() {
    let dir = TempDir::new().unwrap();
    let data = pattern(64, 9);
    let bytes = named_archive(&[("PAD", &pattern(13, 0)), ("FOO", &data)]);
    let path = write(dir.path(), "TEST.BSA", &bytes);

    let archive = Archive::load(&path).unwrap();
    let entry = *archive.entry_by_name("FOO").unwrap();
    let mut stream = archive.open("FOO").unwrap().unwrap();

    for offset in 0..=entry.len() {
        assert_eq!(stream.seek(SeekFrom::Start(offset)).unwrap(), offset);
        let mut rest = Vec::new();
        stream.read_to_end(&mut rest).unwrap();
        let from = (entry.start + offset) as usize;
        assert_eq!(rest, bytes[from..entry.end as usize]);
    }

    assert!(stream.seek(SeekFrom::Start(entry.len() + 1)).is_err());
    stream.seek(SeekFrom::Start(0)).unwrap();
    assert!(stream.seek(SeekFrom::Current(-1)).is_err());
    assert!(stream.seek(SeekFrom::End(-(entry.len() as i64) - 1)).is_err());
}

#[test]
fn concurrent_streams_do_not_interfere() {
    let dir = TempDir::new().unwrap();
    let data = pattern(300, 4);
    let path = write(dir.path(), "TEST.BSA", &named_archive(&[("FOO", &data)]));
    let archive = Archive::load(&path).unwrap();

    let mut first = archive.open("FOO").unwrap().unwrap();
    let mut second = archive.open("FOO").unwrap().unwrap();

    let mut head = [0u8; 10];
    first.read_exact(&mut head).unwrap();
    second.seek(SeekFrom::Start(200)).unwrap();

    let mut rest = Vec::new();
    first.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, data[10..]);

    let mut tail = Vec::new();
    second.read_to_end(&mut tail).unwrap();
    assert_eq!(tail, data[200..]);
}

#[test]
fn duplicate_names_fail_to_load() {
    let dir = TempDir::new().unwrap();
    let bytes = named_archive(&[("FOO", b"one"), ("BAR", b"two"), ("FOO", b"three")]);
    let path = write(dir.path(), "DUP.BSA", &bytes);

    let err = Archive::load(&path).unwrap_err();
    assert!(matches!(err, Error::DuplicateName { ref name, .. } if name == "FOO"));
}

#[test]
fn duplicate_ids_keep_first_occurrence() {
    let dir = TempDir::new().unwrap();
    let bytes = indexed_archive(&[(3, b"first"), (8, b"other"), (3, b"second")]);
    let path = write(dir.path(), "DUP.SND", &bytes);

    let archive = Archive::load(&path).unwrap();
    assert_eq!(archive.len(), 3);
    assert_eq!(archive.ids().count(), 2);

    let mut data = String::new();
    archive
        .open_id(3)
        .unwrap()
        .unwrap()
        .read_to_string(&mut data)
        .unwrap();
    assert_eq!(data, "first");
}

#[test]
fn unknown_type_tag_is_a_format_error() {
    let dir = TempDir::new().unwrap();
    let mut bytes = indexed_archive(&[(1, b"abc"), (2, b"def")]);
    bytes[2..4].copy_from_slice(&0x0300u16.to_le_bytes());
    let path = write(dir.path(), "BAD.BSA", &bytes);

    let err = Archive::load(&path).unwrap_err();
    assert!(matches!(err, Error::UnknownArchiveType { tag: 0x0300, .. }));
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = TempDir::new().unwrap();
    let err = Archive::load(dir.path().join("NOPE.BSA")).unwrap_err();
    assert!(matches!(err, Error::Open { .. }));
}

#[test]
fn truncated_header_is_a_format_error() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "SHORT.BSA", &[0x01]);
    let err = Archive::load(&path).unwrap_err();
    assert!(matches!(err, Error::UnknownArchiveType { tag: 0, .. }));
}

#[test]
fn names_equal_only_after_padding_still_load() {
    let dir = TempDir::new().unwrap();
    let mut bytes = named_archive(&[("FOO", b"first"), ("FOO", b"second")]);
    // Rewrite the second name field so the raw bytes differ past the NUL
    let second_name = bytes.len() - 18;
    bytes[second_name..second_name + 12].copy_from_slice(b"FOO\0BBBBBBBB");
    let path = write(dir.path(), "PAD.BSA", &bytes);

    let archive = Archive::load(&path).unwrap();
    assert_eq!(archive.len(), 2);
    assert_eq!(archive.names().count(), 1);

    let mut data = String::new();
    archive
        .open("FOO")
        .unwrap()
        .unwrap()
        .read_to_string(&mut data)
        .unwrap();
    assert_eq!(data, "first");
}
