use std::fmt;
use std::io::{self, BufRead, Read, Seek, SeekFrom};

/// Size of the read-ahead buffer owned by every [`SubStream`].
const BUFFER_SIZE: usize = 4096;

/// A read-only view of the byte range `[start, end)` of an owned source.
///
/// The view behaves like an independent file: logical offset 0 is `start`
/// in the underlying source and end-of-file is reached at `end`. Seeks that
/// would leave `[start, end]` fail without moving the cursor.
///
/// The source is moved in at construction and dropped with the stream, so
/// two streams opened over the same entry never share a cursor.
pub struct SubStream<R> {
    inner: R,
    start: u64,
    end: u64,
    /// Absolute position of `inner`.
    inner_pos: u64,
    buf: Box<[u8]>,
    pos: usize,
    filled: usize,
}

impl<R: Read + Seek> SubStream<R> {
    /// Wrap `inner`, positioning it at `start`.
    pub fn new(mut inner: R, start: u64, end: u64) -> io::Result<Self> {
        if end < start {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid stream window [{start}, {end})"),
            ));
        }
        inner.seek(SeekFrom::Start(start))?;

        Ok(Self {
            inner,
            start,
            end,
            inner_pos: start,
            buf: vec![0u8; BUFFER_SIZE].into_boxed_slice(),
            pos: 0,
            filled: 0,
        })
    }

    /// Total length of the window in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The absolute `(start, end)` window within the underlying source.
    pub fn window(&self) -> (u64, u64) {
        (self.start, self.end)
    }

    /// Logical cursor, counted from the start of the window.
    pub fn position(&self) -> u64 {
        self.inner_pos - self.start - (self.filled - self.pos) as u64
    }

    fn discard_buffer(&mut self) {
        self.pos = 0;
        self.filled = 0;
    }
}

impl<R: Read + Seek> BufRead for SubStream<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.filled {
            let remaining = self.end.saturating_sub(self.inner_pos);
            let to_read = remaining.min(self.buf.len() as u64) as usize;
            let n = if to_read == 0 {
                0
            } else {
                self.inner.read(&mut self.buf[..to_read])?
            };
            self.inner_pos += n as u64;
            self.pos = 0;
            self.filled = n;
        }
        Ok(&self.buf[self.pos..self.filled])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.filled);
    }
}

impl<R: Read + Seek> Read for SubStream<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read + Seek> Seek for SubStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => self.start.checked_add(offset),
            SeekFrom::Current(delta) => (self.start + self.position()).checked_add_signed(delta),
            SeekFrom::End(delta) => self.end.checked_add_signed(delta),
        };

        let target = match target {
            Some(t) if t >= self.start && t <= self.end => t,
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "seek outside of stream window",
                ));
            }
        };

        self.inner.seek(SeekFrom::Start(target))?;
        self.inner_pos = target;
        self.discard_buffer();

        Ok(target - self.start)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position())
    }
}

impl<R> fmt::Debug for SubStream<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubStream")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("inner_pos", &self.inner_pos)
            .field("buffered", &(self.filled - self.pos))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn source() -> Cursor<Vec<u8>> {
        Cursor::new((0..=255u8).cycle().take(10_000).collect())
    }

    fn expected(start: usize, end: usize) -> Vec<u8> {
        source().into_inner()[start..end].to_vec()
    }

    #[test]
    fn reads_only_the_window() {
        let mut stream = SubStream::new(source(), 100, 150).unwrap();
        let mut data = Vec::new();
        stream.read_to_end(&mut data).unwrap();
        assert_eq!(data, expected(100, 150));
        assert_eq!(stream.len(), 50);
        assert_eq!(stream.position(), 50);
    }

    #[test]
    fn window_larger_than_buffer() {
        let mut stream = SubStream::new(source(), 7, 9_007).unwrap();
        let mut data = Vec::new();
        stream.read_to_end(&mut data).unwrap();
        assert_eq!(data.len(), 9_000);
        assert_eq!(data, expected(7, 9_007));
    }

    #[test]
    fn seek_every_offset_matches_source() {
        let mut stream = SubStream::new(source(), 20, 40).unwrap();
        for offset in 0..=20u64 {
            assert_eq!(stream.seek(SeekFrom::Start(offset)).unwrap(), offset);
            let mut rest = Vec::new();
            stream.read_to_end(&mut rest).unwrap();
            assert_eq!(rest, expected(20 + offset as usize, 40));
        }
    }

    #[test]
    fn seek_outside_window_fails() {
        let mut stream = SubStream::new(source(), 20, 40).unwrap();
        stream.seek(SeekFrom::Start(5)).unwrap();

        assert!(stream.seek(SeekFrom::Start(21)).is_err());
        assert!(stream.seek(SeekFrom::End(1)).is_err());
        assert!(stream.seek(SeekFrom::Current(-6)).is_err());
        // A failed seek leaves the cursor alone
        assert_eq!(stream.position(), 5);

        assert_eq!(stream.seek(SeekFrom::End(0)).unwrap(), 20);
        assert_eq!(stream.seek(SeekFrom::End(-20)).unwrap(), 0);
    }

    #[test]
    fn seek_current_accounts_for_buffer() {
        let mut stream = SubStream::new(source(), 10, 60).unwrap();
        let mut head = [0u8; 4];
        stream.read_exact(&mut head).unwrap();
        assert_eq!(stream.seek(SeekFrom::Current(3)).unwrap(), 7);

        let mut next = [0u8; 3];
        stream.read_exact(&mut next).unwrap();
        assert_eq!(next.to_vec(), expected(17, 20));
    }

    #[test]
    fn empty_window_is_eof() {
        let mut stream = SubStream::new(source(), 30, 30).unwrap();
        assert!(stream.is_empty());
        let mut buf = [0u8; 8];
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert!(SubStream::new(source(), 40, 30).is_err());
    }
}
