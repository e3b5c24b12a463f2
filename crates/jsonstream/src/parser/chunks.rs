//! Bounded, line-aware reads from a byte source.
//!
//! Each chunk holds at most `chunk_size` bytes and ends early after a line
//! feed. Once the source is exhausted one final chunk holding a single space is
//! produced, so that a number at the very end of the input is terminated.
use std::io::{self, BufRead, Read};

#[derive(Debug)]
pub(crate) struct ChunkReader<R> {
    source: R,
    chunk_size: usize,
    done: bool,
    bytes_read: usize,
}

impl<R: BufRead> ChunkReader<R> {
    pub(crate) fn new(source: R, chunk_size: usize) -> Self {
        Self {
            source,
            chunk_size: chunk_size.max(1),
            done: false,
            bytes_read: 0,
        }
    }

    /// Replaces the contents of `buf` with the next chunk.
    ///
    /// Returns `Ok(false)` once the sentinel chunk has been handed out.
    pub(crate) fn next_chunk(&mut self, buf: &mut Vec<u8>) -> io::Result<bool> {
        buf.clear();
        if self.done {
            return Ok(false);
        }

        let limit = self.chunk_size as u64;
        let n = loop {
            match (&mut self.source).take(limit).read_until(b'\n', buf) {
                Ok(n) => break n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    self.done = true;
                    return Err(err);
                }
            }
        };

        if n == 0 {
            self.done = true;
            buf.push(b' ');
        } else {
            self.bytes_read += n;
        }
        Ok(true)
    }

    /// Number of source bytes handed out so far, excluding the sentinel.
    pub(crate) fn bytes_read(&self) -> usize {
        self.bytes_read
    }
}

impl<R: BufRead> Iterator for ChunkReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.next_chunk(&mut buf) {
            Ok(true) => Some(Ok(buf)),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;

    use super::*;

    fn collect(input: &[u8], chunk_size: usize) -> Vec<Vec<u8>> {
        ChunkReader::new(input, chunk_size)
            .collect::<io::Result<_>>()
            .unwrap()
    }

    #[test]
    fn stops_at_newlines() {
        assert_eq!(
            collect(b"ab\ncd\n\nef", 100),
            vec![
                b"ab\n".to_vec(),
                b"cd\n".to_vec(),
                b"\n".to_vec(),
                b"ef".to_vec(),
                b" ".to_vec(),
            ]
        );
    }

    #[test]
    fn respects_the_size_bound() {
        assert_eq!(
            collect(b"abcdefg\nh", 3),
            vec![
                b"abc".to_vec(),
                b"def".to_vec(),
                b"g\n".to_vec(),
                b"h".to_vec(),
                b" ".to_vec(),
            ]
        );
    }

    #[test]
    fn empty_source_yields_only_the_sentinel() {
        assert_eq!(collect(b"", 8), vec![b" ".to_vec()]);
    }

    #[test]
    fn zero_chunk_size_reads_single_bytes() {
        assert_eq!(
            collect(b"xy", 0),
            vec![b"x".to_vec(), b"y".to_vec(), b" ".to_vec()]
        );
    }

    #[test]
    fn counts_source_bytes_only() {
        let mut reader = ChunkReader::new(BufReader::new(&b"12\n34"[..]), 4);
        let mut buf = Vec::new();
        while reader.next_chunk(&mut buf).unwrap() {}
        assert_eq!(reader.bytes_read(), 5);
        assert!(buf.is_empty());
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("boom"))
        }
    }

    #[test]
    fn errors_end_the_sequence() {
        let mut reader = ChunkReader::new(BufReader::new(Failing), 4);
        assert!(matches!(reader.next(), Some(Err(_))));
        assert!(reader.next().is_none());
    }
}
