//! Readers that misbehave in controlled ways

use std::io::{self, Read};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Yields `data` and then fails once `fail_after` bytes have been read
pub struct FailingReader {
    data: Vec<u8>,
    position: usize,
    fail_after: usize,
}

impl FailingReader {
    pub fn new(data: Vec<u8>, fail_after: usize) -> Self {
        Self {
            data,
            position: 0,
            fail_after,
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.position >= self.fail_after {
            return Err(io::Error::other("simulated read failure"));
        }
        let end = self.fail_after.min(self.data.len()).min(self.position + buf.len());
        let n = end - self.position;
        buf[..n].copy_from_slice(&self.data[self.position..end]);
        self.position = end;
        Ok(n)
    }
}

/// Async twin of [`FailingReader`]
pub struct FailingAsyncReader {
    inner: FailingReader,
}

impl FailingAsyncReader {
    pub fn new(data: Vec<u8>, fail_after: usize) -> Self {
        Self {
            inner: FailingReader::new(data, fail_after),
        }
    }
}

impl AsyncRead for FailingAsyncReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let n = self.inner.read(buf.initialize_unfilled())?;
        buf.advance(n);
        Poll::Ready(Ok(()))
    }
}

/// Returns at most `max_read` bytes per call, with an occasional
/// `Interrupted` error in between
pub struct TrickleReader {
    data: Vec<u8>,
    position: usize,
    max_read: usize,
    calls: usize,
}

impl TrickleReader {
    pub fn new(data: Vec<u8>, max_read: usize) -> Self {
        Self {
            data,
            position: 0,
            max_read: max_read.max(1),
            calls: 0,
        }
    }
}

impl Read for TrickleReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls += 1;
        if self.calls % 7 == 0 {
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        let n = buf
            .len()
            .min(self.max_read)
            .min(self.data.len() - self.position);
        buf[..n].copy_from_slice(&self.data[self.position..self.position + n]);
        self.position += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_reader_stops_at_limit() {
        let mut reader = FailingReader::new(vec![1; 100], 10);
        let mut buf = [0u8; 64];
        assert_eq!(reader.read(&mut buf).unwrap(), 10);
        assert!(reader.read(&mut buf).is_err());
    }

    #[test]
    fn test_trickle_reader_delivers_everything() {
        let data: Vec<u8> = (0..=255).collect();
        let mut reader = TrickleReader::new(data.clone(), 9);
        let mut out = Vec::new();
        let mut buf = [0u8; 32];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => out.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => panic!("{e}"),
            }
        }
        assert_eq!(out, data);
    }
}
