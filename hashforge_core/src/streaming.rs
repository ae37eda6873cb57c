//! Streaming and bulk hashing drivers
//!
//! Each driver runs a complete init/update/finalize cycle on a caller's
//! engine, feeds it in chunks sized to a multiple of the algorithm block,
//! and reports progress through an optional [`ProgressProvider`].

use crate::error::{IoError, Result};
use crate::hashing::{HashEngine, HashResult};
use crate::progress::{ProgressGuard, ProgressProvider, clamp_i64};
use crate::security::SecureBuffer;
use log::debug;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Default target for one update call, before block alignment
pub const DEFAULT_CHUNK_TARGET: usize = 8192;

/// Smallest multiple of `block_size` that is at least `target`
pub fn aligned_chunk_size(block_size: usize, target: usize) -> usize {
    let block_size = block_size.max(1);
    target.max(1).div_ceil(block_size) * block_size
}

/// Drives engines over in-memory data, readers and files
#[derive(Debug, Clone, Copy)]
pub struct StreamingDriver {
    chunk_target: usize,
}

impl Default for StreamingDriver {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_TARGET)
    }
}

impl StreamingDriver {
    /// Create a driver; zero falls back to the default chunk target
    pub fn new(chunk_target: usize) -> Self {
        let chunk_target = if chunk_target == 0 {
            DEFAULT_CHUNK_TARGET
        } else {
            chunk_target
        };
        Self { chunk_target }
    }

    pub fn chunk_target(&self) -> usize {
        self.chunk_target
    }

    /// Hash a byte slice
    pub fn hash_bytes(
        &self,
        engine: &mut HashEngine,
        data: &[u8],
        progress: Option<&dyn ProgressProvider>,
    ) -> Result<HashResult> {
        let started = Instant::now();
        let mut guard = ProgressGuard::start(progress, clamp_i64(data.len() as u64));

        engine.init()?;
        let chunk_size = aligned_chunk_size(engine.block_size()?, self.chunk_target);

        let mut consumed = 0u64;
        for chunk in data.chunks(chunk_size) {
            engine.update(chunk)?;
            consumed += chunk.len() as u64;
            guard.advance(consumed);
        }

        engine.finalize()?;
        Ok(HashResult::from_engine(engine, consumed, started))
    }

    /// Hash the UTF-8 bytes of a string
    pub fn hash_str(
        &self,
        engine: &mut HashEngine,
        text: &str,
        progress: Option<&dyn ProgressProvider>,
    ) -> Result<HashResult> {
        self.hash_bytes(engine, text.as_bytes(), progress)
    }

    /// Hash a sequence of byte pieces as one message
    ///
    /// The total is reported as unknown (-1) because the pieces are not
    /// inspected up front.
    pub fn hash_chunks<I, B>(
        &self,
        engine: &mut HashEngine,
        pieces: I,
        progress: Option<&dyn ProgressProvider>,
    ) -> Result<HashResult>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let started = Instant::now();
        let mut guard = ProgressGuard::start(progress, -1);

        engine.init()?;
        let chunk_size = aligned_chunk_size(engine.block_size()?, self.chunk_target);

        let mut consumed = 0u64;
        for piece in pieces {
            for chunk in piece.as_ref().chunks(chunk_size) {
                engine.update(chunk)?;
                consumed += chunk.len() as u64;
                guard.advance(consumed);
            }
        }

        engine.finalize()?;
        Ok(HashResult::from_engine(engine, consumed, started))
    }

    /// Hash everything a reader yields until end of stream
    ///
    /// `total` is only used for progress; pass `None` when unknown.
    pub fn hash_reader<R: Read>(
        &self,
        engine: &mut HashEngine,
        mut reader: R,
        total: Option<u64>,
        progress: Option<&dyn ProgressProvider>,
    ) -> Result<HashResult> {
        let started = Instant::now();
        let mut guard = ProgressGuard::start(progress, total.map_or(-1, clamp_i64));

        engine.init()?;
        let chunk_size = aligned_chunk_size(engine.block_size()?, self.chunk_target);
        let mut staging = SecureBuffer::new(chunk_size);

        let mut consumed = 0u64;
        loop {
            let filled = fill_chunk(&mut reader, &mut staging, consumed)?;
            if filled == 0 {
                break;
            }

            engine.update(&staging[..filled])?;
            consumed += filled as u64;
            guard.advance(consumed);

            if filled < chunk_size {
                break;
            }
        }

        engine.finalize()?;
        Ok(HashResult::from_engine(engine, consumed, started))
    }

    /// Hash a file's contents
    pub fn hash_file(
        &self,
        engine: &mut HashEngine,
        path: &Path,
        progress: Option<&dyn ProgressProvider>,
    ) -> Result<HashResult> {
        let (file, len) = match open_file(path) {
            Ok(opened) => opened,
            Err(e) => {
                let _guard = ProgressGuard::start(progress, -1);
                return Err(e);
            }
        };

        debug!("Hashing {} ({len} bytes) with {}", path.display(), engine.algorithm_name());
        self.hash_reader(engine, file, Some(len), progress)
            .map_err(|e| attach_path(e, path))
    }

    /// Async variant of [`hash_reader`](Self::hash_reader)
    pub async fn hash_async_reader<R>(
        &self,
        engine: &mut HashEngine,
        mut reader: R,
        total: Option<u64>,
        progress: Option<&dyn ProgressProvider>,
    ) -> Result<HashResult>
    where
        R: AsyncRead + Unpin,
    {
        let started = Instant::now();
        let mut guard = ProgressGuard::start(progress, total.map_or(-1, clamp_i64));

        engine.init()?;
        let chunk_size = aligned_chunk_size(engine.block_size()?, self.chunk_target);
        let mut staging = SecureBuffer::new(chunk_size);

        let mut consumed = 0u64;
        loop {
            let filled = fill_chunk_async(&mut reader, &mut staging, consumed).await?;
            if filled == 0 {
                break;
            }

            engine.update(&staging[..filled])?;
            consumed += filled as u64;
            guard.advance(consumed);

            if filled < chunk_size {
                break;
            }
        }

        engine.finalize()?;
        Ok(HashResult::from_engine(engine, consumed, started))
    }

    /// Async variant of [`hash_file`](Self::hash_file)
    pub async fn hash_file_async(
        &self,
        engine: &mut HashEngine,
        path: &Path,
        progress: Option<&dyn ProgressProvider>,
    ) -> Result<HashResult> {
        let opened = async {
            let file = tokio::fs::File::open(path).await?;
            let len = file.metadata().await?.len();
            Ok::<_, std::io::Error>((file, len))
        }
        .await;

        let (file, len) = match opened {
            Ok(opened) => opened,
            Err(e) => {
                let _guard = ProgressGuard::start(progress, -1);
                return Err(open_error(e, path).into());
            }
        };

        debug!("Hashing {} ({len} bytes) with {}", path.display(), engine.algorithm_name());
        self.hash_async_reader(engine, file, Some(len), progress)
            .await
            .map_err(|e| attach_path(e, path))
    }
}

/// Read until the buffer is full or the stream ends
///
/// Returns the number of bytes placed in `buf`. Short reads are retried so
/// every chunk except the last stays block aligned.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8], consumed: u64) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(IoError::read_failed(consumed + filled as u64, e).into()),
        }
    }
    Ok(filled)
}

async fn fill_chunk_async<R>(reader: &mut R, buf: &mut [u8], consumed: u64) -> Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(IoError::read_failed(consumed + filled as u64, e).into()),
        }
    }
    Ok(filled)
}

fn open_file(path: &Path) -> Result<(File, u64)> {
    let file = File::open(path).map_err(|e| open_error(e, path))?;
    let len = file.metadata().map_err(|e| open_error(e, path))?.len();
    Ok((file, len))
}

fn open_error(source: std::io::Error, path: &Path) -> IoError {
    match source.kind() {
        ErrorKind::NotFound => IoError::file_not_found(path),
        ErrorKind::PermissionDenied => IoError::permission_denied(path, source),
        _ => IoError::from_std(source).with_path(path),
    }
}

fn attach_path(error: crate::Error, path: &Path) -> crate::Error {
    match error {
        crate::Error::Io(io) if io.path.is_none() => crate::Error::Io(io.with_path(path)),
        other => other,
    }
}
