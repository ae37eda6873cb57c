//! Block buffer and bit counter shared by the engine and algorithm finalizers

use super::traits::BlockTransform;
use crate::counter::BitCounter;
use crate::error::{EngineError, Result};
use crate::security::SecureBuffer;

/// Assembles arbitrary input into whole blocks for a [`BlockTransform`]
///
/// Holds the partial block between calls, counts every message bit, and
/// carries the padding byte that algorithm finalizers read.
#[derive(Debug)]
pub struct BlockAccumulator {
    buffer: Option<SecureBuffer>,
    index: usize,
    counter: BitCounter,
    padding_byte: u8,
}

impl BlockAccumulator {
    pub(crate) fn new(padding_byte: u8) -> Self {
        Self {
            buffer: None,
            index: 0,
            counter: BitCounter::new(),
            padding_byte,
        }
    }

    /// Prepare for a new message with the given block size.
    ///
    /// The buffer is reallocated only when missing or sized for a different
    /// block; a dropped buffer zeros itself before release.
    pub(crate) fn reset(&mut self, block_size: usize) {
        match self.buffer.as_mut() {
            Some(buffer) if buffer.len() == block_size => buffer.wipe(),
            _ => {
                if let Some(old) = self.buffer.as_ref() {
                    log::debug!(
                        "Reallocating block buffer: {} -> {block_size} bytes",
                        old.len()
                    );
                }
                self.buffer = Some(SecureBuffer::new(block_size));
            }
        }
        self.index = 0;
        self.counter.reset();
    }

    /// Feed message bytes, transforming every completed block.
    ///
    /// The bit counter is advanced once with the full length before any
    /// buffering. On return fewer than one block of bytes remain buffered.
    pub fn update<T>(&mut self, transform: &mut T, data: &[u8]) -> Result<()>
    where
        T: BlockTransform + ?Sized,
    {
        if data.is_empty() {
            return Ok(());
        }

        let Some(buffer) = self.buffer.as_mut() else {
            return Err(EngineError::not_initialized("update").into());
        };

        self.counter.increment(data.len() as u64)?;
        self.absorb(transform, data);
        Ok(())
    }

    /// Feed padding bytes without counting them as message bits.
    ///
    /// Finalizers use this after reading [`bit_count`](Self::bit_count) so
    /// the counter keeps the message length once the digest is written.
    pub fn update_padding<T>(&mut self, transform: &mut T, padding: &[u8]) -> Result<()>
    where
        T: BlockTransform + ?Sized,
    {
        if padding.is_empty() {
            return Ok(());
        }
        if self.buffer.is_none() {
            return Err(EngineError::not_initialized("finalize").into());
        }
        self.absorb(transform, padding);
        Ok(())
    }

    fn absorb<T>(&mut self, transform: &mut T, data: &[u8])
    where
        T: BlockTransform + ?Sized,
    {
        let Some(buffer) = self.buffer.as_mut() else {
            return;
        };

        let block_size = buffer.len();
        let mut input = data;

        if self.index > 0 {
            let space = block_size - self.index;
            if input.len() < space {
                buffer[self.index..self.index + input.len()].copy_from_slice(input);
                self.index += input.len();
                return;
            }

            buffer[self.index..].copy_from_slice(&input[..space]);
            transform.transform_block(buffer);
            self.index = 0;
            input = &input[space..];
        }

        // Whole blocks go straight from the caller's slice
        let mut blocks = input.chunks_exact(block_size);
        for block in &mut blocks {
            transform.transform_block(block);
        }

        let tail = blocks.remainder();
        buffer[..tail.len()].copy_from_slice(tail);
        self.index = tail.len();
    }

    /// Total message bits counted since the last reset
    pub fn bit_count(&self) -> &BitCounter {
        &self.counter
    }

    /// Byte used to start the padding
    pub fn padding_byte(&self) -> u8 {
        self.padding_byte
    }

    pub(crate) fn set_padding_byte(&mut self, padding_byte: u8) {
        self.padding_byte = padding_byte;
    }

    /// Bytes currently held in the partial block
    pub fn buffered(&self) -> usize {
        self.index
    }

    /// Size of the allocated block buffer (0 before the first reset)
    pub fn block_size(&self) -> usize {
        self.buffer.as_ref().map_or(0, SecureBuffer::len)
    }

    /// Whether a buffer has been allocated
    pub fn is_allocated(&self) -> bool {
        self.buffer.is_some()
    }

    /// Zero the partial block without releasing it
    pub(crate) fn wipe(&mut self) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.wipe();
        }
        self.index = 0;
    }

    #[cfg(test)]
    pub(crate) fn set_bit_count(&mut self, counter: BitCounter) {
        self.counter = counter;
    }
}
