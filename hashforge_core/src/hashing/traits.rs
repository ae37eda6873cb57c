//! Core traits for the hash algorithm extensibility system

use super::accumulator::BlockAccumulator;
use crate::Result;

/// Block-level transform of a hash algorithm
///
/// The engine owns all buffering; an implementation only ever sees whole
/// blocks of exactly [`block_size`](Self::block_size) bytes.
pub trait BlockTransform {
    /// Number of bytes consumed per transform call
    fn block_size(&self) -> usize;

    /// Mix one full block into the running state
    fn transform_block(&mut self, block: &[u8]);
}

/// Hooks every concrete hash algorithm implements
///
/// A size of zero from [`digest_size`](Self::digest_size) or
/// [`BlockTransform::block_size`] marks an algorithm that has no concrete
/// geometry yet; the engine and the registry both refuse to drive it.
pub trait HashAlgorithm: BlockTransform + Send {
    /// Registry name, lowercase
    fn name(&self) -> &'static str;

    /// Display name for user interfaces
    fn display_name(&self) -> &'static str {
        self.name()
    }

    /// Length of the finished digest in bytes
    fn digest_size(&self) -> usize;

    /// First byte of the padding appended by [`finalize`](Self::finalize)
    fn default_padding_byte(&self) -> u8 {
        0x80
    }

    /// Reset the working state to the algorithm's initial values
    fn init_state(&mut self);

    /// Pad the message and write the digest.
    ///
    /// The accumulator exposes the bit count and padding byte and must be
    /// used to feed the padding so the final blocks go through the same
    /// buffering path as message data.
    fn finalize(&mut self, accumulator: &mut BlockAccumulator) -> Result<()>;

    /// Current digest storage
    ///
    /// Only meaningful after [`finalize`](Self::finalize); before that it
    /// holds whatever the algorithm last wrote (zeros after init).
    fn digest(&self) -> &[u8];

    /// Zero the working state and the digest storage
    fn wipe(&mut self);
}
