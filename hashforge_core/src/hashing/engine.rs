//! Incremental hash engine
//!
//! [`HashEngine`] drives a boxed [`HashAlgorithm`] through its lifecycle:
//! `init`, any number of `update` calls, `finalize`, then digest reads.
//! The engine owns the block buffer and the bit counter; the algorithm only
//! sees whole blocks.

use super::accumulator::BlockAccumulator;
use super::digest::Digest;
use super::traits::HashAlgorithm;
use crate::counter::BitCounter;
use crate::error::{EngineError, Result};
use crate::formatting::{self, DigestFormatter};
use log::{debug, trace};

/// Lifecycle position of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed but never initialized
    Uninitialized,
    /// Accepting message bytes
    Ready,
    /// Digest written; only reads or a new `init` are valid
    Finalized,
}

/// Stateful incremental hasher over one algorithm
pub struct HashEngine {
    algorithm: Box<dyn HashAlgorithm>,
    accumulator: BlockAccumulator,
    state: EngineState,
}

impl HashEngine {
    /// Wrap a boxed algorithm
    pub fn new(algorithm: Box<dyn HashAlgorithm>) -> Self {
        let accumulator = BlockAccumulator::new(algorithm.default_padding_byte());
        Self {
            algorithm,
            accumulator,
            state: EngineState::Uninitialized,
        }
    }

    /// Wrap a concrete algorithm value
    pub fn from_algorithm<A: HashAlgorithm + 'static>(algorithm: A) -> Self {
        Self::new(Box::new(algorithm))
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.algorithm.name()
    }

    pub fn display_name(&self) -> &'static str {
        self.algorithm.display_name()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Block size of the wrapped algorithm
    ///
    /// Fails with `AbstractInvocation` when the algorithm reports zero.
    pub fn block_size(&self) -> Result<usize> {
        match self.algorithm.block_size() {
            0 => Err(EngineError::abstract_invocation(self.algorithm.name(), "block_size").into()),
            size => Ok(size),
        }
    }

    /// Digest size of the wrapped algorithm
    ///
    /// Fails with `AbstractInvocation` when the algorithm reports zero.
    pub fn digest_size(&self) -> Result<usize> {
        match self.algorithm.digest_size() {
            0 => Err(EngineError::abstract_invocation(self.algorithm.name(), "digest_size").into()),
            size => Ok(size),
        }
    }

    pub fn padding_byte(&self) -> u8 {
        self.accumulator.padding_byte()
    }

    /// Override the padding byte for subsequent finalizations
    pub fn set_padding_byte(&mut self, padding_byte: u8) {
        self.accumulator.set_padding_byte(padding_byte);
    }

    /// Bits hashed since the last `init`
    pub fn bit_count(&self) -> &BitCounter {
        self.accumulator.bit_count()
    }

    /// Start a new message.
    ///
    /// Allocates the block buffer on first use and reuses it afterwards
    /// unless the block size changed. May be called in any state.
    pub fn init(&mut self) -> Result<()> {
        let block_size = self.block_size()?;
        self.digest_size()?;

        self.accumulator.reset(block_size);
        self.algorithm.init_state();
        self.state = EngineState::Ready;

        trace!(
            "Initialized {} engine (block size {block_size})",
            self.algorithm.name()
        );
        Ok(())
    }

    /// Feed message bytes; an empty slice is a no-op
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.require_ready("update")?;
        self.accumulator.update(self.algorithm.as_mut(), data)
    }

    /// Feed the UTF-8 bytes of a string
    pub fn update_str(&mut self, text: &str) -> Result<()> {
        self.update(text.as_bytes())
    }

    /// Pad the message and compute the digest
    pub fn finalize(&mut self) -> Result<()> {
        self.require_ready("finalize")?;
        self.algorithm.finalize(&mut self.accumulator)?;
        self.accumulator.wipe();
        self.state = EngineState::Finalized;

        debug!(
            "Finalized {} digest over {} bits",
            self.algorithm.name(),
            self.accumulator.bit_count().low_u64()
        );
        Ok(())
    }

    /// Digest storage of the algorithm.
    ///
    /// Readable in any state; before `finalize` the contents are whatever
    /// the algorithm last wrote.
    pub fn digest(&self) -> &[u8] {
        self.algorithm.digest()
    }

    /// Independent copy of the digest bytes
    pub fn digest_as_bytes(&self) -> Digest {
        Digest::from_bytes(self.algorithm.digest())
    }

    /// Encode the digest as text.
    ///
    /// Uses the given formatter, else the process default formatter, else
    /// returns the raw bytes unchanged.
    pub fn digest_as_text(&self, formatter: Option<&dyn DigestFormatter>) -> Vec<u8> {
        formatting::encode_digest(self.algorithm.digest(), formatter)
    }

    /// Zero all algorithm state and buffered bytes
    ///
    /// The engine must be initialized again before further use.
    pub fn wipe(&mut self) {
        self.algorithm.wipe();
        self.accumulator.wipe();
        self.state = EngineState::Uninitialized;
    }

    fn require_ready(&self, operation: &str) -> Result<()> {
        if self.state == EngineState::Ready {
            Ok(())
        } else {
            Err(EngineError::not_initialized(operation).into())
        }
    }
}

impl std::fmt::Debug for HashEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashEngine")
            .field("algorithm", &self.algorithm.name())
            .field("state", &self.state)
            .field("buffered", &self.accumulator.buffered())
            .finish()
    }
}

impl Drop for HashEngine {
    fn drop(&mut self) {
        self.algorithm.wipe();
        self.accumulator.wipe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::formatting::HexFormatter;
    use crate::hashing::algorithms::{Md5, Sha1, Sha256};
    use crate::hashing::traits::BlockTransform;

    /// Algorithm that never declared its geometry
    #[derive(Default)]
    struct Unsized;

    impl BlockTransform for Unsized {
        fn block_size(&self) -> usize {
            0
        }

        fn transform_block(&mut self, _block: &[u8]) {}
    }

    impl HashAlgorithm for Unsized {
        fn name(&self) -> &'static str {
            "unsized"
        }

        fn digest_size(&self) -> usize {
            0
        }

        fn init_state(&mut self) {}

        fn finalize(&mut self, _accumulator: &mut BlockAccumulator) -> Result<()> {
            Ok(())
        }

        fn digest(&self) -> &[u8] {
            &[]
        }

        fn wipe(&mut self) {}
    }

    fn hex_of(engine: &HashEngine) -> String {
        hex::encode(engine.digest())
    }

    #[test]
    fn test_update_before_init_fails() {
        let mut engine = HashEngine::from_algorithm(Md5::default());
        let err = engine.update(b"abc").unwrap_err();
        assert!(err.is_not_initialized());
        assert_eq!(engine.state(), EngineState::Uninitialized);
    }

    #[test]
    fn test_finalize_before_init_fails() {
        let mut engine = HashEngine::from_algorithm(Md5::default());
        assert!(engine.finalize().unwrap_err().is_not_initialized());
    }

    #[test]
    fn test_update_after_finalize_fails() {
        let mut engine = HashEngine::from_algorithm(Sha1::default());
        engine.init().unwrap();
        engine.finalize().unwrap();

        assert!(engine.update(b"late").unwrap_err().is_not_initialized());
        assert!(engine.finalize().unwrap_err().is_not_initialized());
    }

    #[test]
    fn test_abstract_algorithm_rejected_at_init() {
        let mut engine = HashEngine::from_algorithm(Unsized);
        let err = engine.init().unwrap_err();
        assert!(matches!(
            err,
            Error::Engine(EngineError::AbstractInvocation { .. })
        ));
        assert!(engine.block_size().is_err());
        assert!(engine.digest_size().is_err());
    }

    #[test]
    fn test_md5_reference_vectors() {
        let mut engine = HashEngine::from_algorithm(Md5::default());

        engine.init().unwrap();
        engine.finalize().unwrap();
        assert_eq!(hex_of(&engine), "d41d8cd98f00b204e9800998ecf8427e");

        engine.init().unwrap();
        engine.update(b"abc").unwrap();
        engine.finalize().unwrap();
        assert_eq!(hex_of(&engine), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_reinit_discards_previous_message() {
        let mut engine = HashEngine::from_algorithm(Sha256::default());
        engine.init().unwrap();
        engine.update(b"garbage that must not leak into the next digest").unwrap();

        engine.init().unwrap();
        engine.update(b"abc").unwrap();
        engine.finalize().unwrap();

        assert_eq!(
            hex_of(&engine),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_bit_count_tracks_message_bytes() {
        let mut engine = HashEngine::from_algorithm(Md5::default());
        engine.init().unwrap();
        engine.update(b"hello").unwrap();
        engine.update(b"").unwrap();
        engine.update(b" world").unwrap();
        assert_eq!(engine.bit_count().low_u64(), 88);
    }

    #[test]
    fn test_finalize_leaves_message_bit_count() {
        for mut engine in [
            HashEngine::from_algorithm(Md5::default()),
            HashEngine::from_algorithm(Sha1::default()),
            HashEngine::from_algorithm(Sha256::default()),
        ] {
            engine.init().unwrap();
            engine.update(b"abc").unwrap();
            engine.finalize().unwrap();
            assert_eq!(engine.bit_count().low_u64(), 24);
        }
    }

    #[test]
    fn test_finalize_at_counter_limit_succeeds() {
        let mut engine = HashEngine::from_algorithm(Sha256::default());
        engine.init().unwrap();
        engine.accumulator.set_bit_count(BitCounter::max());

        engine.finalize().unwrap();
        assert_eq!(engine.state(), EngineState::Finalized);
        assert_eq!(*engine.bit_count(), BitCounter::max());
    }

    #[test]
    fn test_digest_copy_is_independent() {
        let mut engine = HashEngine::from_algorithm(Md5::default());
        engine.init().unwrap();
        engine.update_str("abc").unwrap();
        engine.finalize().unwrap();

        let copy = engine.digest_as_bytes();
        engine.wipe();

        assert_eq!(copy.to_hex(), "900150983cd24fb0d6963f7d28e17f72");
        assert!(engine.digest().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_digest_as_text_with_explicit_formatter() {
        let mut engine = HashEngine::from_algorithm(Md5::default());
        engine.init().unwrap();
        engine.update(b"abc").unwrap();
        engine.finalize().unwrap();

        let text = engine.digest_as_text(Some(&HexFormatter::upper()));
        assert_eq!(text, b"900150983CD24FB0D6963F7D28E17F72");
    }

    #[test]
    fn test_digest_readable_before_finalize() {
        let mut engine = HashEngine::from_algorithm(Sha1::default());
        engine.init().unwrap();
        assert_eq!(engine.digest().len(), 20);
    }

    #[test]
    fn test_padding_byte_defaults_to_0x80() {
        let engine = HashEngine::from_algorithm(Md5::default());
        assert_eq!(engine.padding_byte(), 0x80);
    }
}
