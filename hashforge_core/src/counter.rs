//! Overflow-safe 256-bit bit counter
//!
//! Tracks the total number of message bits fed to an engine. The value is kept
//! as eight 32-bit words, least significant word first, so that algorithms
//! with 64-bit and 128-bit length fields can both read the exact count.

use crate::error::{EngineError, Result};
use zeroize::Zeroize;

/// Number of 32-bit words in the counter
pub const COUNTER_WORDS: usize = 8;

/// 256-bit unsigned count of bits processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Zeroize)]
pub struct BitCounter {
    words: [u32; COUNTER_WORDS],
}

impl BitCounter {
    /// Create a zeroed counter
    pub const fn new() -> Self {
        Self {
            words: [0; COUNTER_WORDS],
        }
    }

    /// Build a counter from raw words, least significant first
    pub const fn from_words(words: [u32; COUNTER_WORDS]) -> Self {
        Self { words }
    }

    /// The largest representable bit count
    pub const fn max() -> Self {
        Self {
            words: [u32::MAX; COUNTER_WORDS],
        }
    }

    /// Add `byte_count * 8` bits.
    ///
    /// The multiplication by eight is split across the low words so it can
    /// never overflow the input type. The counter is left untouched when the
    /// addition would carry past the most significant word.
    pub fn increment(&mut self, byte_count: u64) -> Result<()> {
        if byte_count == 0 {
            return Ok(());
        }

        let addend: [u32; 3] = [
            (byte_count << 3) as u32,
            (byte_count >> 29) as u32,
            (byte_count >> 61) as u32,
        ];

        let mut next = self.words;
        let mut carry = 0u64;
        for (i, word) in next.iter_mut().enumerate() {
            let add = addend.get(i).copied().unwrap_or(0);
            let sum = u64::from(*word) + u64::from(add) + carry;
            *word = sum as u32;
            carry = sum >> 32;
        }

        if carry != 0 {
            return Err(EngineError::CounterOverflow.into());
        }

        self.words = next;
        Ok(())
    }

    /// Reset to zero
    pub fn reset(&mut self) {
        self.words.zeroize();
    }

    /// Whether no bits have been counted
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Raw words, least significant first
    pub fn words(&self) -> &[u32; COUNTER_WORDS] {
        &self.words
    }

    /// Low 64 bits of the count
    pub fn low_u64(&self) -> u64 {
        u64::from(self.words[0]) | (u64::from(self.words[1]) << 32)
    }

    /// The count as a `u128`, or `None` if it does not fit
    pub fn as_u128(&self) -> Option<u128> {
        if self.words[4..].iter().any(|&w| w != 0) {
            return None;
        }
        Some(
            self.words[..4]
                .iter()
                .rev()
                .fold(0u128, |acc, &w| (acc << 32) | u128::from(w)),
        )
    }

    /// Full 32-byte big-endian encoding
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.words.iter().rev()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Full 32-byte little-endian encoding
    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.words.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// The low `width` bytes of the count, big-endian (width ≤ 32)
    pub fn length_be(&self, width: usize) -> Vec<u8> {
        let width = width.min(32);
        self.to_be_bytes()[32 - width..].to_vec()
    }

    /// The low `width` bytes of the count, little-endian (width ≤ 32)
    pub fn length_le(&self, width: usize) -> Vec<u8> {
        let width = width.min(32);
        self.to_le_bytes()[..width].to_vec()
    }
}
