//! SHA-1 hash algorithm implementation

use super::identity;
use super::padding::{LengthEndian, merkle_damgard_pad};
use crate::Result;
use crate::hashing::accumulator::BlockAccumulator;
use crate::hashing::registry::{AlgorithmDescriptor, AlgorithmRegistry};
use crate::hashing::traits::{BlockTransform, HashAlgorithm};
use zeroize::{Zeroize, ZeroizeOnDrop};

const BLOCK_SIZE: usize = 64;
const DIGEST_SIZE: usize = 20;

const INITIAL_STATE: [u32; 5] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476, 0xc3d2e1f0];

/// SHA-1 (FIPS 180-4)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Sha1 {
    state: [u32; 5],
    digest: [u8; DIGEST_SIZE],
}

impl Default for Sha1 {
    fn default() -> Self {
        Self {
            state: INITIAL_STATE,
            digest: [0; DIGEST_SIZE],
        }
    }
}

impl BlockTransform for Sha1 {
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn transform_block(&mut self, block: &[u8]) {
        let mut w = [0u32; 80];
        for (word, bytes) in w.iter_mut().zip(block.chunks_exact(4)) {
            *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        for t in 16..80 {
            w[t] = (w[t - 3] ^ w[t - 8] ^ w[t - 14] ^ w[t - 16]).rotate_left(1);
        }

        let [mut a, mut b, mut c, mut d, mut e] = self.state;

        for (t, &word) in w.iter().enumerate() {
            let (f, k) = match t {
                0..=19 => ((b & c) | (!b & d), 0x5a827999),
                20..=39 => (b ^ c ^ d, 0x6ed9eba1),
                40..=59 => ((b & c) | (b & d) | (c & d), 0x8f1bbcdc),
                _ => (b ^ c ^ d, 0xca62c1d6),
            };

            let temp = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(word);

            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = temp;
        }

        for (s, v) in self.state.iter_mut().zip([a, b, c, d, e]) {
            *s = s.wrapping_add(v);
        }

        w.zeroize();
    }
}

impl HashAlgorithm for Sha1 {
    fn name(&self) -> &'static str {
        "sha1"
    }

    fn display_name(&self) -> &'static str {
        "SHA-1"
    }

    fn digest_size(&self) -> usize {
        DIGEST_SIZE
    }

    fn init_state(&mut self) {
        self.state = INITIAL_STATE;
        self.digest.zeroize();
    }

    fn finalize(&mut self, accumulator: &mut BlockAccumulator) -> Result<()> {
        merkle_damgard_pad(accumulator, self, 8, LengthEndian::Big)?;
        for (out, word) in self.digest.chunks_exact_mut(4).zip(self.state.iter()) {
            out.copy_from_slice(&word.to_be_bytes());
        }
        Ok(())
    }

    fn digest(&self) -> &[u8] {
        &self.digest
    }

    fn wipe(&mut self) {
        self.zeroize();
    }
}

pub(super) fn register(registry: &AlgorithmRegistry) -> Result<()> {
    registry.register(AlgorithmDescriptor::of::<Sha1>(identity::SHA1)?)?;
    Ok(())
}
