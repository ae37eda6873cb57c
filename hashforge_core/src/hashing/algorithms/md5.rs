//! MD5 hash algorithm implementation

use super::identity;
use super::padding::{LengthEndian, merkle_damgard_pad};
use crate::Result;
use crate::hashing::accumulator::BlockAccumulator;
use crate::hashing::registry::{AlgorithmDescriptor, AlgorithmRegistry};
use crate::hashing::traits::{BlockTransform, HashAlgorithm};
use zeroize::{Zeroize, ZeroizeOnDrop};

const BLOCK_SIZE: usize = 64;
const DIGEST_SIZE: usize = 16;

const INITIAL_STATE: [u32; 4] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476];

const SHIFTS: [u32; 16] = [7, 12, 17, 22, 5, 9, 14, 20, 4, 11, 16, 23, 6, 10, 15, 21];

#[rustfmt::skip]
const K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee,
    0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be,
    0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa,
    0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
    0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c,
    0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05,
    0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039,
    0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1,
    0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// MD5 (RFC 1321)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Md5 {
    state: [u32; 4],
    digest: [u8; DIGEST_SIZE],
}

impl Default for Md5 {
    fn default() -> Self {
        Self {
            state: INITIAL_STATE,
            digest: [0; DIGEST_SIZE],
        }
    }
}

impl BlockTransform for Md5 {
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn transform_block(&mut self, block: &[u8]) {
        let mut x = [0u32; 16];
        for (word, bytes) in x.iter_mut().zip(block.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        let [mut a, mut b, mut c, mut d] = self.state;

        for i in 0..64 {
            let round = i / 16;
            let (f, g) = match round {
                0 => ((b & c) | (!b & d), i),
                1 => ((d & b) | (!d & c), (5 * i + 1) % 16),
                2 => (b ^ c ^ d, (3 * i + 5) % 16),
                _ => (c ^ (b | !d), (7 * i) % 16),
            };

            let rotated = a
                .wrapping_add(f)
                .wrapping_add(K[i])
                .wrapping_add(x[g])
                .rotate_left(SHIFTS[round * 4 + i % 4]);

            a = d;
            d = c;
            c = b;
            b = b.wrapping_add(rotated);
        }

        for (s, v) in self.state.iter_mut().zip([a, b, c, d]) {
            *s = s.wrapping_add(v);
        }

        x.zeroize();
    }
}

impl HashAlgorithm for Md5 {
    fn name(&self) -> &'static str {
        "md5"
    }

    fn display_name(&self) -> &'static str {
        "MD5"
    }

    fn digest_size(&self) -> usize {
        DIGEST_SIZE
    }

    fn init_state(&mut self) {
        self.state = INITIAL_STATE;
        self.digest.zeroize();
    }

    fn finalize(&mut self, accumulator: &mut BlockAccumulator) -> Result<()> {
        merkle_damgard_pad(accumulator, self, 8, LengthEndian::Little)?;
        for (out, word) in self.digest.chunks_exact_mut(4).zip(self.state.iter()) {
            out.copy_from_slice(&word.to_le_bytes());
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
    registry.register(AlgorithmDescriptor::of::<Md5>(identity::MD5)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashEngine;

    fn md5_hex(data: &[u8]) -> String {
        let mut engine = HashEngine::from_algorithm(Md5::default());
        engine.init().unwrap();
        engine.update(data).unwrap();
        engine.finalize().unwrap();
        hex::encode(engine.digest())
    }

    #[test]
    fn test_rfc1321_vectors() {
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex(b"a"), "0cc175b9c0f1b6a831c399e269772661");
        assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(
            md5_hex(b"message digest"),
            "f96b697d7cb7938d525a2f31aaf161d0"
        );
        assert_eq!(
            md5_hex(
                b"12345678901234567890123456789012345678901234567890123456789012345678901234567890"
            ),
            "57edf4a22be3c955ac49da2e2107b67a"
        );
    }

    #[test]
    fn test_metadata() {
        let md5 = Md5::default();
        assert_eq!(md5.name(), "md5");
        assert_eq!(md5.block_size(), 64);
        assert_eq!(md5.digest_size(), 16);
    }

    #[test]
    fn test_wipe_zeros_state() {
        let mut md5 = Md5::default();
        md5.wipe();
        assert_eq!(md5.state, [0; 4]);
        assert_eq!(md5.digest, [0; DIGEST_SIZE]);
    }
}
