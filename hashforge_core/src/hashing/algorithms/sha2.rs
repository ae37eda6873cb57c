//! SHA-2 family on top of the `sha2` compression functions
//!
//! Buffering, bit counting and padding stay in the engine; only the block
//! compression is delegated.

use super::identity;
use super::padding::{LengthEndian, merkle_damgard_pad};
use crate::Result;
use crate::hashing::accumulator::BlockAccumulator;
use crate::hashing::registry::{AlgorithmDescriptor, AlgorithmRegistry};
use crate::hashing::traits::{BlockTransform, HashAlgorithm};
use sha2::digest::generic_array::GenericArray;
use sha2::digest::generic_array::typenum::{U64, U128};
use zeroize::{Zeroize, ZeroizeOnDrop};

const SHA224_IV: [u32; 8] = [
    0xc1059ed8, 0x367cd507, 0x3070dd17, 0xf70e5939, 0xffc00b31, 0x68581511, 0x64f98fa7, 0xbefa4fa4,
];

const SHA256_IV: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

const SHA384_IV: [u64; 8] = [
    0xcbbb9d5dc1059ed8,
    0x629a292a367cd507,
    0x9159015a3070dd17,
    0x152fecd8f70e5939,
    0x67332667ffc00b31,
    0x8eb44a8768581511,
    0xdb0c2e0d64f98fa7,
    0x47b5481dbefa4fa4,
];

const SHA512_IV: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

fn compress256_block(state: &mut [u32; 8], block: &[u8]) {
    let block: &GenericArray<u8, U64> = GenericArray::from_slice(block);
    sha2::compress256(state, std::slice::from_ref(block));
}

fn compress512_block(state: &mut [u64; 8], block: &[u8]) {
    let block: &GenericArray<u8, U128> = GenericArray::from_slice(block);
    sha2::compress512(state, std::slice::from_ref(block));
}

macro_rules! sha2_algorithm {
    (
        $(#[$meta:meta])*
        $name:ident {
            name: $id:literal,
            display: $display:literal,
            word: $word:ty,
            block: $block:literal,
            digest: $digest:literal,
            length_width: $length_width:literal,
            iv: $iv:expr,
            compress: $compress:path,
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct $name {
            state: [$word; 8],
            digest: [u8; $digest],
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    state: $iv,
                    digest: [0; $digest],
                }
            }
        }

        impl BlockTransform for $name {
            fn block_size(&self) -> usize {
                $block
            }

            fn transform_block(&mut self, block: &[u8]) {
                $compress(&mut self.state, block);
            }
        }

        impl HashAlgorithm for $name {
            fn name(&self) -> &'static str {
                $id
            }

            fn display_name(&self) -> &'static str {
                $display
            }

            fn digest_size(&self) -> usize {
                $digest
            }

            fn init_state(&mut self) {
                self.state = $iv;
                self.digest.zeroize();
            }

            fn finalize(&mut self, accumulator: &mut BlockAccumulator) -> Result<()> {
                merkle_damgard_pad(accumulator, self, $length_width, LengthEndian::Big)?;
                let word_size = std::mem::size_of::<$word>();
                for (out, word) in self.digest.chunks_mut(word_size).zip(self.state.iter()) {
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
    };
}

sha2_algorithm! {
    /// SHA-224 (FIPS 180-4)
    Sha224 {
        name: "sha224",
        display: "SHA-224",
        word: u32,
        block: 64,
        digest: 28,
        length_width: 8,
        iv: SHA224_IV,
        compress: compress256_block,
    }
}

sha2_algorithm! {
    /// SHA-256 (FIPS 180-4)
    Sha256 {
        name: "sha256",
        display: "SHA-256",
        word: u32,
        block: 64,
        digest: 32,
        length_width: 8,
        iv: SHA256_IV,
        compress: compress256_block,
    }
}

sha2_algorithm! {
    /// SHA-384 (FIPS 180-4)
    Sha384 {
        name: "sha384",
        display: "SHA-384",
        word: u64,
        block: 128,
        digest: 48,
        length_width: 16,
        iv: SHA384_IV,
        compress: compress512_block,
    }
}

sha2_algorithm! {
    /// SHA-512 (FIPS 180-4)
    Sha512 {
        name: "sha512",
        display: "SHA-512",
        word: u64,
        block: 128,
        digest: 64,
        length_width: 16,
        iv: SHA512_IV,
        compress: compress512_block,
    }
}

pub(super) fn register(registry: &AlgorithmRegistry) -> Result<()> {
    registry.register(AlgorithmDescriptor::of::<Sha224>(identity::SHA224)?)?;
    registry.register(AlgorithmDescriptor::of::<Sha256>(identity::SHA256)?)?;
    registry.register(AlgorithmDescriptor::of::<Sha384>(identity::SHA384)?)?;
    registry.register(AlgorithmDescriptor::of::<Sha512>(identity::SHA512)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashEngine;

    fn hex_digest<A: HashAlgorithm + Default + 'static>(data: &[u8]) -> String {
        let mut engine = HashEngine::from_algorithm(A::default());
        engine.init().unwrap();
        engine.update(data).unwrap();
        engine.finalize().unwrap();
        hex::encode(engine.digest())
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            hex_digest::<Sha224>(b""),
            "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f"
        );
        assert_eq!(
            hex_digest::<Sha256>(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hex_digest::<Sha384>(b""),
            "38b060a751ac96384cd9327eb1b1e36a21fdb71114be07434c0cc7bf63f6e1da274edebfe76f65fbd51ad2f14898b95b"
        );
        assert_eq!(
            hex_digest::<Sha512>(b""),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn test_abc() {
        assert_eq!(
            hex_digest::<Sha224>(b"abc"),
            "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
        );
        assert_eq!(
            hex_digest::<Sha256>(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hex_digest::<Sha384>(b"abc"),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
        );
        assert_eq!(
            hex_digest::<Sha512>(b"abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_geometry() {
        assert_eq!(Sha224::default().digest_size(), 28);
        assert_eq!(Sha256::default().block_size(), 64);
        assert_eq!(Sha384::default().digest_size(), 48);
        assert_eq!(Sha512::default().block_size(), 128);
    }

    #[test]
    fn test_matches_sha2_crate_across_block_boundaries() {
        use sha2::Digest as _;

        let data: Vec<u8> = (0..1000u32).map(|i| (i * 31 % 251) as u8).collect();
        for len in [55, 56, 63, 64, 65, 111, 112, 127, 128, 129, 1000] {
            let slice = &data[..len];
            assert_eq!(
                hex_digest::<Sha256>(slice),
                hex::encode(sha2::Sha256::digest(slice)),
                "sha256 length {len}"
            );
            assert_eq!(
                hex_digest::<Sha512>(slice),
                hex::encode(sha2::Sha512::digest(slice)),
                "sha512 length {len}"
            );
        }
    }
}
