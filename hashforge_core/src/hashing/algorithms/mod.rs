//! Hash algorithm implementations

use super::registry::AlgorithmRegistry;
use crate::Result;

mod md5;
mod padding;
mod sha1;
mod sha2;

pub use md5::Md5;
pub use padding::{LengthEndian, merkle_damgard_pad};
pub use sha1::Sha1;
pub use sha2::{Sha224, Sha256, Sha384, Sha512};

/// Numeric identities of the built-in algorithms (multicodec codes)
pub mod identity {
    pub const MD5: u64 = 0xd5;
    pub const SHA1: u64 = 0x11;
    pub const SHA224: u64 = 0x1013;
    pub const SHA256: u64 = 0x12;
    pub const SHA384: u64 = 0x20;
    pub const SHA512: u64 = 0x13;
}

/// Register all built-in algorithms with the registry
pub fn register_all(registry: &AlgorithmRegistry) -> Result<()> {
    md5::register(registry)?;
    sha1::register(registry)?;
    sha2::register(registry)?;
    Ok(())
}
