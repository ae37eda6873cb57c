//! Secure memory handling for message and digest bytes
//!
//! Everything that may hold hashed input or digest output is kept in a
//! [`SecureBuffer`], which zeros its allocation before it is released.

pub mod secure_buffer;

pub use secure_buffer::{SecureBuffer, constant_time_eq};
