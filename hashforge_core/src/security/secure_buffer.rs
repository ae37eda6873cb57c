//! Fixed-size byte buffer that zeros its memory before release
//!
//! Used for every allocation that may hold message bytes or digest output:
//! the engine's block buffer, copied-out digests, and the staging buffers of
//! the stream and file drivers.

use std::fmt;
use std::ops::{Deref, DerefMut};
use zeroize::Zeroize;

/// A heap buffer of fixed length that is zeroed on drop
///
/// The buffer never grows after construction, so its backing allocation is
/// never moved and no stale copy is left behind by a reallocation.
/// It provides the following security features:
/// - Zeroing of the full allocation on drop and on explicit wipe
/// - Redacted Debug output
/// - Constant-time comparison
/// - Best-effort memory locking on supported platforms
pub struct SecureBuffer {
    inner: Vec<u8>,
}

impl SecureBuffer {
    /// Allocate a zero-filled buffer of `len` bytes
    pub fn new(len: usize) -> Self {
        Self::from_bytes(vec![0u8; len])
    }

    /// Take ownership of existing bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        #[cfg(unix)]
        Self::try_lock_memory(&bytes);

        Self { inner: bytes }
    }

    /// Copy a slice into a new secure buffer
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes.to_vec())
    }

    /// Buffer length in bytes
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the buffer has zero length
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get the contents as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Overwrite the contents with zeros, keeping the allocation
    pub fn wipe(&mut self) {
        self.inner.as_mut_slice().zeroize();
    }

    /// Constant-time comparison
    pub fn constant_time_eq(&self, other: &[u8]) -> bool {
        constant_time_eq(&self.inner, other)
    }

    /// Try to lock memory pages containing the buffer
    #[cfg(unix)]
    fn try_lock_memory(data: &[u8]) {
        use libc::{_SC_PAGESIZE, mlock, sysconf};

        if data.is_empty() {
            return;
        }

        unsafe {
            let page_size = sysconf(_SC_PAGESIZE) as usize;
            let ptr = data.as_ptr() as *const libc::c_void;
            let len = data.len();

            // Align to page boundary
            let aligned_ptr = (ptr as usize & !(page_size - 1)) as *const libc::c_void;
            let offset = ptr as usize - aligned_ptr as usize;

            // Ignore errors - memory locking is best-effort
            let _ = mlock(aligned_ptr, offset + len);
        }
    }

    /// Unlock the pages this buffer covers entirely.
    ///
    /// `munlock` is per page and does not nest, so pages shared with a
    /// neighbouring allocation stay locked; another live buffer may still
    /// rely on them. Locking is best-effort either way.
    #[cfg(unix)]
    fn try_unlock_memory(&self) {
        use libc::{_SC_PAGESIZE, munlock, sysconf};

        let page_size = unsafe { sysconf(_SC_PAGESIZE) };
        if page_size <= 0 {
            return;
        }

        let Some((start, len)) =
            owned_page_range(self.inner.as_ptr() as usize, self.inner.len(), page_size as usize)
        else {
            return;
        };

        unsafe {
            let _ = munlock(start as *const libc::c_void, len);
        }
    }
}

/// Page-aligned span lying wholly inside `[addr, addr + len)`, if any
#[cfg_attr(not(unix), allow(dead_code))]
fn owned_page_range(addr: usize, len: usize, page_size: usize) -> Option<(usize, usize)> {
    let end = addr.checked_add(len)?;
    let first = addr.checked_add(page_size - 1)? & !(page_size - 1);
    let last = end & !(page_size - 1);
    (last > first).then(|| (first, last - first))
}

/// Compare two byte slices without early exit on the first difference
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

impl Drop for SecureBuffer {
    fn drop(&mut self) {
        #[cfg(unix)]
        self.try_unlock_memory();

        // Zeroes the whole capacity, not just the initialized length
        self.inner.zeroize();
    }
}

impl Clone for SecureBuffer {
    fn clone(&self) -> Self {
        Self::copy_from(&self.inner)
    }
}

impl Deref for SecureBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.inner
    }
}

impl DerefMut for SecureBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.inner
    }
}

impl AsRef<[u8]> for SecureBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

// Implement Debug to prevent accidental logging of message bytes
impl fmt::Debug for SecureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureBuffer({} bytes, ***)", self.inner.len())
    }
}

impl PartialEq for SecureBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.constant_time_eq(&other.inner)
    }
}

impl Eq for SecureBuffer {}

impl From<Vec<u8>> for SecureBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero_filled() {
        let buffer = SecureBuffer::new(64);
        assert_eq!(buffer.len(), 64);
        assert!(buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_wipe_keeps_length() {
        let mut buffer = SecureBuffer::copy_from(b"attack at dawn");
        buffer.wipe();
        assert_eq!(buffer.len(), 14);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_length_wipe_is_noop() {
        let mut buffer = SecureBuffer::new(0);
        buffer.wipe();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_debug_redacts_contents() {
        let buffer = SecureBuffer::copy_from(b"secret block");
        let debug_str = format!("{buffer:?}");
        assert_eq!(debug_str, "SecureBuffer(12 bytes, ***)");
        assert!(!debug_str.contains("secret"));
    }

    #[test]
    fn test_constant_time_comparison() {
        let a = SecureBuffer::copy_from(b"0123456789abcdef");
        let b = SecureBuffer::copy_from(b"0123456789abcdef");
        let c = SecureBuffer::copy_from(b"0123456789abcdeF");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.constant_time_eq(b"short"));
    }

    #[test]
    fn test_deref_mut_writes_through() {
        let mut buffer = SecureBuffer::new(4);
        buffer[1..3].copy_from_slice(&[7, 9]);
        assert_eq!(buffer.as_bytes(), &[0, 7, 9, 0]);
    }

    #[test]
    fn test_small_buffer_owns_no_whole_page() {
        assert_eq!(owned_page_range(0x1010, 64, 4096), None);
        assert_eq!(owned_page_range(0x1000, 4095, 4096), None);
        assert_eq!(owned_page_range(0x1000, 0, 4096), None);
    }

    #[test]
    fn test_owned_pages_exclude_shared_edges() {
        assert_eq!(owned_page_range(0x1000, 4096, 4096), Some((0x1000, 4096)));
        assert_eq!(owned_page_range(0x1010, 3 * 4096, 4096), Some((0x2000, 2 * 4096)));
        assert_eq!(owned_page_range(0x1fff, 4097, 4096), Some((0x2000, 4096)));
        assert_eq!(owned_page_range(0x1fff, 4096, 4096), None);
    }

    #[test]
    fn test_dropping_small_buffer_keeps_neighbour_intact() {
        let keep = SecureBuffer::copy_from(b"still here");
        drop(SecureBuffer::copy_from(b"neighbour"));
        assert_eq!(keep.as_bytes(), b"still here");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = SecureBuffer::copy_from(b"abc");
        let copy = original.clone();
        original.wipe();
        assert_eq!(copy.as_bytes(), b"abc");
    }
}
