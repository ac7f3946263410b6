//! A resizable byte arena for raw directory records.

use alloc::vec::Vec;

/// An owned byte arena whose capacity can change while its contents are
/// preserved.
///
/// Unlike `Vec`, the whole capacity is addressable: freshly grown space is
/// zeroed, and the kernel writes records directly into it.
#[derive(Debug)]
pub struct Buffer {
    storage: Vec<u8>,
}

impl Buffer {
    /// Allocate a zeroed buffer of `size` bytes.
    pub fn allocate(size: usize) -> Self {
        Self {
            storage: vec![0; size],
        }
    }

    /// Change the capacity to `new_size`, keeping the first
    /// `min(capacity, new_size)` bytes.
    pub fn resize(&mut self, new_size: usize) {
        // `Vec::resize` keeps the prefix in both directions, like `realloc`.
        self.storage.resize(new_size, 0);
        if new_size < self.storage.capacity() / 2 {
            self.storage.shrink_to_fit();
        }
    }

    /// Release the storage.
    pub fn free(self) {
        log::trace!("Freeing {} byte record buffer", self.capacity());
        drop(self);
    }

    /// The current capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The whole storage region.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage
    }

    /// The whole storage region, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    /// The unused tail of the buffer, starting at `offset`.
    ///
    /// Returns an empty slice when `offset` is at or past the capacity.
    #[inline]
    pub fn spare_from(&mut self, offset: usize) -> &mut [u8] {
        let start = offset.min(self.storage.len());
        &mut self.storage[start..]
    }
}
