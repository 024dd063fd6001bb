//! In-process memory backend.
//!
//! Used when the inspector runs inside the inspected process, so a
//! foreign address is a plain pointer in our own address space. This is
//! the only module in Peek that contains `unsafe` code. Every access is
//! unaligned and byte-wise. Constructing the backend is `unsafe`: the
//! caller promises to hand in only addresses the foreign runtime reported.

#![allow(unsafe_code)]

use std::ptr;

use crate::error::MemoryError;
use crate::id::Address;
use crate::memory::ProcessMemory;

/// Direct pointer access to the current process.
///
/// Only constructible through the `unsafe` [`InProcessMemory::new`], so
/// the code that picks in-process addressing carries the mapping contract.
#[derive(Clone, Copy, Debug)]
pub struct InProcessMemory {
    _contract: (),
}

impl InProcessMemory {
    /// Create the backend.
    ///
    /// # Safety
    ///
    /// Every non-null [`Address`] later passed to this backend must lie in
    /// memory that is mapped in the current process, valid for the
    /// requested length, and writable where written, for as long as the
    /// access runs. In practice this means only addresses the foreign
    /// runtime reported for live objects, read within one display cycle.
    pub unsafe fn new() -> Self {
        Self { _contract: () }
    }
}

fn check_range(address: Address, len: usize) -> Result<(), MemoryError> {
    if address.is_null() {
        return Err(MemoryError::NullPointer);
    }
    if address.0.checked_add(len).is_none() {
        return Err(MemoryError::Unreadable { address, len });
    }
    Ok(())
}

impl ProcessMemory for InProcessMemory {
    fn read(&self, address: Address, buf: &mut [u8]) -> Result<(), MemoryError> {
        check_range(address, buf.len())?;
        // SAFETY: the range is mapped and valid per the contract accepted in
        // `new`. `buf` is a distinct Rust allocation, so the ranges cannot
        // overlap.
        unsafe {
            ptr::copy_nonoverlapping(address.0 as *const u8, buf.as_mut_ptr(), buf.len());
        }
        Ok(())
    }

    fn write(&self, address: Address, bytes: &[u8]) -> Result<(), MemoryError> {
        check_range(address, bytes.len()).map_err(|e| match e {
            MemoryError::Unreadable { address, len } => MemoryError::Unwritable { address, len },
            other => other,
        })?;
        // SAFETY: as for `read`; `new`'s contract covers writability.
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), address.0 as *mut u8, bytes.len());
        }
        Ok(())
    }

    fn copy_within(&self, src: Address, dst: Address, len: usize) -> Result<(), MemoryError> {
        check_range(src, len)?;
        check_range(dst, len)?;
        // SAFETY: both ranges are valid per `new`'s contract; `ptr::copy`
        // permits overlap.
        unsafe {
            ptr::copy(src.0 as *const u8, dst.0 as *mut u8, len);
        }
        Ok(())
    }
}
