//! Byte-level access to the inspected process.
//!
//! [`ProcessMemory`] is the only path by which the inspector reads or
//! writes foreign memory. Implementations take `&self` for writes too:
//! the memory belongs to another process (or another runtime), so there
//! is no Rust-side ownership to borrow mutably.

use crate::error::MemoryError;
use crate::id::Address;
use crate::layout::MemoryLayout;
use smallvec::SmallVec;

/// Raw byte access into foreign memory.
pub trait ProcessMemory {
    /// Fill `buf` with the bytes at `address`.
    fn read(&self, address: Address, buf: &mut [u8]) -> Result<(), MemoryError>;

    /// Store `bytes` at `address`.
    fn write(&self, address: Address, bytes: &[u8]) -> Result<(), MemoryError>;

    /// Move `len` bytes from `src` to `dst`. The ranges may overlap.
    fn copy_within(&self, src: Address, dst: Address, len: usize) -> Result<(), MemoryError> {
        let mut scratch = vec![0u8; len];
        self.read(src, &mut scratch)?;
        self.write(dst, &scratch)
    }
}

/// Little-endian typed helpers over any [`ProcessMemory`].
pub trait MemoryExt: ProcessMemory {
    /// Read exactly `N` bytes.
    fn read_array<const N: usize>(&self, address: Address) -> Result<[u8; N], MemoryError> {
        let mut buf = [0u8; N];
        self.read(address, &mut buf)?;
        Ok(buf)
    }

    /// Read one byte.
    fn read_u8(&self, address: Address) -> Result<u8, MemoryError> {
        Ok(self.read_array::<1>(address)?[0])
    }

    /// Read a signed 32-bit integer.
    fn read_i32(&self, address: Address) -> Result<i32, MemoryError> {
        Ok(i32::from_le_bytes(self.read_array(address)?))
    }

    /// Read an unsigned 32-bit integer.
    fn read_u32(&self, address: Address) -> Result<u32, MemoryError> {
        Ok(u32::from_le_bytes(self.read_array(address)?))
    }

    /// Read an unsigned 64-bit integer.
    fn read_u64(&self, address: Address) -> Result<u64, MemoryError> {
        Ok(u64::from_le_bytes(self.read_array(address)?))
    }

    /// Write one byte.
    fn write_u8(&self, address: Address, value: u8) -> Result<(), MemoryError> {
        self.write(address, &[value])
    }

    /// Write a signed 32-bit integer.
    fn write_i32(&self, address: Address, value: i32) -> Result<(), MemoryError> {
        self.write(address, &value.to_le_bytes())
    }

    /// Read a pointer of the process's width.
    fn read_pointer(&self, address: Address, layout: &MemoryLayout) -> Result<Address, MemoryError> {
        let raw = match layout.pointer_size() {
            4 => u64::from(self.read_u32(address)?),
            _ => self.read_u64(address)?,
        };
        usize::try_from(raw)
            .map(Address)
            .map_err(|_| MemoryError::Unreadable {
                address,
                len: layout.pointer_size(),
            })
    }

    /// Write a pointer of the process's width.
    fn write_pointer(
        &self,
        address: Address,
        value: Address,
        layout: &MemoryLayout,
    ) -> Result<(), MemoryError> {
        let mut bytes = PointerBytes::new();
        push_pointer(&mut bytes, address, value, layout)?;
        self.write(address, &bytes)
    }

    /// Write two adjacent pointers with a single write, so a failure
    /// leaves both unchanged.
    fn write_pointer_pair(
        &self,
        address: Address,
        first: Address,
        second: Address,
        layout: &MemoryLayout,
    ) -> Result<(), MemoryError> {
        let mut bytes = PointerBytes::new();
        push_pointer(&mut bytes, address, first, layout)?;
        push_pointer(&mut bytes, address, second, layout)?;
        self.write(address, &bytes)
    }
}

type PointerBytes = SmallVec<[u8; 16]>;

/// Append `value` encoded at the process's pointer width.
fn push_pointer(
    out: &mut PointerBytes,
    address: Address,
    value: Address,
    layout: &MemoryLayout,
) -> Result<(), MemoryError> {
    let raw = value.0 as u64;
    match layout.pointer_size() {
        4 => {
            let narrow = u32::try_from(raw).map_err(|_| MemoryError::Unwritable {
                address,
                len: 4,
            })?;
            out.extend_from_slice(&narrow.to_le_bytes());
        }
        _ => out.extend_from_slice(&raw.to_le_bytes()),
    }
    Ok(())
}

impl<M: ProcessMemory + ?Sized> MemoryExt for M {}
