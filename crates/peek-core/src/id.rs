//! Foreign addresses, object references, and host-UI identity counters.

use std::fmt;

/// A raw address inside the inspected process.
///
/// Addresses are plain integers: Peek never dereferences one except
/// through a [`ProcessMemory`](crate::ProcessMemory) implementation,
/// which is free to reject it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub usize);

impl Address {
    /// The null address.
    pub const NULL: Address = Address(0);

    /// Whether this is the null address.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// This address advanced by `bytes`.
    ///
    /// Wraps rather than panics: a garbage base read from foreign memory
    /// must produce a garbage address, not abort the inspector.
    #[must_use]
    pub fn offset(self, bytes: usize) -> Address {
        Address(self.0.wrapping_add(bytes))
    }

    /// Address of element `index` in a sequence starting here.
    #[must_use]
    pub fn element(self, index: usize, stride: usize) -> Address {
        self.offset(index.wrapping_mul(stride))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl From<usize> for Address {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// Identity of an object owned by the foreign runtime.
///
/// This is the object's address. Type definitions (classes, structs,
/// enums, functions) are objects too, so the same handle names them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(pub usize);

impl ObjectRef {
    /// The null reference.
    pub const NULL: ObjectRef = ObjectRef(0);

    /// Whether this reference is null.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The address the object lives at.
    pub fn address(self) -> Address {
        Address(self.0)
    }
}

impl From<Address> for ObjectRef {
    fn from(addr: Address) -> Self {
        Self(addr.0)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Liveness stamp for a foreign object.
///
/// Reported by [`Reflection::generation`](crate::Reflection::generation).
/// The foreign allocator gives no weak references, so a slot remembers
/// the generation its owner had when the slot was bound and compares it
/// every cycle. A reused address gets a different generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque host-UI identity for one view.
///
/// Only ever appended to widget ids. Never part of filter text, never
/// compared by the inspector itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic source of [`ViewId`]s.
///
/// Owned by whoever owns the inspectors and passed into view
/// construction explicitly. Two views built from the same allocator
/// never share an id.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create an allocator starting at zero.
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Hand out a fresh id.
    pub fn allocate(&mut self) -> ViewId {
        let id = ViewId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_address_uses_stride() {
        let base = Address(0x1000);
        assert_eq!(base.element(0, 16), Address(0x1000));
        assert_eq!(base.element(3, 16), Address(0x1030));
    }

    #[test]
    fn offset_wraps_instead_of_panicking() {
        let near_end = Address(usize::MAX - 1);
        assert_eq!(near_end.offset(3), Address(1));
    }

    #[test]
    fn null_checks() {
        assert!(Address::NULL.is_null());
        assert!(ObjectRef::NULL.is_null());
        assert!(!ObjectRef(0x10).is_null());
        assert_eq!(ObjectRef(0x10).address(), Address(0x10));
    }

    #[test]
    fn allocator_never_repeats() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_ne!(a, b);
        assert_eq!(ids.allocated(), 2);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Address(255).to_string(), "0xFF");
        assert_eq!(ObjectRef(0xABC).to_string(), "0xABC");
    }
}
