//! Byte layouts of the foreign runtime's built-in structures.
//!
//! Only the layouts the inspector itself has to walk live here: the
//! dynamic array header, the interface pointer pair, and the native
//! attributes every object carries. Everything else is described by
//! reflected [`FieldDescriptor`](crate::FieldDescriptor)s.

use crate::descriptor::ScalarKind;
use crate::id::ObjectRef;

/// Pointer width of the inspected process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerWidth {
    /// 32-bit process.
    Four,
    /// 64-bit process.
    #[default]
    Eight,
}

impl PointerWidth {
    /// Width in bytes.
    pub fn bytes(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// Map a byte count back to a supported width.
    pub fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            _ => None,
        }
    }
}

/// Derived layout constants for one foreign process.
///
/// A dynamic array is `(data: *T, count: i32, max: i32)`. An interface
/// reference is `(object: *Object, interface: *void)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryLayout {
    /// Pointer width of the process.
    pub pointer_width: PointerWidth,
}

impl MemoryLayout {
    /// Layout for a process with the given pointer width.
    pub fn new(pointer_width: PointerWidth) -> Self {
        Self { pointer_width }
    }

    /// Size of a pointer in bytes.
    pub fn pointer_size(&self) -> usize {
        self.pointer_width.bytes()
    }

    /// Offset of the element count inside an array header.
    pub fn array_count_offset(&self) -> usize {
        self.pointer_size()
    }

    /// Offset of the capacity inside an array header.
    pub fn array_max_offset(&self) -> usize {
        self.pointer_size() + 4
    }

    /// Total size of an array header.
    pub fn array_header_size(&self) -> usize {
        self.pointer_size() + 8
    }

    /// Offset of the adjusted interface pointer in an interface reference.
    pub fn interface_pointer_offset(&self) -> usize {
        self.pointer_size()
    }
}

/// Where the engine-native attributes sit inside every object.
///
/// Reported by the reflection collaborator. The two class handles are
/// the declared targets of the native `Class` and `Outer` references.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeLayout {
    /// Offset of the object flags word.
    pub flags_offset: usize,
    /// Width of the object flags word.
    pub flags_kind: ScalarKind,
    /// Offset of the internal object index.
    pub internal_index_offset: usize,
    /// Offset of the class pointer.
    pub class_offset: usize,
    /// Offset of the object's name.
    pub name_offset: usize,
    /// Offset of the outer (owner) pointer.
    pub outer_offset: usize,
    /// The root object class.
    pub object_class: ObjectRef,
    /// The class of classes.
    pub class_class: ObjectRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_header_64_bit() {
        let layout = MemoryLayout::new(PointerWidth::Eight);
        assert_eq!(layout.array_count_offset(), 8);
        assert_eq!(layout.array_max_offset(), 12);
        assert_eq!(layout.array_header_size(), 16);
        assert_eq!(layout.interface_pointer_offset(), 8);
    }

    #[test]
    fn array_header_32_bit() {
        let layout = MemoryLayout::new(PointerWidth::Four);
        assert_eq!(layout.array_count_offset(), 4);
        assert_eq!(layout.array_max_offset(), 8);
        assert_eq!(layout.array_header_size(), 12);
    }

    #[test]
    fn pointer_width_round_trip() {
        assert_eq!(PointerWidth::from_bytes(4), Some(PointerWidth::Four));
        assert_eq!(PointerWidth::from_bytes(8), Some(PointerWidth::Eight));
        assert_eq!(PointerWidth::from_bytes(2), None);
    }
}
