//! The reflection collaborator.
//!
//! [`Reflection`] is a read-only oracle over the foreign runtime's type
//! metadata, plus the handful of runtime services the inspector cannot
//! reimplement from raw bytes: name interning, string storage, the weak
//! and soft indirection tables, and the array allocator.
//!
//! Type definitions are objects. A class is an [`ObjectRef`] like any
//! other, and its metadata is looked up by that handle.

use crate::descriptor::{FieldDescriptor, StringKind};
use crate::error::MemoryError;
use crate::id::{Address, Generation, ObjectRef};
use crate::layout::NativeLayout;

/// Reference kinds that hold an identifier instead of a raw pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Indirection {
    /// Index into the runtime's weak object table.
    Weak,
    /// Asset path.
    Soft,
    /// Persistent guid.
    Lazy,
}

/// The target of a single bound delegate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DelegateBinding {
    /// Bound object. Null when unbound or collected.
    pub object: ObjectRef,
    /// Bound function name. Empty when unbound.
    pub function_name: String,
}

/// Read-only view of the foreign runtime's reflection system.
pub trait Reflection {
    // ── Liveness and identity ───────────────────────────────────

    /// Liveness stamp of `object`, or `None` if it no longer exists.
    fn generation(&self, object: ObjectRef) -> Option<Generation>;

    /// The object's class. Null for unknown objects.
    fn class_of(&self, object: ObjectRef) -> ObjectRef;

    /// Short object name.
    fn name_of(&self, object: ObjectRef) -> String;

    /// Fully qualified path, `Outer.Inner.Name`.
    fn path_name(&self, object: ObjectRef) -> String;

    // ── Type hierarchy ──────────────────────────────────────────

    /// Direct base of a type definition. Null at the root.
    fn super_of(&self, ty: ObjectRef) -> ObjectRef;

    /// `ty` and all of its bases, most-derived first.
    fn inheritance_chain(&self, ty: ObjectRef) -> Vec<ObjectRef> {
        let mut chain = Vec::new();
        let mut current = ty;
        while !current.is_null() && !chain.contains(&current) {
            chain.push(current);
            current = self.super_of(current);
        }
        chain
    }

    /// Whether `ty` is `base` or derives from it.
    fn inherits(&self, ty: ObjectRef, base: ObjectRef) -> bool {
        self.inheritance_chain(ty).contains(&base)
    }

    /// Whether `object` is an instance of `class`.
    fn is_instance(&self, object: ObjectRef, class: ObjectRef) -> bool {
        self.inherits(self.class_of(object), class)
    }

    // ── Fields ──────────────────────────────────────────────────

    /// Fields declared directly on `ty`, in declaration order.
    fn declared_fields(&self, ty: ObjectRef) -> Vec<FieldDescriptor>;

    /// All fields of `ty`, bases first.
    fn all_fields(&self, ty: ObjectRef) -> Vec<FieldDescriptor> {
        self.inheritance_chain(ty)
            .into_iter()
            .rev()
            .flat_map(|level| self.declared_fields(level))
            .collect()
    }

    /// Where the engine-native attributes sit in every object.
    fn native_layout(&self) -> NativeLayout;

    /// Extra native attributes specific to this object's kind.
    fn native_fields(&self, _object: ObjectRef) -> Vec<FieldDescriptor> {
        Vec::new()
    }

    // ── Lookup ──────────────────────────────────────────────────

    /// Find an object by class name and path.
    fn find_object(&self, class_name: &str, path: &str) -> Option<ObjectRef>;

    /// Byte offset of `interface`'s implementation inside `object`.
    fn interface_offset(&self, _object: ObjectRef, _interface: ObjectRef) -> Option<usize> {
        None
    }

    /// Function `name` on `object`'s class.
    fn find_function(&self, _object: ObjectRef, _name: &str) -> ObjectRef {
        ObjectRef::NULL
    }

    // ── Runtime services ────────────────────────────────────────

    /// Resolve the identifier stored at `address`. Null when unresolved.
    fn read_indirect(&self, _kind: Indirection, _address: Address) -> Result<ObjectRef, MemoryError> {
        Err(MemoryError::Unsupported("indirect references"))
    }

    /// Store an identifier for `object` at `address`.
    fn write_indirect(
        &self,
        _kind: Indirection,
        _address: Address,
        _object: ObjectRef,
    ) -> Result<(), MemoryError> {
        Err(MemoryError::Unsupported("indirect references"))
    }

    /// Raw identifier text at `address` (asset path, guid, weak index).
    fn indirect_identifier(&self, _kind: Indirection, _address: Address) -> Result<String, MemoryError> {
        Err(MemoryError::Unsupported("indirect references"))
    }

    /// Read a runtime string.
    fn read_string(&self, _kind: StringKind, _address: Address) -> Result<String, MemoryError> {
        Err(MemoryError::Unsupported("strings"))
    }

    /// Replace a runtime string. The runtime owns the buffer.
    fn write_string(&self, _kind: StringKind, _address: Address, _value: &str) -> Result<(), MemoryError> {
        Err(MemoryError::Unsupported("strings"))
    }

    /// Raw interned-name id at `address`.
    fn name_id(&self, _address: Address) -> Result<u64, MemoryError> {
        Err(MemoryError::Unsupported("names"))
    }

    /// Text of an interned name.
    fn name_text(&self, _id: u64) -> Option<String> {
        None
    }

    /// Intern `text` and store its id at `address`.
    fn write_name(&self, _address: Address, _text: &str) -> Result<(), MemoryError> {
        Err(MemoryError::Unsupported("names"))
    }

    /// Delegate binding stored at `address`.
    fn read_delegate(&self, _address: Address) -> Result<DelegateBinding, MemoryError> {
        Err(MemoryError::Unsupported("delegates"))
    }

    /// Resize the dynamic array whose header is at `header`.
    ///
    /// New elements are default-initialized. The data pointer may change.
    fn resize_array(
        &self,
        _header: Address,
        _inner: &FieldDescriptor,
        _new_len: usize,
    ) -> Result<(), MemoryError> {
        Err(MemoryError::Unsupported("array allocation"))
    }

    /// Run the destructor of the value at `address`.
    fn destroy_value(&self, _inner: &FieldDescriptor, _address: Address) -> Result<(), MemoryError> {
        Ok(())
    }
}
