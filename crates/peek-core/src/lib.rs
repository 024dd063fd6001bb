//! Core types and collaborator traits for the Peek live object inspector.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary every other Peek crate speaks: foreign addresses and
//! object references, reflected field descriptors and their type tags,
//! generation-guarded value slots, and the traits through which the
//! inspector talks to its external collaborators.
//!
//! # Collaborators
//!
//! ```text
//! ProcessMemory   raw byte access into the inspected process
//! Reflection      read-only type oracle + the runtime's own services
//!                 (name table, string storage, array allocator, weak table)
//! Ui              host widget toolkit, consumed through draw calls
//! WindowRequests  window/session manager, only ever asked to open windows
//! ```
//!
//! None of these own the memory they describe. Everything addressed
//! through a [`ValueSlot`] may be freed or moved by the foreign process
//! between two display cycles, so every read is fresh and every failure
//! is a value, never a panic.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod descriptor;
pub mod error;
pub mod filter;
pub mod id;
pub mod layout;
pub mod memory;
mod raw;
pub mod reflection;
pub mod slot;
pub mod ui;
pub mod value;

pub use descriptor::{
    DeclarationKind, EnumDef, FieldDescriptor, FieldKind, PropertyFlags, ScalarKind, StringKind,
    TypeTag,
};
pub use error::{EditError, MemoryError};
pub use filter::TextFilter;
pub use id::{Address, Generation, IdAllocator, ObjectRef, ViewId};
pub use layout::{MemoryLayout, NativeLayout, PointerWidth};
pub use memory::{MemoryExt, ProcessMemory};
pub use raw::InProcessMemory;
pub use reflection::{DelegateBinding, Indirection, Reflection};
pub use slot::{SlotGuard, ValueSlot};
pub use ui::{InputMode, LinkAction, Ui, WindowRequests};
pub use value::ScalarValue;
