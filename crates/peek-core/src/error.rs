//! Error types for foreign memory access and edit commits.
//!
//! Nothing here is fatal. A [`MemoryError`] during drawing degrades the
//! affected view to a stale placeholder; an [`EditError`] during a commit
//! rolls the edit back and is shown to the user as a dismissible notice.

use thiserror::Error;

use crate::id::Address;

/// Failure to touch foreign process memory.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// The address was null.
    #[error("null pointer access")]
    NullPointer,

    /// The range could not be read.
    #[error("cannot read {len} bytes at {address}")]
    Unreadable {
        /// Start of the range.
        address: Address,
        /// Length of the range in bytes.
        len: usize,
    },

    /// The range could not be written.
    #[error("cannot write {len} bytes at {address}")]
    Unwritable {
        /// Start of the range.
        address: Address,
        /// Length of the range in bytes.
        len: usize,
    },

    /// The foreign allocator refused to grow a buffer.
    #[error("foreign allocation of {requested} bytes failed")]
    Allocation {
        /// Requested size in bytes.
        requested: usize,
    },

    /// The collaborator does not provide this service.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// A rejected edit.
///
/// The `Display` text is the human-readable reason shown in the failure
/// notice, so the lookup and acceptance variants keep the object's
/// identity on its own line.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditError {
    /// Editing is disabled, or this view kind has no commit path.
    #[error("value is not editable")]
    NotEditable,

    /// The slot's owning object is gone.
    #[error("object is no longer valid")]
    Stale,

    /// The lookup through the reflection collaborator found nothing.
    #[error("Could not find object\nClass: {class}\nName: {name}")]
    NotFound {
        /// Type part of the query.
        class: String,
        /// Path part of the query.
        name: String,
    },

    /// The candidate is not an instance of the declared target type.
    #[error("Object is not an instance of {class}:\n{object}")]
    NotAnInstance {
        /// Declared target type.
        class: String,
        /// Display identity of the candidate.
        object: String,
    },

    /// The candidate type definition does not derive from the meta type.
    #[error("Object is not a subclass of {class}:\n{object}")]
    NotASubclass {
        /// Declared meta type.
        class: String,
        /// Display identity of the candidate.
        object: String,
    },

    /// The candidate does not implement the declared interface.
    #[error("Object does not implement {interface}:\n{object}")]
    InterfaceNotImplemented {
        /// Declared interface.
        interface: String,
        /// Display identity of the candidate.
        object: String,
    },

    /// Text input did not parse as the slot's value kind.
    #[error("cannot parse '{text}' as {kind}")]
    Parse {
        /// The rejected input.
        text: String,
        /// What the input should have been.
        kind: &'static str,
    },

    /// The write itself failed.
    #[error("write failed: {0}")]
    Memory(#[from] MemoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn lookup_failure_names_class_and_path() {
        let err = EditError::NotFound {
            class: "Actor".into(),
            name: "/Game/Map.Door".into(),
        };
        assert_eq!(
            err.to_string(),
            "Could not find object\nClass: Actor\nName: /Game/Map.Door"
        );
    }

    #[test]
    fn memory_error_is_source_of_edit_error() {
        let err: EditError = MemoryError::NullPointer.into();
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "write failed: null pointer access");
    }

    #[test]
    fn unreadable_shows_hex_address() {
        let err = MemoryError::Unreadable {
            address: Address(0x40),
            len: 8,
        };
        assert_eq!(err.to_string(), "cannot read 8 bytes at 0x40");
    }
}
