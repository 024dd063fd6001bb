//! Non-owning, generation-guarded bindings into foreign memory.
//!
//! A [`ValueSlot`] never owns what it points at. Its [`SlotGuard`]
//! remembers the generation of the object that owns the memory when the
//! slot was bound; a slot whose owner has been destroyed (or whose
//! address was reused for a new object) is stale, and views must render
//! it as a placeholder instead of reading through it.

use crate::id::{Address, Generation, ObjectRef};
use crate::reflection::Reflection;

/// Liveness check for the object that owns a slot's memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotGuard {
    owner: ObjectRef,
    generation: Generation,
}

impl SlotGuard {
    /// Capture the current generation of `owner`. `None` if already gone.
    pub fn capture<R: Reflection + ?Sized>(reflection: &R, owner: ObjectRef) -> Option<Self> {
        reflection
            .generation(owner)
            .map(|generation| Self { owner, generation })
    }

    /// A guard with an explicit generation.
    pub fn new(owner: ObjectRef, generation: Generation) -> Self {
        Self { owner, generation }
    }

    /// The owning object.
    pub fn owner(&self) -> ObjectRef {
        self.owner
    }

    /// The generation captured at bind time.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether the owner still exists with the same generation.
    pub fn is_live<R: Reflection + ?Sized>(&self, reflection: &R) -> bool {
        reflection.generation(self.owner) == Some(self.generation)
    }
}

/// An address into foreign memory plus the guard for its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueSlot {
    address: Address,
    guard: SlotGuard,
}

impl ValueSlot {
    /// Bind `address` under `guard`.
    pub fn new(address: Address, guard: SlotGuard) -> Self {
        Self { address, guard }
    }

    /// The bound address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The liveness guard.
    pub fn guard(&self) -> SlotGuard {
        self.guard
    }

    /// Slot for a field `offset` bytes in, same owner.
    #[must_use]
    pub fn field(&self, offset: usize) -> Self {
        Self::new(self.address.offset(offset), self.guard)
    }

    /// Slot for element `index` of a sequence starting here, same owner.
    #[must_use]
    pub fn element(&self, index: usize, stride: usize) -> Self {
        Self::new(self.address.element(index, stride), self.guard)
    }

    /// Whether reading through this slot is still meaningful.
    pub fn is_live<R: Reflection + ?Sized>(&self, reflection: &R) -> bool {
        self.guard.is_live(reflection)
    }

    /// The address, if the owner is still live.
    pub fn live_address<R: Reflection + ?Sized>(&self, reflection: &R) -> Option<Address> {
        self.is_live(reflection).then_some(self.address)
    }
}
