//! Peek: a live, read/write inspector for objects of a foreign
//! reflection system.
//!
//! This crate re-exports the public API of the Peek workspace:
//!
//! - [`peek_core`]: addresses, descriptors, type tags, value slots and
//!   the collaborator traits ([`ProcessMemory`], [`Reflection`], [`Ui`],
//!   [`WindowRequests`]).
//! - [`peek_view`]: views, dispatch, container sync, the reference
//!   resolver and [`ObjectInspector`].
//!
//! # Quick start
//!
//! ```no_run
//! use peek::{Env, IdAllocator, InspectorConfig, ObjectInspector, ObjectRef};
//! # fn host(memory: &dyn peek::ProcessMemory, reflection: &dyn peek::Reflection,
//! #         ui: &mut dyn peek::Ui, windows: &mut dyn peek::WindowRequests) {
//! let config = InspectorConfig::default();
//! let env = Env::new(memory, reflection, config.layout().unwrap());
//! let mut ids = IdAllocator::new();
//! let mut inspector = ObjectInspector::new(&env, ObjectRef(0x1000), &mut ids, &config).unwrap();
//!
//! // Once per display cycle:
//! inspector.draw(&env, ui, windows, &mut ids);
//! # }
//! ```

#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub use peek_core;
pub use peek_view;

pub use peek_core::{
    Address, DeclarationKind, EditError, EnumDef, FieldDescriptor, FieldKind, IdAllocator,
    InProcessMemory, Indirection, MemoryError, MemoryLayout, ObjectRef, PointerWidth,
    ProcessMemory, Reflection, ScalarKind, TextFilter, TypeTag, Ui, ValueSlot, WindowRequests,
};
pub use peek_view::{
    build_sections, select_view, select_views, ChannelRequests, ConfigError, ContainerView, Env,
    ForceExpand, InspectorConfig, ObjectInspector, OpenRequest, Section, Settings, View,
};
