//! Live-bound views for the Peek object inspector.
//!
//! A reflected object is turned into a tree of [`View`]s, each bound to
//! one [`ValueSlot`](peek_core::ValueSlot) in the inspected process and
//! redrawn from fresh memory every display cycle.
//!
//! # Architecture
//!
//! ```text
//! ObjectInspector
//!   └─ builder::build_sections      one Section per inheritance level + native
//!        └─ dispatch::select_views  TypeTag -> concrete View (exhaustive match)
//!             ├─ leaf views         scalar, bool, string, name, enum, const
//!             ├─ reference views    object/class/interface, weak/soft/lazy
//!             │    └─ resolver::ObjectLink   display identity + text edit flow
//!             ├─ StructView         nested composite
//!             └─ ContainerView      array / multicast binding
//!                  └─ container::ChildList   pointer-identity sync engine
//! ```
//!
//! Nothing in this crate panics on foreign data. Stale slots render as
//! disabled placeholders, unknown types as disabled text, rejected edits
//! as a dismissible notice.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boolean;
pub mod builder;
pub mod composite;
pub mod config;
pub mod container;
pub mod context;
pub mod declaration;
pub mod delegate;
pub mod dispatch;
pub mod enumeration;
pub mod inspector;
pub mod placeholder;
pub mod reference;
pub mod requests;
pub mod resolver;
pub mod scalar;
pub mod settings;
pub mod text;
pub mod view;

pub use builder::{build_sections, ObjectSections, Section};
pub use config::{ConfigError, InspectorConfig};
pub use container::{ArrayHeader, ChildList, ContainerView};
pub use context::{DrawContext, Env, FilterContext};
pub use dispatch::{select_view, select_views};
pub use inspector::ObjectInspector;
pub use requests::{ChannelRequests, OpenRequest};
pub use resolver::{format_object_name, parse_object_query, ObjectLink, ObjectQuery};
pub use settings::{ForceExpand, Settings};
pub use view::{BoxedView, Label, View};
