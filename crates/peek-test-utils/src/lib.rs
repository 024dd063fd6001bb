//! Test utilities and fake collaborators for Peek development.
//!
//! Provides [`FakeProcess`], a byte-addressed fake foreign process that
//! implements both [`ProcessMemory`](peek_core::ProcessMemory) and
//! [`Reflection`](peek_core::Reflection), a [`ScriptedUi`] that records
//! draw calls and replays user input, and [`RecordedRequests`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod process;
pub mod requests;
pub mod ui;

pub use process::FakeProcess;
pub use requests::RecordedRequests;
pub use ui::{ScriptedUi, UiEvent};
