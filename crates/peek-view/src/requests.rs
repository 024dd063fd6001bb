//! Channel-backed window requests.
//!
//! Views only ever ask for a window to be opened. [`ChannelRequests`]
//! forwards those asks to whoever owns the window manager, which may
//! live on another thread.

use crossbeam_channel::{Receiver, Sender};
use peek_core::{ObjectRef, WindowRequests};
use tracing::debug;

/// A request to open an inspector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenRequest {
    /// Object to inspect.
    pub object: ObjectRef,
    /// Window id of the inspector the request came from, as a docking hint.
    pub requested_by: String,
}

/// [`WindowRequests`] sink that sends every request down a channel.
#[derive(Clone, Debug)]
pub struct ChannelRequests {
    tx: Sender<OpenRequest>,
}

impl ChannelRequests {
    /// A sink plus the receiving end for the window manager.
    pub fn new() -> (Self, Receiver<OpenRequest>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl WindowRequests for ChannelRequests {
    fn open_inspector(&mut self, object: ObjectRef, requested_by: &str) {
        let request = OpenRequest {
            object,
            requested_by: requested_by.to_string(),
        };
        if self.tx.send(request).is_err() {
            debug!(%object, requested_by, "window manager gone, open request dropped");
        }
    }
}
