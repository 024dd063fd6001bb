//! Window requests recorded for assertions.

use peek_core::{ObjectRef, WindowRequests};

/// Records every `open_inspector` call.
#[derive(Debug, Default)]
pub struct RecordedRequests {
    pub opened: Vec<(ObjectRef, String)>,
}

impl RecordedRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects requested so far, in order.
    pub fn objects(&self) -> Vec<ObjectRef> {
        self.opened.iter().map(|(object, _)| *object).collect()
    }
}

impl WindowRequests for RecordedRequests {
    fn open_inspector(&mut self, object: ObjectRef, requested_by: &str) {
        self.opened.push((object, requested_by.to_string()));
    }
}
