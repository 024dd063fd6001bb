//! Per-call context handed down the view tree.

use peek_core::{IdAllocator, MemoryLayout, ProcessMemory, Reflection, TextFilter, Ui, WindowRequests};

use crate::settings::Settings;

/// The inspected process: memory, reflection, layout.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    /// Raw byte access.
    pub memory: &'a dyn ProcessMemory,
    /// Type oracle and runtime services.
    pub reflection: &'a dyn Reflection,
    /// Pointer width and derived layouts.
    pub layout: MemoryLayout,
}

impl<'a> Env<'a> {
    /// Bundle the collaborators.
    pub fn new(
        memory: &'a dyn ProcessMemory,
        reflection: &'a dyn Reflection,
        layout: MemoryLayout,
    ) -> Self {
        Self {
            memory,
            reflection,
            layout,
        }
    }
}

/// Everything a view needs while drawing.
pub struct DrawContext<'a> {
    /// The inspected process.
    pub env: Env<'a>,
    /// Host widget surface.
    pub ui: &'a mut dyn Ui,
    /// Window manager.
    pub windows: &'a mut dyn WindowRequests,
    /// Settings of the owning inspector.
    pub settings: &'a Settings,
    /// Id source for views materialized during the draw.
    pub ids: &'a mut IdAllocator,
    /// Id of the owning inspector window.
    pub window_id: &'a str,
}

impl DrawContext<'_> {
    /// Borrow a filter context for the current query.
    pub fn filtering(&mut self) -> FilterContext<'_> {
        FilterContext {
            env: self.env,
            filter: &self.settings.filter,
            ids: &mut *self.ids,
        }
    }
}

/// Everything a view needs to answer a filter query.
///
/// Filtering may materialize container children, so it carries the id
/// source too.
pub struct FilterContext<'a> {
    /// The inspected process.
    pub env: Env<'a>,
    /// The query.
    pub filter: &'a TextFilter,
    /// Id source for views materialized during filtering.
    pub ids: &'a mut IdAllocator,
}

impl FilterContext<'_> {
    /// Whether `text` passes the query.
    pub fn passes(&self, text: &str) -> bool {
        self.filter.passes(text)
    }
}
