//! Inline struct values.

use peek_core::{IdAllocator, ObjectRef, ValueSlot, ViewId};

use crate::context::{DrawContext, Env, FilterContext};
use crate::dispatch::select_views;
use crate::settings::ForceExpand;
use crate::view::{draw_children, BoxedView, ExpandState, Label, View};

/// A struct embedded in its owner, shown as a tree node of its fields.
///
/// Children are built once from the struct's full field list, bases
/// first, and bound relative to the struct's own slot.
pub struct StructView {
    label: Label,
    def: ObjectRef,
    children: Vec<BoxedView>,
    expand: ExpandState,
}

impl StructView {
    /// Build the view for a `def` value stored at `slot`.
    pub fn new(
        env: &Env<'_>,
        ids: &mut IdAllocator,
        name: impl Into<String>,
        id: ViewId,
        slot: ValueSlot,
        def: ObjectRef,
    ) -> Self {
        let mut children = Vec::new();
        for field in env.reflection.all_fields(def) {
            select_views(env, ids, &field, slot, &mut children);
        }
        Self {
            label: Label::new(name, id),
            def,
            children,
            expand: ExpandState::default(),
        }
    }

    /// The struct type definition.
    pub fn def(&self) -> ObjectRef {
        self.def
    }
}

impl View for StructView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, expand: ForceExpand, show_all: bool) {
        let show_all = show_all || self.label.passes(&cx.settings.filter);
        let force = self.expand.begin(expand);
        cx.ui.row();
        if !cx.ui.tree_node(self.label.ui_id(), self.label.name(), force) {
            return;
        }
        let child_expand = self.expand.for_children(expand);
        draw_children(cx, &mut self.children, child_expand, show_all);
        self.expand.end();
        cx.ui.tree_pop();
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        if self.label.passes(cx.filter) {
            return true;
        }
        self.children.iter_mut().any(|child| child.passes_filter(cx))
    }

    fn children(&self) -> &[BoxedView] {
        &self.children
    }
}
