//! Single-cast delegate bindings. Read-only.

use peek_core::{DelegateBinding, LinkAction, ValueSlot, ViewId};

use crate::context::{DrawContext, Env, FilterContext};
use crate::resolver::{ObjectLink, NULL_OBJECT_NAME};
use crate::settings::ForceExpand;
use crate::view::{begin_row, draw_stale, Label, View};

/// A bound function: `Function on Class'Object'`.
pub struct DelegateView {
    label: Label,
    slot: ValueSlot,
    binding: DelegateBinding,
    target: ObjectLink,
}

impl DelegateView {
    /// Bind a delegate at `slot`.
    pub fn new(name: impl Into<String>, id: ViewId, slot: ValueSlot) -> Self {
        Self {
            label: Label::new(name, id),
            slot,
            binding: DelegateBinding::default(),
            target: ObjectLink::new(),
        }
    }

    /// Binding as of the last refresh.
    pub fn binding(&self) -> &DelegateBinding {
        &self.binding
    }

    fn refresh(&mut self, env: &Env<'_>) -> bool {
        let Some(binding) = self
            .slot
            .live_address(env.reflection)
            .and_then(|address| env.reflection.read_delegate(address).ok())
        else {
            return false;
        };
        self.target.update(env.reflection, binding.object);
        self.binding = binding;
        true
    }

    fn is_bound(&self) -> bool {
        !self.binding.object.is_null() && !self.binding.function_name.is_empty()
    }
}

impl View for DelegateView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, _expand: ForceExpand, _show_all: bool) {
        if !self.refresh(&cx.env) {
            draw_stale(cx.ui, &self.label);
            return;
        }
        begin_row(cx.ui, &self.label);
        if !self.is_bound() {
            cx.ui.text_disabled(NULL_OBJECT_NAME);
            return;
        }
        let function_id = self.label.sub_id("function");
        match cx.ui.link(&function_id, &self.binding.function_name) {
            LinkAction::None => {}
            LinkAction::Navigate => {
                let function = cx
                    .env
                    .reflection
                    .find_function(self.binding.object, &self.binding.function_name);
                if !function.is_null() {
                    cx.windows.open_inspector(function, cx.window_id);
                }
            }
            LinkAction::Copy => cx.ui.set_clipboard(&self.binding.function_name),
        }
        cx.ui.text("on");
        self.target.draw(cx, &self.label.sub_id("object"));
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        if self.label.passes(cx.filter) {
            return true;
        }
        if !self.refresh(&cx.env) {
            return false;
        }
        if !self.is_bound() {
            return cx.passes(NULL_OBJECT_NAME);
        }
        cx.passes(&self.binding.function_name) || self.target.passes_filter(cx.filter)
    }
}
