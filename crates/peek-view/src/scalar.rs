//! Fixed-width numeric fields, one view for every width.

use peek_core::{EditError, ScalarKind, ScalarValue, ValueSlot, ViewId};
use tracing::trace;

use crate::context::{DrawContext, Env, FilterContext};
use crate::settings::{ForceExpand, Settings};
use crate::view::{begin_row, draw_stale, Label, View};

/// A numeric field of any [`ScalarKind`].
pub struct ScalarView {
    label: Label,
    slot: ValueSlot,
    kind: ScalarKind,
}

impl ScalarView {
    /// Bind `slot` as a `kind` value.
    pub fn new(name: impl Into<String>, id: ViewId, slot: ValueSlot, kind: ScalarKind) -> Self {
        Self {
            label: Label::new(name, id),
            slot,
            kind,
        }
    }

    /// Current value, if the slot is live and readable.
    pub fn read(&self, env: &Env<'_>) -> Option<ScalarValue> {
        let address = self.slot.live_address(env.reflection)?;
        ScalarValue::read(env.memory, address, self.kind).ok()
    }
}

impl View for ScalarView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, _expand: ForceExpand, _show_all: bool) {
        let Some(mut value) = self.read(&cx.env) else {
            draw_stale(cx.ui, &self.label);
            return;
        };
        begin_row(cx.ui, &self.label);
        let editable = cx.settings.editable;
        let changed = cx
            .ui
            .input_scalar(self.label.ui_id(), &mut value, cx.settings.hex_display, !editable);
        let Some(address) = self.slot.live_address(cx.env.reflection) else {
            return;
        };
        if changed
            && editable
            && value.kind() == self.kind
            && value.write(cx.env.memory, address).is_ok()
        {
            trace!(field = self.label.name(), %value, "scalar committed");
        }
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        self.label.passes(cx.filter)
            || self
                .read(&cx.env)
                .is_some_and(|value| cx.passes(&value.format(false)))
    }

    fn commit(&mut self, env: &Env<'_>, settings: &Settings, text: &str) -> Result<(), EditError> {
        if !settings.editable {
            return Err(EditError::NotEditable);
        }
        let address = self.slot.live_address(env.reflection).ok_or(EditError::Stale)?;
        let value = ScalarValue::parse(self.kind, text, settings.hex_display)?;
        value.write(env.memory, address)?;
        trace!(field = self.label.name(), %value, "scalar committed");
        Ok(())
    }
}
