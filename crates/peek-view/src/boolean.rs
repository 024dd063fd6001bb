//! Booleans packed as bits of a shared byte.

use peek_core::{Address, EditError, MemoryError, MemoryExt, ValueSlot, ViewId};
use tracing::trace;

use crate::context::{DrawContext, Env, FilterContext};
use crate::settings::{ForceExpand, Settings};
use crate::view::{begin_row, draw_stale, Label, View};

/// One bit (or bit group) of a byte shared with neighbouring fields.
pub struct BoolView {
    label: Label,
    slot: ValueSlot,
    mask: u8,
}

/// Set or clear the `mask` bits of the byte at `address`, leaving the
/// other bits as they are in memory right now.
pub fn write_masked(env: &Env<'_>, address: Address, mask: u8, set: bool) -> Result<(), MemoryError> {
    let current = env.memory.read_u8(address)?;
    let next = if set { current | mask } else { current & !mask };
    env.memory.write_u8(address, next)
}

impl BoolView {
    /// Bind the `mask` bits of the byte at `slot`.
    pub fn new(name: impl Into<String>, id: ViewId, slot: ValueSlot, mask: u8) -> Self {
        Self {
            label: Label::new(name, id),
            slot,
            mask,
        }
    }

    /// Current value, if the slot is live and readable.
    pub fn read(&self, env: &Env<'_>) -> Option<bool> {
        let address = self.slot.live_address(env.reflection)?;
        let byte = env.memory.read_u8(address).ok()?;
        Some(byte & self.mask != 0)
    }

    fn write(&self, env: &Env<'_>, set: bool) -> Result<(), EditError> {
        let address = self.slot.live_address(env.reflection).ok_or(EditError::Stale)?;
        write_masked(env, address, self.mask, set)?;
        trace!(field = self.label.name(), set, mask = self.mask, "bool committed");
        Ok(())
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Some(true),
        "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

impl View for BoolView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, _expand: ForceExpand, _show_all: bool) {
        let Some(mut set) = self.read(&cx.env) else {
            draw_stale(cx.ui, &self.label);
            return;
        };
        begin_row(cx.ui, &self.label);
        let editable = cx.settings.editable;
        if cx.ui.checkbox(self.label.ui_id(), "", &mut set, editable) && editable {
            // Failure means the owner vanished mid-cycle; next draw shows it.
            let _ = self.write(&cx.env, set);
        }
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        self.label.passes(cx.filter)
            || self
                .read(&cx.env)
                .is_some_and(|set| cx.passes(if set { "true" } else { "false" }))
    }

    fn commit(&mut self, env: &Env<'_>, settings: &Settings, text: &str) -> Result<(), EditError> {
        if !settings.editable {
            return Err(EditError::NotEditable);
        }
        let set = parse_bool(text).ok_or_else(|| EditError::Parse {
            text: text.to_string(),
            kind: "BoolProperty",
        })?;
        self.write(env, set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
