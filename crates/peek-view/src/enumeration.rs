//! Enumerations, shown either as a single choice or as a flag set.

use std::sync::Arc;

use peek_core::{EditError, EnumDef, ScalarKind, ScalarValue, ValueSlot, ViewId};
use tracing::trace;

use crate::context::{DrawContext, Env, FilterContext};
use crate::settings::{ForceExpand, Settings};
use crate::view::{begin_row, draw_stale, Label, View};

/// Preview for a value with no matching entry.
pub const UNKNOWN_PREVIEW: &str = "Unknown";
/// Preview in flags mode.
pub const FLAGS_PREVIEW: &str = "(flags)";

/// Whether an enum with these values should default to flags display.
///
/// Values are sorted and de-duplicated first. A contiguous run starting
/// at 0 or 1 is a plain enum; any gap means flags.
pub fn default_flags(values: &[i64]) -> bool {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut last = 0i64;
    for value in sorted {
        if value == 0 && last == 0 {
            continue;
        }
        if Some(value) != last.checked_add(1) {
            return true;
        }
        last = value;
    }
    false
}

/// One display entry, pre-formatted both ways.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumEntry {
    /// Entry value.
    pub value: i64,
    /// `Name (value)`.
    pub decimal: String,
    /// `Name (VALUE)` in hex.
    pub hex: String,
}

impl EnumEntry {
    /// Entries of `def`, sorted by value.
    pub fn from_def(def: &EnumDef) -> Vec<EnumEntry> {
        def.entries_by_value()
            .into_iter()
            .map(|(name, value)| EnumEntry {
                value,
                decimal: format!("{name} ({value})"),
                hex: format!("{name} ({value:X})"),
            })
            .collect()
    }

    /// Label for the current display mode.
    pub fn text(&self, hex: bool) -> &str {
        if hex {
            &self.hex
        } else {
            &self.decimal
        }
    }
}

/// An enum-typed field.
pub struct EnumView {
    label: Label,
    slot: ValueSlot,
    underlying: ScalarKind,
    def: Arc<EnumDef>,
    entries: Vec<EnumEntry>,
    flags: bool,
}

impl EnumView {
    /// Bind an enum stored as `underlying` at `slot`.
    pub fn new(
        name: impl Into<String>,
        id: ViewId,
        slot: ValueSlot,
        underlying: ScalarKind,
        def: Arc<EnumDef>,
    ) -> Self {
        let entries = EnumEntry::from_def(&def);
        let flags = default_flags(&def.sorted_values());
        Self {
            label: Label::new(name, id),
            slot,
            underlying,
            def,
            entries,
            flags,
        }
    }

    /// Whether the view currently shows flags.
    pub fn is_flags(&self) -> bool {
        self.flags
    }

    /// Override the display mode.
    pub fn set_flags(&mut self, flags: bool) {
        self.flags = flags;
    }

    /// The enum definition.
    pub fn def(&self) -> &EnumDef {
        &self.def
    }

    /// Current raw value.
    pub fn read(&self, env: &Env<'_>) -> Option<i64> {
        let address = self.slot.live_address(env.reflection)?;
        ScalarValue::read(env.memory, address, self.underlying)
            .ok()
            .map(|v| v.to_i64())
    }

    /// Combo preview for `value`.
    pub fn preview(&self, value: i64, hex: bool) -> &str {
        if self.flags {
            return FLAGS_PREVIEW;
        }
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map_or(UNKNOWN_PREVIEW, |e| e.text(hex))
    }

    fn write(&self, env: &Env<'_>, value: i64) -> Result<(), EditError> {
        let address = self.slot.live_address(env.reflection).ok_or(EditError::Stale)?;
        ScalarValue::from_i64(self.underlying, value).write(env.memory, address)?;
        trace!(field = self.label.name(), value, "enum committed");
        Ok(())
    }

    fn parse(&self, text: &str, hex: bool) -> Result<i64, EditError> {
        let text = text.trim();
        if let Some(value) = self.def.entries.get(text) {
            return Ok(*value);
        }
        ScalarValue::parse(self.underlying, text, hex).map(|v| v.to_i64())
    }
}

impl View for EnumView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, _expand: ForceExpand, _show_all: bool) {
        let Some(value) = self.read(&cx.env) else {
            draw_stale(cx.ui, &self.label);
            return;
        };
        let editable = cx.settings.editable;
        let hex = cx.settings.hex_display;
        begin_row(cx.ui, &self.label);

        let preview = self.preview(value, hex).to_string();
        let mut pending: Option<i64> = None;
        if cx.ui.begin_combo(self.label.ui_id(), &preview) {
            let mut flags = self.flags;
            cx.ui
                .checkbox(&self.label.sub_id("as_flags"), "Display As Flags", &mut flags, true);
            self.flags = flags;

            for (index, entry) in self.entries.iter().enumerate() {
                let text = entry.text(hex);
                if self.flags {
                    let mut checked = value & entry.value == entry.value;
                    let id = self.label.sub_id(&format!("flag{index}"));
                    if cx.ui.checkbox(&id, text, &mut checked, editable) && editable {
                        pending = Some(if checked {
                            value | entry.value
                        } else {
                            value & !entry.value
                        });
                    }
                } else if cx.ui.selectable(text, value == entry.value, editable) && editable {
                    pending = Some(entry.value);
                }
            }
            cx.ui.end_combo();
        }

        let mut raw = ScalarValue::from_i64(self.underlying, value);
        if cx
            .ui
            .input_scalar(&self.label.sub_id("raw"), &mut raw, hex, !editable)
            && editable
        {
            pending = Some(raw.to_i64());
        }

        if let Some(next) = pending {
            let env = cx.env;
            let _ = self.write(&env, next);
        }
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        if self.label.passes(cx.filter) {
            return true;
        }
        match self.read(&cx.env) {
            // Filtering ignores the hex setting: decimal text is canonical.
            Some(value) => cx.passes(self.preview(value, false)),
            None => false,
        }
    }

    fn commit(&mut self, env: &Env<'_>, settings: &Settings, text: &str) -> Result<(), EditError> {
        if !settings.editable {
            return Err(EditError::NotEditable);
        }
        let value = self.parse(text, settings.hex_display)?;
        self.write(env, value)
    }
}
