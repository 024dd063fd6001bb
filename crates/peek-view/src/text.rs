//! Runtime strings, localizable text, and interned names.
//!
//! The runtime owns the string storage, so reads and writes both go
//! through the reflection collaborator rather than raw memory.

use peek_core::{EditError, InputMode, StringKind, ValueSlot, ViewId};
use tracing::{debug, trace};

use crate::context::{DrawContext, Env, FilterContext};
use crate::settings::{ForceExpand, Settings};
use crate::view::{begin_row, draw_stale, FailureNotice, Label, View};

/// Text shown for the empty name.
pub const NONE_NAME: &str = "None";

// ── Strings ─────────────────────────────────────────────────────

/// A heap string or localizable text field.
///
/// The string is converted fresh on every draw and every filter pass, so
/// a row that was filtered out never shows text from an earlier cycle.
/// The edit buffer follows memory only when the stored string changes.
pub struct StringView {
    label: Label,
    slot: ValueSlot,
    kind: StringKind,
    cached: Option<String>,
    buffer: String,
    notice: FailureNotice,
}

impl StringView {
    /// Bind a string of `kind` at `slot`.
    pub fn new(name: impl Into<String>, id: ViewId, slot: ValueSlot, kind: StringKind) -> Self {
        Self {
            label: Label::new(name, id),
            slot,
            kind,
            cached: None,
            buffer: String::new(),
            notice: FailureNotice::default(),
        }
    }

    fn refresh(&mut self, env: &Env<'_>) {
        let current = self
            .slot
            .live_address(env.reflection)
            .and_then(|address| env.reflection.read_string(self.kind, address).ok());
        if current != self.cached {
            if let Some(text) = &current {
                self.buffer.clone_from(text);
            }
            self.cached = current;
        }
    }

    /// Last converted value.
    pub fn cached(&self) -> Option<&str> {
        self.cached.as_deref()
    }
}

impl View for StringView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, _expand: ForceExpand, _show_all: bool) {
        self.refresh(&cx.env);

        if self.cached.is_none() {
            draw_stale(cx.ui, &self.label);
            return;
        }
        begin_row(cx.ui, &self.label);
        let mode = InputMode::editable(cx.settings.editable);
        let mut buf = std::mem::take(&mut self.buffer);
        let committed = cx.ui.input_text(self.label.ui_id(), &mut buf, mode);
        self.buffer = buf;
        if committed {
            let env = cx.env;
            let text = self.buffer.clone();
            let _ = self.commit(&env, cx.settings, &text);
        }
        self.notice.draw(cx.ui, &self.label.sub_id("notice"));
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        self.refresh(&cx.env);
        self.label.passes(cx.filter) || self.cached.as_deref().is_some_and(|s| cx.passes(s))
    }

    fn commit(&mut self, env: &Env<'_>, settings: &Settings, text: &str) -> Result<(), EditError> {
        if !settings.editable {
            return Err(EditError::NotEditable);
        }
        let result = self
            .slot
            .live_address(env.reflection)
            .ok_or(EditError::Stale)
            .and_then(|address| Ok(env.reflection.write_string(self.kind, address, text)?));
        match &result {
            Ok(()) => {
                trace!(field = self.label.name(), len = text.len(), "string committed");
                self.cached = Some(text.to_string());
                self.buffer = text.to_string();
            }
            Err(err) => {
                debug!(field = self.label.name(), %err, "string edit rejected");
                if let Some(text) = &self.cached {
                    self.buffer.clone_from(text);
                }
                self.notice.raise(err.to_string());
            }
        }
        result
    }
}

// ── Names ───────────────────────────────────────────────────────

/// An interned name.
///
/// The text is only looked up again when the raw name id changes.
pub struct NameView {
    label: Label,
    slot: ValueSlot,
    cached_id: Option<u64>,
    cached: String,
    buffer: String,
    notice: FailureNotice,
}

impl NameView {
    /// Bind the name at `slot`.
    pub fn new(name: impl Into<String>, id: ViewId, slot: ValueSlot) -> Self {
        Self {
            label: Label::new(name, id),
            slot,
            cached_id: None,
            cached: String::new(),
            buffer: String::new(),
            notice: FailureNotice::default(),
        }
    }

    /// Refresh the cached text. Returns `false` if the slot is unreadable.
    fn refresh(&mut self, env: &Env<'_>) -> bool {
        let Some(address) = self.slot.live_address(env.reflection) else {
            return false;
        };
        let Ok(id) = env.reflection.name_id(address) else {
            return false;
        };
        if self.cached_id != Some(id) {
            self.cached_id = Some(id);
            self.cached = env
                .reflection
                .name_text(id)
                .unwrap_or_else(|| NONE_NAME.to_string());
            self.buffer.clone_from(&self.cached);
        }
        true
    }

    /// Last resolved text.
    pub fn cached(&self) -> &str {
        &self.cached
    }
}

impl View for NameView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, _expand: ForceExpand, _show_all: bool) {
        if !self.refresh(&cx.env) {
            draw_stale(cx.ui, &self.label);
            return;
        }
        begin_row(cx.ui, &self.label);
        let mode = InputMode::editable(cx.settings.editable);
        let mut buf = std::mem::take(&mut self.buffer);
        let committed = cx.ui.input_text(self.label.ui_id(), &mut buf, mode);
        self.buffer = buf;
        if committed {
            let env = cx.env;
            let text = self.buffer.clone();
            let _ = self.commit(&env, cx.settings, &text);
        }
        self.notice.draw(cx.ui, &self.label.sub_id("notice"));
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        self.refresh(&cx.env);
        self.label.passes(cx.filter) || cx.passes(&self.cached)
    }

    fn commit(&mut self, env: &Env<'_>, settings: &Settings, text: &str) -> Result<(), EditError> {
        if !settings.editable {
            return Err(EditError::NotEditable);
        }
        let result = self
            .slot
            .live_address(env.reflection)
            .ok_or(EditError::Stale)
            .and_then(|address| Ok(env.reflection.write_name(address, text.trim())?));
        match &result {
            Ok(()) => trace!(field = self.label.name(), name = text, "name committed"),
            Err(err) => {
                debug!(field = self.label.name(), %err, "name edit rejected");
                self.buffer.clone_from(&self.cached);
                self.notice.raise(err.to_string());
            }
        }
        result
    }
}
