//! A scripted host UI.
//!
//! [`ScriptedUi`] records every draw call as a [`UiEvent`] and answers
//! interactive widgets from a script of pending user actions. Each
//! scripted action is consumed by the first widget with a matching id,
//! so an action fires on exactly one cycle.

use std::collections::{HashMap, HashSet};

use peek_core::{InputMode, LinkAction, ScalarValue, Ui};

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    Row,
    NextColumn,
    Text(String),
    TextDisabled(String),
    Bullet(String),
    Link { id: String, text: String },
    TreeNode { id: String, label: String, force: Option<bool>, open: bool },
    TreePop,
    InputText { id: String, text: String, mode: InputMode },
    InputScalar { id: String, value: String, read_only: bool },
    Checkbox { id: String, label: String, value: bool, enabled: bool },
    Combo { id: String, preview: String },
    EndCombo,
    Selectable { label: String, selected: bool },
    Button { id: String, label: String },
    Notice { id: String, title: String, message: String },
    Clipboard(String),
}

#[derive(Default)]
pub struct ScriptedUi {
    events: Vec<UiEvent>,
    default_open: bool,
    open: HashMap<String, bool>,
    text_inputs: HashMap<String, String>,
    scalar_inputs: HashMap<String, ScalarValue>,
    toggles: HashSet<String>,
    clicks: HashSet<String>,
    selections: HashSet<String>,
    links: HashMap<String, LinkAction>,
    combos: HashSet<String>,
    dismissals: HashSet<String>,
    clipboard: Option<String>,
}

impl ScriptedUi {
    /// A UI whose tree nodes start closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// A UI whose tree nodes start open.
    pub fn expanded() -> Self {
        Self {
            default_open: true,
            ..Self::default()
        }
    }

    // ── Script ──────────────────────────────────────────────────

    /// The user opens or closes tree node `id`.
    pub fn set_open(&mut self, id: &str, open: bool) {
        self.open.insert(id.to_string(), open);
    }

    /// The user types `text` into input `id` and presses enter.
    pub fn type_text(&mut self, id: &str, text: &str) {
        self.text_inputs.insert(id.to_string(), text.to_string());
    }

    /// The user enters `value` into numeric input `id`.
    pub fn enter_scalar(&mut self, id: &str, value: ScalarValue) {
        self.scalar_inputs.insert(id.to_string(), value);
    }

    /// The user toggles checkbox `id`.
    pub fn toggle(&mut self, id: &str) {
        self.toggles.insert(id.to_string());
    }

    /// The user clicks button `id`.
    pub fn click(&mut self, id: &str) {
        self.clicks.insert(id.to_string());
    }

    /// The user picks the selectable labelled `label`.
    pub fn select(&mut self, label: &str) {
        self.selections.insert(label.to_string());
    }

    /// The user activates link `id`.
    pub fn follow(&mut self, id: &str, action: LinkAction) {
        self.links.insert(id.to_string(), action);
    }

    /// The user opens combo `id`.
    pub fn open_combo(&mut self, id: &str) {
        self.combos.insert(id.to_string());
    }

    /// The user dismisses notice `id`.
    pub fn dismiss(&mut self, id: &str) {
        self.dismissals.insert(id.to_string());
    }

    // ── Inspection ──────────────────────────────────────────────

    /// Everything drawn since the last [`take_events`](Self::take_events).
    pub fn events(&self) -> &[UiEvent] {
        &self.events
    }

    /// Drain the recorded events; call between cycles.
    pub fn take_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    /// Every plain or disabled text drawn.
    pub fn texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::Text(t) | UiEvent::TextDisabled(t) | UiEvent::Bullet(t) => Some(t.as_str()),
                UiEvent::Link { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every disabled text drawn.
    pub fn disabled_texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::TextDisabled(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether `text` was drawn in any text or link widget.
    pub fn drew_text(&self, text: &str) -> bool {
        self.texts().contains(&text)
    }

    /// Tree nodes drawn: `(label, force, open)`.
    pub fn tree_nodes(&self) -> Vec<(&str, Option<bool>, bool)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::TreeNode {
                    label, force, open, ..
                } => Some((label.as_str(), *force, *open)),
                _ => None,
            })
            .collect()
    }

    /// Current value of text input `id`, as last drawn.
    pub fn input_text_of(&self, id: &str) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            UiEvent::InputText { id: got, text, .. } if got == id => Some(text.as_str()),
            _ => None,
        })
    }

    /// Notices drawn: `(title, message)`.
    pub fn notices(&self) -> Vec<(&str, &str)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::Notice { title, message, .. } => Some((title.as_str(), message.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Last text copied to the clipboard.
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }
}

impl Ui for ScriptedUi {
    fn row(&mut self) {
        self.events.push(UiEvent::Row);
    }

    fn next_column(&mut self) {
        self.events.push(UiEvent::NextColumn);
    }

    fn text(&mut self, text: &str) {
        self.events.push(UiEvent::Text(text.to_string()));
    }

    fn text_disabled(&mut self, text: &str) {
        self.events.push(UiEvent::TextDisabled(text.to_string()));
    }

    fn bullet_text(&mut self, text: &str) {
        self.events.push(UiEvent::Bullet(text.to_string()));
    }

    fn link(&mut self, id: &str, text: &str) -> LinkAction {
        self.events.push(UiEvent::Link {
            id: id.to_string(),
            text: text.to_string(),
        });
        self.links.remove(id).unwrap_or_default()
    }

    fn tree_node(&mut self, id: &str, label: &str, force: Option<bool>) -> bool {
        let open = match force {
            Some(open) => open,
            None => self.open.get(id).copied().unwrap_or(self.default_open),
        };
        self.open.insert(id.to_string(), open);
        self.events.push(UiEvent::TreeNode {
            id: id.to_string(),
            label: label.to_string(),
            force,
            open,
        });
        open
    }

    fn tree_pop(&mut self) {
        self.events.push(UiEvent::TreePop);
    }

    fn input_text(&mut self, id: &str, buf: &mut String, mode: InputMode) -> bool {
        let committed = match (self.text_inputs.remove(id), mode) {
            (Some(text), InputMode::CommitOnEnter) => {
                *buf = text;
                true
            }
            _ => false,
        };
        self.events.push(UiEvent::InputText {
            id: id.to_string(),
            text: buf.clone(),
            mode,
        });
        committed
    }

    fn input_scalar(&mut self, id: &str, value: &mut ScalarValue, hex: bool, read_only: bool) -> bool {
        let changed = match self.scalar_inputs.remove(id) {
            Some(next) if !read_only => {
                *value = next;
                true
            }
            _ => false,
        };
        self.events.push(UiEvent::InputScalar {
            id: id.to_string(),
            value: value.format(hex),
            read_only,
        });
        changed
    }

    fn checkbox(&mut self, id: &str, label: &str, value: &mut bool, enabled: bool) -> bool {
        let toggled = self.toggles.remove(id) && enabled;
        if toggled {
            *value = !*value;
        }
        self.events.push(UiEvent::Checkbox {
            id: id.to_string(),
            label: label.to_string(),
            value: *value,
            enabled,
        });
        toggled
    }

    fn begin_combo(&mut self, id: &str, preview: &str) -> bool {
        self.events.push(UiEvent::Combo {
            id: id.to_string(),
            preview: preview.to_string(),
        });
        self.combos.remove(id)
    }

    fn end_combo(&mut self) {
        self.events.push(UiEvent::EndCombo);
    }

    fn selectable(&mut self, label: &str, selected: bool, enabled: bool) -> bool {
        self.events.push(UiEvent::Selectable {
            label: label.to_string(),
            selected,
        });
        self.selections.remove(label) && enabled
    }

    fn button(&mut self, id: &str, label: &str, enabled: bool) -> bool {
        self.events.push(UiEvent::Button {
            id: id.to_string(),
            label: label.to_string(),
        });
        self.clicks.remove(id) && enabled
    }

    fn notice(&mut self, id: &str, title: &str, message: &str) -> bool {
        self.events.push(UiEvent::Notice {
            id: id.to_string(),
            title: title.to_string(),
            message: message.to_string(),
        });
        !self.dismissals.remove(id)
    }

    fn set_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
        self.events.push(UiEvent::Clipboard(text.to_string()));
    }
}
