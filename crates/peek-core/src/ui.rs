//! Host UI and window manager contracts.
//!
//! The inspector never renders anything itself. It issues calls against
//! [`Ui`], an immediate-mode widget surface laid out as a two-column
//! table (label | value), and asks [`WindowRequests`] to open new
//! inspector windows. Widget ids are opaque strings; they are never
//! used for filtering.

use crate::id::ObjectRef;
use crate::value::ScalarValue;

/// Result of interacting with a link widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkAction {
    /// Not clicked.
    #[default]
    None,
    /// Plain click: open the target.
    Navigate,
    /// Modified click: copy the link text.
    Copy,
}

/// Editability of a text input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Display only.
    ReadOnly,
    /// Editable; the input reports a commit when the user presses enter.
    CommitOnEnter,
}

impl InputMode {
    /// `CommitOnEnter` when `editable`, otherwise `ReadOnly`.
    pub fn editable(editable: bool) -> Self {
        if editable {
            Self::CommitOnEnter
        } else {
            Self::ReadOnly
        }
    }
}

/// Immediate-mode widget surface.
pub trait Ui {
    /// Start a new table row with the cursor in the label column.
    fn row(&mut self);

    /// Move to the value column of the current row.
    fn next_column(&mut self);

    /// Plain text.
    fn text(&mut self, text: &str);

    /// Greyed-out text.
    fn text_disabled(&mut self, text: &str);

    /// Bulleted text.
    fn bullet_text(&mut self, text: &str);

    /// Clickable link.
    fn link(&mut self, id: &str, text: &str) -> LinkAction;

    /// Tree node. `force` overrides the stored open state for this call.
    /// Returns whether the node is open; the caller must then call
    /// [`tree_pop`](Self::tree_pop) after drawing the children.
    fn tree_node(&mut self, id: &str, label: &str, force: Option<bool>) -> bool;

    /// Close the innermost open tree node.
    fn tree_pop(&mut self);

    /// Single-line text input over `buf`. The buffer may be resized by
    /// the host. Returns `true` when the user committed the text.
    fn input_text(&mut self, id: &str, buf: &mut String, mode: InputMode) -> bool;

    /// Numeric input. Returns `true` when `value` was changed.
    fn input_scalar(&mut self, id: &str, value: &mut ScalarValue, hex: bool, read_only: bool) -> bool;

    /// Checkbox. Returns `true` when toggled.
    fn checkbox(&mut self, id: &str, label: &str, value: &mut bool, enabled: bool) -> bool;

    /// Open a combo box. If `true`, draw entries and call
    /// [`end_combo`](Self::end_combo).
    fn begin_combo(&mut self, id: &str, preview: &str) -> bool;

    /// Close the combo box.
    fn end_combo(&mut self);

    /// Selectable row inside a combo. Returns `true` when clicked.
    fn selectable(&mut self, label: &str, selected: bool, enabled: bool) -> bool;

    /// Push button. Returns `true` when clicked.
    fn button(&mut self, id: &str, label: &str, enabled: bool) -> bool;

    /// Non-blocking notice popup. Returns `false` once dismissed.
    fn notice(&mut self, id: &str, title: &str, message: &str) -> bool;

    /// Put text on the system clipboard.
    fn set_clipboard(&mut self, text: &str);
}

/// Window/session manager.
pub trait WindowRequests {
    /// Ask for a new inspector rooted at `object`, docked near the
    /// window identified by `requested_by`.
    fn open_inspector(&mut self, object: ObjectRef, requested_by: &str);
}
