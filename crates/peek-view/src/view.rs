//! The contract every view node implements.

use peek_core::{EditError, TextFilter, Ui, ViewId};

use crate::context::{DrawContext, Env, FilterContext};
use crate::settings::{ForceExpand, Settings};

/// Text shown in place of a value whose owner is gone.
pub const STALE_TEXT: &str = "<no longer valid>";

/// A view's display name plus its host-UI identity.
///
/// Only [`name`](Self::name) takes part in filtering. The id suffix
/// exists so two fields with the same name get distinct widgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    name: String,
    id: ViewId,
    ui_id: String,
}

impl Label {
    /// Label `name` with identity `id`.
    pub fn new(name: impl Into<String>, id: ViewId) -> Self {
        let name = name.into();
        let ui_id = format!("{name}##{id}");
        Self { name, id, ui_id }
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host-UI identity.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Widget id: name plus hidden identity suffix.
    pub fn ui_id(&self) -> &str {
        &self.ui_id
    }

    /// Widget id for a sub-widget of this view.
    pub fn sub_id(&self, part: &str) -> String {
        format!("{}_{part}", self.ui_id)
    }

    /// Whether the name passes `filter`.
    pub fn passes(&self, filter: &TextFilter) -> bool {
        filter.passes(&self.name)
    }
}

/// One node of the inspector tree.
pub trait View {
    /// Display label.
    fn label(&self) -> &Label;

    /// Render the current state and apply pending user edits.
    ///
    /// Called every cycle. Must degrade to a disabled rendering when the
    /// bound slot has gone stale.
    fn draw(&mut self, cx: &mut DrawContext<'_>, expand: ForceExpand, show_all: bool);

    /// Whether this node or any descendant matches the query.
    ///
    /// Leaf views compare their current formatted value, refreshing any
    /// lazily formatted text first.
    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        self.label().passes(cx.filter)
    }

    /// Commit `text` as this view's new value.
    ///
    /// Gated on `settings.editable`. On rejection nothing is written.
    fn commit(&mut self, _env: &Env<'_>, _settings: &Settings, _text: &str) -> Result<(), EditError> {
        Err(EditError::NotEditable)
    }

    /// Whether this node renders as a disabled placeholder.
    fn is_disabled(&self) -> bool {
        false
    }

    /// Current child views. Empty for leaves.
    fn children(&self) -> &[BoxedView] {
        &[]
    }
}

/// Owned, type-erased view.
pub type BoxedView = Box<dyn View>;

// ── Shared drawing helpers ──────────────────────────────────────

/// Start a row and draw `label` in the name column.
pub(crate) fn begin_row(ui: &mut dyn Ui, label: &Label) {
    ui.row();
    ui.text(label.name());
    ui.next_column();
}

/// A full row for a view whose slot is stale.
pub(crate) fn draw_stale(ui: &mut dyn Ui, label: &Label) {
    begin_row(ui, label);
    ui.text_disabled(STALE_TEXT);
}

/// Draw every child that passes the filter.
pub(crate) fn draw_children(
    cx: &mut DrawContext<'_>,
    children: &mut [BoxedView],
    expand: ForceExpand,
    show_all: bool,
) {
    for child in children.iter_mut() {
        if show_all || child.passes_filter(&mut cx.filtering()) {
            child.draw(cx, expand, show_all);
        }
    }
}

/// Remembers a forced close owed to children of a node that was closed.
///
/// A closed tree node never draws its children, so a close signal that
/// arrives while the node is shut has to be replayed the next time the
/// node is opened.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ExpandState {
    was_force_closed: bool,
}

impl ExpandState {
    /// Record the incoming signal. Returns the tree-node override.
    pub(crate) fn begin(&mut self, expand: ForceExpand) -> Option<bool> {
        if expand != ForceExpand::None {
            self.was_force_closed = expand == ForceExpand::Close;
        }
        expand.as_force()
    }

    /// Signal to pass to children of an open node.
    pub(crate) fn for_children(&self, expand: ForceExpand) -> ForceExpand {
        if self.was_force_closed {
            ForceExpand::Close
        } else {
            expand
        }
    }

    /// The node was open and its children received the signal.
    pub(crate) fn end(&mut self) {
        self.was_force_closed = false;
    }
}

/// Pending "failed to set" popup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FailureNotice {
    title: &'static str,
    message: Option<String>,
}

impl Default for FailureNotice {
    fn default() -> Self {
        Self::titled("Failed to set value")
    }
}

impl FailureNotice {
    /// A notice shown under `title`.
    pub(crate) fn titled(title: &'static str) -> Self {
        Self {
            title,
            message: None,
        }
    }

    /// Show `message` until dismissed.
    pub(crate) fn raise(&mut self, message: String) {
        self.message = Some(message);
    }

    pub(crate) fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Draw the popup if one is pending.
    pub(crate) fn draw(&mut self, ui: &mut dyn Ui, id: &str) {
        if let Some(message) = &self.message {
            if !ui.notice(id, self.title, message) {
                self.message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peek_core::IdAllocator;

    #[test]
    fn identity_suffix_is_not_filtered() {
        let mut ids = IdAllocator::new();
        ids.allocate();
        let label = Label::new("Health", ids.allocate());
        assert_eq!(label.ui_id(), "Health##1");
        assert!(label.passes(&TextFilter::new("health")));
        assert!(!label.passes(&TextFilter::new("##1")));
        assert!(!label.passes(&TextFilter::new("1")));
    }

    #[test]
    fn close_is_replayed_after_reopen() {
        let mut state = ExpandState::default();
        assert_eq!(state.begin(ForceExpand::Close), Some(false));
        // Node stayed closed; next cycle the user opens it.
        assert_eq!(state.begin(ForceExpand::None), None);
        assert_eq!(state.for_children(ForceExpand::None), ForceExpand::Close);
        state.end();
        assert_eq!(state.for_children(ForceExpand::None), ForceExpand::None);
    }

    #[test]
    fn open_clears_pending_close() {
        let mut state = ExpandState::default();
        state.begin(ForceExpand::Close);
        assert_eq!(state.begin(ForceExpand::Open), Some(true));
        assert_eq!(state.for_children(ForceExpand::Open), ForceExpand::Open);
    }
}
