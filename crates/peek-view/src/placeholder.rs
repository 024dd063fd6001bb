//! Fixed text rows: constants and unrecognized-type placeholders.

use peek_core::ViewId;

use crate::context::{DrawContext, FilterContext};
use crate::settings::ForceExpand;
use crate::view::{begin_row, Label, View};

/// A row of fixed text.
pub struct ConstView {
    label: Label,
    text: String,
    disabled: bool,
}

impl ConstView {
    /// A constant value.
    pub fn new(name: impl Into<String>, id: ViewId, text: impl Into<String>) -> Self {
        Self {
            label: Label::new(name, id),
            text: text.into(),
            disabled: false,
        }
    }

    /// A disabled placeholder for a property kind with no dedicated view.
    pub fn unrecognized_property(name: impl Into<String>, id: ViewId, type_name: &str) -> Self {
        Self {
            label: Label::new(name, id),
            text: format!("unrecognized property type {type_name}"),
            disabled: true,
        }
    }

    /// A disabled placeholder for a declaration kind with no dedicated view.
    pub fn unrecognized_field(name: impl Into<String>, id: ViewId, type_name: &str) -> Self {
        Self {
            label: Label::new(name, id),
            text: format!("unrecognized field type {type_name}"),
            disabled: true,
        }
    }

    /// The fixed text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl View for ConstView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, _expand: ForceExpand, _show_all: bool) {
        begin_row(cx.ui, &self.label);
        if self.disabled {
            cx.ui.text_disabled(&self.text);
        } else {
            cx.ui.text(&self.text);
        }
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        self.label.passes(cx.filter) || cx.passes(&self.text)
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}
