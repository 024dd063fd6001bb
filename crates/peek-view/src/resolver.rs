//! Shared logic for every view that points at another object.
//!
//! An [`ObjectLink`] owns the cached display identity
//! (`Class'Outer.Name'`) of whatever a reference currently points at,
//! draws it as a navigable link, and runs the text edit flow: parse the
//! query, look the object up, and on failure roll the input back and
//! raise a notice. The per-variant acceptance check and the write
//! itself belong to the reference view.

use peek_core::{EditError, InputMode, LinkAction, ObjectRef, Reflection, TextFilter};

use crate::context::DrawContext;
use crate::view::FailureNotice;

/// Display identity of the null reference.
pub const NULL_OBJECT_NAME: &str = "None";

/// Class assumed when a query gives only a path.
pub const DEFAULT_QUERY_CLASS: &str = "Object";

/// Title of the lookup failure popup.
pub const FAILED_TO_SET_TITLE: &str = "Failed to set object";

/// `Class'path.to.object'`, or [`NULL_OBJECT_NAME`].
pub fn format_object_name<R: Reflection + ?Sized>(reflection: &R, object: ObjectRef) -> String {
    if object.is_null() {
        return NULL_OBJECT_NAME.to_string();
    }
    let class = reflection.class_of(object);
    format!(
        "{}'{}'",
        reflection.name_of(class),
        reflection.path_name(object)
    )
}

/// A parsed `Class'path'` lookup query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectQuery {
    /// Class name.
    pub class: String,
    /// Object path.
    pub path: String,
}

/// Split user text into class and path.
///
/// `Class'path'` is recognised only when the trimmed text ends with a
/// quote and the first quote is not that final one. Anything else is a
/// bare path of class [`DEFAULT_QUERY_CLASS`]. Returns `None` for blank
/// text, which means "set to null".
pub fn parse_object_query(text: &str) -> Option<ObjectQuery> {
    let query = text.trim();
    if query.is_empty() {
        return None;
    }
    if let Some(body) = query.strip_suffix('\'') {
        if let Some(split) = body.find('\'') {
            return Some(ObjectQuery {
                class: body[..split].to_string(),
                path: body[split + 1..].to_string(),
            });
        }
    }
    Some(ObjectQuery {
        class: DEFAULT_QUERY_CLASS.to_string(),
        path: query.to_string(),
    })
}

/// Look up the object a query names. Blank text resolves to null.
pub fn resolve_query<R: Reflection + ?Sized>(reflection: &R, text: &str) -> Result<ObjectRef, EditError> {
    let Some(query) = parse_object_query(text) else {
        return Ok(ObjectRef::NULL);
    };
    reflection
        .find_object(&query.class, &query.path)
        .ok_or(EditError::NotFound {
            class: query.class,
            name: query.path,
        })
}

/// Cached identity plus edit state for one reference.
#[derive(Debug)]
pub struct ObjectLink {
    current: Option<ObjectRef>,
    display: String,
    editable: String,
    notice: FailureNotice,
}

impl Default for ObjectLink {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectLink {
    /// A link that has not seen any object yet.
    pub fn new() -> Self {
        Self {
            current: None,
            display: NULL_OBJECT_NAME.to_string(),
            editable: String::new(),
            notice: FailureNotice::titled(FAILED_TO_SET_TITLE),
        }
    }

    /// Point the link at `object`. Reformats only when the identity
    /// changed; returns whether it did.
    pub fn update<R: Reflection + ?Sized>(&mut self, reflection: &R, object: ObjectRef) -> bool {
        if self.current == Some(object) {
            return false;
        }
        self.current = Some(object);
        self.display = format_object_name(reflection, object);
        // Null shows an empty input so the host renders the hint instead.
        self.editable = if object.is_null() {
            String::new()
        } else {
            self.display.clone()
        };
        true
    }

    /// Current display identity.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Current edit buffer.
    pub fn editable_text(&self) -> &str {
        &self.editable
    }

    /// The object last passed to [`update`](Self::update).
    pub fn object(&self) -> ObjectRef {
        self.current.unwrap_or(ObjectRef::NULL)
    }

    /// Pending failure message, if any.
    pub fn failure(&self) -> Option<&str> {
        self.notice.message()
    }

    /// Draw as a read-only link.
    pub fn draw(&mut self, cx: &mut DrawContext<'_>, id: &str) {
        let object = self.object();
        if object.is_null() {
            cx.ui.text_disabled(&self.display);
            return;
        }
        match cx.ui.link(id, &self.display) {
            LinkAction::None => {}
            LinkAction::Navigate => cx.windows.open_inspector(object, cx.window_id),
            LinkAction::Copy => cx.ui.set_clipboard(&self.display),
        }
    }

    /// Draw as an editable text input. Returns the text the user
    /// committed this cycle, if any.
    pub fn draw_editable(&mut self, cx: &mut DrawContext<'_>, id: &str) -> Option<String> {
        let mut buf = std::mem::take(&mut self.editable);
        let committed = cx.ui.input_text(id, &mut buf, InputMode::CommitOnEnter);
        self.editable = buf;
        committed.then(|| self.editable.clone())
    }

    /// Reject an edit: restore the last good identity and raise `err`.
    pub fn fail(&mut self, err: &EditError) {
        self.editable = if self.object().is_null() {
            String::new()
        } else {
            self.display.clone()
        };
        self.notice.raise(err.to_string());
    }

    /// Draw the failure popup if one is pending.
    pub fn draw_notice(&mut self, cx: &mut DrawContext<'_>, id: &str) {
        self.notice.draw(cx.ui, id);
    }

    /// Whether the display identity passes `filter`.
    ///
    /// Uses the display text rather than the edit buffer, so a half-typed
    /// edit cannot hide the row.
    pub fn passes_filter(&self, filter: &TextFilter) -> bool {
        filter.passes(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn class_and_path() {
        assert_eq!(
            parse_object_query("  Actor'Map.Door'  "),
            Some(ObjectQuery {
                class: "Actor".into(),
                path: "Map.Door".into()
            })
        );
    }

    #[test]
    fn bare_path_defaults_class() {
        assert_eq!(
            parse_object_query("Map.Door"),
            Some(ObjectQuery {
                class: "Object".into(),
                path: "Map.Door".into()
            })
        );
    }

    #[test]
    fn lone_trailing_quote_is_a_path() {
        assert_eq!(
            parse_object_query("Door'"),
            Some(ObjectQuery {
                class: "Object".into(),
                path: "Door'".into()
            })
        );
    }

    #[test]
    fn blank_means_null() {
        assert_eq!(parse_object_query("   "), None);
    }

    #[test]
    fn empty_class_is_kept() {
        let query = parse_object_query("'Map.Door'").unwrap();
        assert_eq!(query.class, "");
        assert_eq!(query.path, "Map.Door");
    }

    #[test]
    fn fail_rolls_back_to_display() {
        let mut link = ObjectLink::new();
        link.editable = "garbage".into();
        link.fail(&EditError::NotEditable);
        assert_eq!(link.editable_text(), "");
        assert_eq!(link.failure(), Some("value is not editable"));
    }

    proptest! {
        #[test]
        fn quoted_form_splits_at_first_quote(class in "[A-Za-z]{1,10}", path in "[A-Za-z.:]{0,20}") {
            let query = parse_object_query(&format!("{class}'{path}'")).unwrap();
            prop_assert_eq!(query.class, class);
            prop_assert_eq!(query.path, path);
        }
    }
}
