//! Views for declarations: nested types, functions, and enum definitions.
//!
//! Declarations have no storage in the owning object, so these views
//! bind no slot. They show a link to the definition and, for structs,
//! functions and enums, a listing of its members.

use peek_core::{EnumDef, LinkAction, ObjectRef, PropertyFlags, ViewId};

use crate::context::{DrawContext, Env, FilterContext};
use crate::enumeration::EnumEntry;
use crate::resolver::ObjectLink;
use crate::settings::ForceExpand;
use crate::view::{begin_row, Label, View};

// ── Object field ────────────────────────────────────────────────

/// A link to a nested definition object.
pub struct ObjectFieldView {
    label: Label,
    link: ObjectLink,
}

impl ObjectFieldView {
    /// Link to `object`.
    pub fn new(env: &Env<'_>, name: impl Into<String>, id: ViewId, object: ObjectRef) -> Self {
        let mut link = ObjectLink::new();
        link.update(env.reflection, object);
        Self {
            label: Label::new(name, id),
            link,
        }
    }
}

impl View for ObjectFieldView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, _expand: ForceExpand, _show_all: bool) {
        begin_row(cx.ui, &self.label);
        self.link.draw(cx, self.label.ui_id());
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        self.label.passes(cx.filter) || self.link.passes_filter(cx.filter)
    }
}

// ── Struct / function signature ─────────────────────────────────

#[derive(Clone, Debug)]
struct Member {
    name: String,
    type_name: String,
    link: ObjectRef,
}

/// A struct or function definition with its member list.
pub struct StructFieldView {
    label: Label,
    link: ObjectLink,
    is_function: bool,
    members: Vec<Member>,
}

impl StructFieldView {
    /// List the properties declared on `object`. Function parameters are
    /// annotated with `(return, out, optional)` flags.
    pub fn new(
        env: &Env<'_>,
        name: impl Into<String>,
        id: ViewId,
        object: ObjectRef,
        is_function: bool,
    ) -> Self {
        let mut link = ObjectLink::new();
        link.update(env.reflection, object);
        let members = env
            .reflection
            .all_fields(object)
            .into_iter()
            .filter(|field| field.is_property())
            .map(|field| {
                let mut name = field.name.clone();
                if is_function && field.flags.contains(PropertyFlags::PARAM) {
                    let annotation = field.flags.param_annotation();
                    if !annotation.is_empty() {
                        name.push(' ');
                        name.push_str(&annotation);
                    }
                }
                Member {
                    name,
                    type_name: field.type_name().to_string(),
                    link: field.object,
                }
            })
            .collect();
        Self {
            label: Label::new(name, id),
            link,
            is_function,
            members,
        }
    }

    /// Member names as displayed, annotations included.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }
}

impl View for StructFieldView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, expand: ForceExpand, _show_all: bool) {
        cx.ui.row();
        let kind = if self.is_function { "Function" } else { "Struct" };
        let title = format!("{kind} {}", self.label.name());
        if !cx.ui.tree_node(self.label.ui_id(), &title, expand.as_force()) {
            return;
        }
        cx.ui.next_column();
        self.link.draw(cx, &self.label.sub_id("def"));
        for (index, member) in self.members.iter().enumerate() {
            cx.ui.bullet_text(&format!("{}:", member.name));
            if member.link.is_null() {
                cx.ui.text(&member.type_name);
                continue;
            }
            let id = self.label.sub_id(&format!("member{index}"));
            match cx.ui.link(&id, &member.type_name) {
                LinkAction::None => {}
                LinkAction::Navigate => cx.windows.open_inspector(member.link, cx.window_id),
                LinkAction::Copy => cx.ui.set_clipboard(&member.type_name),
            }
        }
        cx.ui.tree_pop();
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        self.label.passes(cx.filter) || self.link.passes_filter(cx.filter)
    }
}

// ── Enum definition ─────────────────────────────────────────────

/// An enum definition with its entries.
pub struct EnumFieldView {
    label: Label,
    link: ObjectLink,
    entries: Vec<EnumEntry>,
}

impl EnumFieldView {
    /// List the entries of `def`, in declaration order.
    pub fn new(
        env: &Env<'_>,
        name: impl Into<String>,
        id: ViewId,
        def: &EnumDef,
    ) -> Self {
        let mut link = ObjectLink::new();
        link.update(env.reflection, def.object);
        let entries = def
            .entries
            .iter()
            .map(|(name, value)| EnumEntry {
                value: *value,
                decimal: format!("{name} ({value})"),
                hex: format!("{name} ({value:X})"),
            })
            .collect();
        Self {
            label: Label::new(name, id),
            link,
            entries,
        }
    }
}

impl View for EnumFieldView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, expand: ForceExpand, _show_all: bool) {
        cx.ui.row();
        let title = format!("Enum {}", self.label.name());
        if !cx.ui.tree_node(self.label.ui_id(), &title, expand.as_force()) {
            return;
        }
        cx.ui.next_column();
        self.link.draw(cx, &self.label.sub_id("def"));
        let hex = cx.settings.hex_display;
        for entry in &self.entries {
            cx.ui.bullet_text(entry.text(hex));
        }
        cx.ui.tree_pop();
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        self.label.passes(cx.filter) || self.link.passes_filter(cx.filter)
    }
}
