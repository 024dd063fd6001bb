//! Composite builder: object to sections of views.
//!
//! One property section and one declaration section per level of the
//! object's inheritance chain, most-derived first, each holding only the
//! fields that level declares itself. A trailing native section shows
//! the attributes every object carries regardless of its class.

use peek_core::{
    FieldDescriptor, IdAllocator, ObjectRef, ScalarKind, SlotGuard, TypeTag, ValueSlot,
};
use tracing::debug;

use crate::context::{DrawContext, Env, FilterContext};
use crate::dispatch::select_views;
use crate::settings::ForceExpand;
use crate::view::{draw_children, BoxedView, ExpandState, Label};

/// Header of the native section.
pub const NATIVE_SECTION: &str = "Native";

/// A named, ordered group of top-level views.
pub struct Section {
    label: Label,
    views: Vec<BoxedView>,
    expand: ExpandState,
}

impl Section {
    /// An empty section titled `header`.
    pub fn new(ids: &mut IdAllocator, header: impl Into<String>) -> Self {
        Self {
            label: Label::new(header, ids.allocate()),
            views: Vec::new(),
            expand: ExpandState::default(),
        }
    }

    /// Section title.
    pub fn header(&self) -> &str {
        self.label.name()
    }

    /// Views in declaration order.
    pub fn views(&self) -> &[BoxedView] {
        &self.views
    }

    /// Mutable access to the views.
    pub fn views_mut(&mut self) -> &mut [BoxedView] {
        &mut self.views
    }

    /// Whether the section holds no views.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Whether the header or any view passes the query.
    pub fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        if self.label.passes(cx.filter) {
            return true;
        }
        self.views.iter_mut().any(|view| view.passes_filter(cx))
    }

    /// Draw the section as a tree node. Empty and filtered-out sections
    /// draw nothing.
    pub fn draw(&mut self, cx: &mut DrawContext<'_>, expand: ForceExpand) {
        if self.views.is_empty() {
            return;
        }
        let show_all = self.label.passes(&cx.settings.filter);
        if !show_all && !self.passes_filter(&mut cx.filtering()) {
            return;
        }
        let force = self.expand.begin(expand);
        if !cx.ui.tree_node(self.label.ui_id(), self.label.name(), force) {
            return;
        }
        let child_expand = self.expand.for_children(expand);
        draw_children(cx, &mut self.views, child_expand, show_all);
        self.expand.end();
        cx.ui.tree_pop();
    }
}

/// Every section of one object.
pub struct ObjectSections {
    /// Value-bearing properties, one section per inheritance level.
    pub properties: Vec<Section>,
    /// Declarations, one section per inheritance level.
    pub fields: Vec<Section>,
    /// Engine-native attributes.
    pub native: Section,
}

impl ObjectSections {
    /// All sections in draw order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Section> {
        self.properties
            .iter_mut()
            .chain(self.fields.iter_mut())
            .chain(std::iter::once(&mut self.native))
    }

    /// All sections in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.properties
            .iter()
            .chain(self.fields.iter())
            .chain(std::iter::once(&self.native))
    }
}

/// Build the sections for `object`. `None` if the object is already gone.
pub fn build_sections(env: &Env<'_>, ids: &mut IdAllocator, object: ObjectRef) -> Option<ObjectSections> {
    let reflection = env.reflection;
    let guard = SlotGuard::capture(reflection, object)?;
    let base = ValueSlot::new(object.address(), guard);

    let chain = reflection.inheritance_chain(reflection.class_of(object));
    let mut properties = Vec::with_capacity(chain.len());
    let mut fields = Vec::with_capacity(chain.len());
    for level in chain {
        let header = reflection.name_of(level);
        let mut property_section = Section::new(ids, header.clone());
        let mut field_section = Section::new(ids, header);
        for field in reflection.declared_fields(level) {
            let section = if field.is_property() {
                &mut property_section
            } else {
                &mut field_section
            };
            select_views(env, ids, &field, base, &mut section.views);
        }
        properties.push(property_section);
        fields.push(field_section);
    }

    let native = native_section(env, ids, object, base);
    debug!(
        %object,
        levels = properties.len(),
        properties = properties.iter().map(|s| s.views.len()).sum::<usize>(),
        fields = fields.iter().map(|s| s.views.len()).sum::<usize>(),
        "sections built"
    );
    Some(ObjectSections {
        properties,
        fields,
        native,
    })
}

fn native_section(env: &Env<'_>, ids: &mut IdAllocator, object: ObjectRef, base: ValueSlot) -> Section {
    let reflection = env.reflection;
    let layout = reflection.native_layout();
    let pointer_size = env.layout.pointer_size();

    let mut section = Section::new(ids, NATIVE_SECTION);
    let mut descriptors = reflection.native_fields(object);
    descriptors.extend([
        FieldDescriptor::property(
            "ObjectFlags",
            TypeTag::Scalar(layout.flags_kind),
            layout.flags_offset,
            layout.flags_kind.size(),
        ),
        FieldDescriptor::property(
            "InternalIndex",
            TypeTag::Scalar(ScalarKind::I32),
            layout.internal_index_offset,
            ScalarKind::I32.size(),
        ),
        FieldDescriptor::property(
            "Class",
            TypeTag::Object {
                class: layout.class_class,
            },
            layout.class_offset,
            pointer_size,
        ),
        FieldDescriptor::property("Name", TypeTag::Name, layout.name_offset, 8),
        FieldDescriptor::property(
            "Outer",
            TypeTag::Object {
                class: layout.object_class,
            },
            layout.outer_offset,
            pointer_size,
        ),
    ]);
    for field in &descriptors {
        select_views(env, ids, field, base, &mut section.views);
    }
    section
}
