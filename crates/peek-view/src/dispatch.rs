//! Type tag to view dispatch.
//!
//! Every descriptor maps to some view. The match below is exhaustive
//! over [`TypeTag`] and [`DeclarationKind`]; the `Other` arms produce a
//! disabled placeholder so one unknown field never hides the rest of
//! the object.

use peek_core::{
    DeclarationKind, FieldDescriptor, FieldKind, IdAllocator, Indirection, ObjectRef, ScalarKind,
    StringKind, TypeTag, ValueSlot,
};
use tracing::info;

use crate::boolean::BoolView;
use crate::composite::StructView;
use crate::container::ContainerView;
use crate::context::Env;
use crate::declaration::{EnumFieldView, ObjectFieldView, StructFieldView};
use crate::delegate::DelegateView;
use crate::enumeration::EnumView;
use crate::placeholder::ConstView;
use crate::reference::{IndirectRefView, ObjectRefView, ReferenceTarget};
use crate::scalar::ScalarView;
use crate::text::{NameView, StringView};
use crate::view::BoxedView;

/// Build the view for `field` of the object or struct at `base`.
///
/// Fixed-size inline arrays yield only their first element here; use
/// [`select_views`] to get one view per element.
pub fn select_view(
    env: &Env<'_>,
    ids: &mut IdAllocator,
    field: &FieldDescriptor,
    base: ValueSlot,
) -> BoxedView {
    view_for(env, ids, field.name.clone(), field, base.field(field.offset))
}

/// Append the views for `field` of the object or struct at `base`.
///
/// A field with inline arity `n > 1` yields `n` views labelled
/// `name[i]`, element `i` at `base + offset + i * element_size`.
pub fn select_views(
    env: &Env<'_>,
    ids: &mut IdAllocator,
    field: &FieldDescriptor,
    base: ValueSlot,
    out: &mut Vec<BoxedView>,
) {
    let slot = base.field(field.offset);
    if field.array_dim <= 1 {
        out.push(view_for(env, ids, field.name.clone(), field, slot));
        return;
    }
    out.reserve(field.array_dim);
    for index in 0..field.array_dim {
        let name = format!("{}[{index}]", field.name);
        out.push(view_for(env, ids, name, field, slot.element(index, field.element_size)));
    }
}

/// Build the view for element `index` of a dynamic array.
pub fn element_view(
    env: &Env<'_>,
    ids: &mut IdAllocator,
    inner: &FieldDescriptor,
    slot: ValueSlot,
    index: usize,
) -> BoxedView {
    view_for(env, ids, format!("[{index}]"), inner, slot)
}

fn view_for(
    env: &Env<'_>,
    ids: &mut IdAllocator,
    name: String,
    field: &FieldDescriptor,
    slot: ValueSlot,
) -> BoxedView {
    match &field.kind {
        FieldKind::Property(tag) => property_view(env, ids, name, tag, slot),
        FieldKind::Declaration(kind) => declaration_view(env, ids, name, field.object, kind),
    }
}

fn property_view(
    env: &Env<'_>,
    ids: &mut IdAllocator,
    name: String,
    tag: &TypeTag,
    slot: ValueSlot,
) -> BoxedView {
    let id = ids.allocate();
    match tag {
        TypeTag::Scalar(kind) => Box::new(ScalarView::new(name, id, slot, *kind)),
        TypeTag::Bool { field_mask } => Box::new(BoolView::new(name, id, slot, *field_mask)),
        TypeTag::Byte { enum_def: None } => Box::new(ScalarView::new(name, id, slot, ScalarKind::U8)),
        TypeTag::Byte {
            enum_def: Some(def),
        } => Box::new(EnumView::new(name, id, slot, ScalarKind::U8, def.clone())),
        TypeTag::Enum { underlying, def } => {
            Box::new(EnumView::new(name, id, slot, *underlying, def.clone()))
        }
        TypeTag::Str => Box::new(StringView::new(name, id, slot, StringKind::Str)),
        TypeTag::Text => Box::new(StringView::new(name, id, slot, StringKind::Text)),
        TypeTag::Name => Box::new(NameView::new(name, id, slot)),
        TypeTag::Object { class } => Box::new(ObjectRefView::new(
            name,
            id,
            slot,
            ReferenceTarget::Object { class: *class },
        )),
        TypeTag::Class { class, meta_class } => Box::new(ObjectRefView::new(
            name,
            id,
            slot,
            ReferenceTarget::Class {
                class: *class,
                meta_class: *meta_class,
            },
        )),
        TypeTag::Interface { interface } => Box::new(ObjectRefView::new(
            name,
            id,
            slot,
            ReferenceTarget::Interface {
                interface: *interface,
            },
        )),
        TypeTag::WeakObject { class } => Box::new(IndirectRefView::new(
            name,
            id,
            slot,
            Indirection::Weak,
            *class,
            None,
        )),
        TypeTag::SoftObject { class } => Box::new(IndirectRefView::new(
            name,
            id,
            slot,
            Indirection::Soft,
            *class,
            None,
        )),
        TypeTag::SoftClass { class, meta_class } => Box::new(IndirectRefView::new(
            name,
            id,
            slot,
            Indirection::Soft,
            *class,
            Some(*meta_class),
        )),
        TypeTag::LazyObject { class } => Box::new(IndirectRefView::new(
            name,
            id,
            slot,
            Indirection::Lazy,
            *class,
            None,
        )),
        TypeTag::Struct { def } => Box::new(StructView::new(env, ids, name, id, slot, *def)),
        TypeTag::Array { inner } => Box::new(ContainerView::new(name, id, slot, (**inner).clone())),
        TypeTag::Delegate { .. } => Box::new(DelegateView::new(name, id, slot)),
        TypeTag::MulticastDelegate {
            signature,
            binding_size,
        } => Box::new(ContainerView::multicast(name, id, slot, *signature, *binding_size)),
        TypeTag::Other { type_name } => {
            info!(field = %name, type_name = %type_name, "unrecognized property type");
            Box::new(ConstView::unrecognized_property(name, id, type_name))
        }
    }
}

fn declaration_view(
    env: &Env<'_>,
    ids: &mut IdAllocator,
    name: String,
    object: ObjectRef,
    kind: &DeclarationKind,
) -> BoxedView {
    let id = ids.allocate();
    match kind {
        DeclarationKind::Class => Box::new(ObjectFieldView::new(env, name, id, object)),
        DeclarationKind::Struct | DeclarationKind::ScriptStruct => {
            Box::new(StructFieldView::new(env, name, id, object, false))
        }
        DeclarationKind::Function => Box::new(StructFieldView::new(env, name, id, object, true)),
        DeclarationKind::Enum(def) => Box::new(EnumFieldView::new(env, name, id, def)),
        DeclarationKind::Const { value } => Box::new(ConstView::new(name, id, value.as_str())),
        DeclarationKind::Other { type_name } => {
            info!(field = %name, type_name = %type_name, "unrecognized field type");
            Box::new(ConstView::unrecognized_field(name, id, type_name))
        }
    }
}
