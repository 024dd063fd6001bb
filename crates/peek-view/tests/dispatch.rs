//! Integration test: every descriptor gets a view.

mod common;

use std::sync::Arc;

use common::{base_slot, editable};
use peek_core::{
    DeclarationKind, EnumDef, FieldDescriptor, IdAllocator, MemoryExt, ObjectRef, Reflection,
    ScalarKind, TextFilter, TypeTag,
};
use peek_test_utils::process::{ARRAY_HEADER_SIZE, DELEGATE_SIZE, HANDLE_SIZE};
use peek_test_utils::FakeProcess;
use peek_view::{select_view, select_views, BoxedView, Env, FilterContext};

fn every_known_tag(process: &FakeProcess) -> Vec<TypeTag> {
    let object = process.object_class();
    let def = Arc::new(EnumDef::new(ObjectRef::NULL, "EMode", [("A", 0), ("B", 1)]));
    let point = process.define_struct("Point");
    process.add_field(point, "X", TypeTag::Scalar(ScalarKind::F32), 4);
    let mut tags: Vec<TypeTag> = ScalarKind::ALL.into_iter().map(TypeTag::Scalar).collect();
    tags.extend([
        TypeTag::Bool { field_mask: 0x04 },
        TypeTag::Byte { enum_def: None },
        TypeTag::Byte {
            enum_def: Some(def.clone()),
        },
        TypeTag::Enum {
            underlying: ScalarKind::I32,
            def,
        },
        TypeTag::Str,
        TypeTag::Text,
        TypeTag::Name,
        TypeTag::Object { class: object },
        TypeTag::Class {
            class: process.class_class(),
            meta_class: object,
        },
        TypeTag::Interface {
            interface: process.interface_class(),
        },
        TypeTag::WeakObject { class: object },
        TypeTag::SoftObject { class: object },
        TypeTag::SoftClass {
            class: process.class_class(),
            meta_class: object,
        },
        TypeTag::LazyObject { class: object },
        TypeTag::Struct { def: point },
        TypeTag::Array {
            inner: Box::new(FieldDescriptor::element(TypeTag::Name, HANDLE_SIZE)),
        },
        TypeTag::Delegate {
            signature: ObjectRef::NULL,
        },
        TypeTag::MulticastDelegate {
            signature: ObjectRef::NULL,
            binding_size: DELEGATE_SIZE,
        },
    ]);
    tags
}

fn passes(process: &FakeProcess, view: &mut BoxedView, query: &str) -> bool {
    let env = Env::new(process, process, process.layout());
    let filter = TextFilter::new(query);
    let mut ids = IdAllocator::new();
    let mut cx = FilterContext {
        env,
        filter: &filter,
        ids: &mut ids,
    };
    view.passes_filter(&mut cx)
}

#[test]
fn every_known_tag_gets_a_live_view() {
    let process = FakeProcess::new();
    let tags = every_known_tag(&process);
    let holder = process.define_class("Holder", process.object_class());
    for (index, tag) in tags.into_iter().enumerate() {
        let field = FieldDescriptor::property(format!("F{index}"), tag, 0, ARRAY_HEADER_SIZE);
        process.add_property(holder, field);
    }
    let object = process.spawn(holder, "H", ObjectRef::NULL);

    let env = Env::new(&process, &process, process.layout());
    let mut ids = IdAllocator::new();
    for field in process.declared_fields(holder) {
        let view = select_view(&env, &mut ids, &field, base_slot(&process, object));
        assert!(!view.is_disabled(), "{} got a placeholder", field.type_name());
        assert_eq!(view.label().name(), field.name);
    }
}

#[test]
fn unknown_property_becomes_a_disabled_placeholder() {
    let process = FakeProcess::new();
    let object = process.spawn(process.object_class(), "O", ObjectRef::NULL);
    let env = Env::new(&process, &process, process.layout());
    let mut ids = IdAllocator::new();
    let field = FieldDescriptor::property(
        "Path",
        TypeTag::Other {
            type_name: "FieldPathProperty".into(),
        },
        0,
        8,
    );
    let mut view = select_view(&env, &mut ids, &field, base_slot(&process, object));
    assert!(view.is_disabled());
    assert!(passes(&process, &mut view, "fieldpath"));
    assert!(passes(&process, &mut view, "unrecognized"));
    assert!(!passes(&process, &mut view, "health"));
}

#[test]
fn unknown_declaration_becomes_a_disabled_placeholder() {
    let process = FakeProcess::new();
    let object = process.spawn(process.object_class(), "O", ObjectRef::NULL);
    let env = Env::new(&process, &process, process.layout());
    let mut ids = IdAllocator::new();
    let field = FieldDescriptor::declaration(
        "Delegate",
        ObjectRef::NULL,
        DeclarationKind::Other {
            type_name: "DelegateFunction".into(),
        },
    );
    let mut view = select_view(&env, &mut ids, &field, base_slot(&process, object));
    assert!(view.is_disabled());
    assert!(passes(&process, &mut view, "DelegateFunction"));
}

#[test]
fn constant_declaration_is_plain_text() {
    let process = FakeProcess::new();
    let object = process.spawn(process.object_class(), "O", ObjectRef::NULL);
    let env = Env::new(&process, &process, process.layout());
    let mut ids = IdAllocator::new();
    let field = FieldDescriptor::declaration(
        "MaxPlayers",
        ObjectRef::NULL,
        DeclarationKind::Const { value: "16".into() },
    );
    let mut view = select_view(&env, &mut ids, &field, base_slot(&process, object));
    assert!(!view.is_disabled());
    assert!(passes(&process, &mut view, "16"));
}

#[test]
fn inline_arrays_expand_to_indexed_views() {
    let process = FakeProcess::new();
    let holder = process.define_class("Holder", process.object_class());
    let offset = process.add_property(
        holder,
        FieldDescriptor::property("Slots", TypeTag::Scalar(ScalarKind::I32), 0, 4).with_array_dim(3),
    );
    let object = process.spawn(holder, "H", ObjectRef::NULL);
    let env = Env::new(&process, &process, process.layout());
    let mut ids = IdAllocator::new();

    let field = process.declared_fields(holder).remove(0);
    let mut views = Vec::new();
    select_views(&env, &mut ids, &field, base_slot(&process, object), &mut views);
    let names: Vec<&str> = views.iter().map(|v| v.label().name()).collect();
    assert_eq!(names, ["Slots[0]", "Slots[1]", "Slots[2]"]);

    views[2].commit(&env, &editable(), "7").unwrap();
    let element = object.address().offset(offset).element(2, 4);
    assert_eq!(process.read_i32(element).unwrap(), 7);
    assert_eq!(process.read_i32(object.address().offset(offset)).unwrap(), 0);
}

#[test]
fn views_get_distinct_identities() {
    let process = FakeProcess::new();
    let object = process.spawn(process.object_class(), "O", ObjectRef::NULL);
    let env = Env::new(&process, &process, process.layout());
    let mut ids = IdAllocator::new();
    let field = FieldDescriptor::property("Same", TypeTag::Scalar(ScalarKind::U8), 0, 1);
    let a = select_view(&env, &mut ids, &field, base_slot(&process, object));
    let b = select_view(&env, &mut ids, &field, base_slot(&process, object));
    assert_eq!(a.label().name(), b.label().name());
    assert_ne!(a.label().ui_id(), b.label().ui_id());
}
