//! Integration test: leaf values edited through views and the scripted UI.

mod common;

use std::sync::Arc;

use common::{base_slot, editable, Harness};
use peek_core::{
    EditError, EnumDef, IdAllocator, MemoryExt, ObjectRef, Reflection, ScalarKind, StringKind,
    ScalarValue, TextFilter, TypeTag, ValueSlot,
};
use peek_test_utils::process::HANDLE_SIZE;
use peek_test_utils::FakeProcess;
use peek_view::boolean::BoolView;
use peek_view::enumeration::{EnumView, FLAGS_PREVIEW};
use peek_view::scalar::ScalarView;
use peek_view::text::{NameView, StringView};
use peek_view::{Env, FilterContext, Settings, View};

/// A process with one object carrying an 8 byte payload.
struct Scratch {
    process: FakeProcess,
    owner: ObjectRef,
    payload: usize,
    ids: IdAllocator,
}

impl Scratch {
    fn new() -> Self {
        let process = FakeProcess::new();
        let class = process.define_class("Scratch", process.object_class());
        let payload =
            process.add_field(class, "Payload", TypeTag::Scalar(ScalarKind::U64), HANDLE_SIZE);
        let owner = process.spawn(class, "S", ObjectRef::NULL);
        Self {
            process,
            owner,
            payload,
            ids: IdAllocator::new(),
        }
    }

    fn env(&self) -> Env<'_> {
        Env::new(&self.process, &self.process, self.process.layout())
    }

    fn slot(&self) -> ValueSlot {
        base_slot(&self.process, self.owner).field(self.payload)
    }
}

// ── Booleans ────────────────────────────────────────────────────────

#[test]
fn bool_edits_touch_only_their_bits() {
    let mut s = Scratch::new();
    let address = s.slot().address();
    s.process.write_u8(address, 0b1010_0000).unwrap();

    let mut low = BoolView::new("bLow", s.ids.allocate(), s.slot(), 0x01);
    let mut mid = BoolView::new("bMid", s.ids.allocate(), s.slot(), 0x04);

    mid.commit(&s.env(), &editable(), "true").unwrap();
    assert_eq!(s.process.read_u8(address).unwrap(), 0b1010_0100);

    let mut harness = Harness::new(editable());
    harness.ui.toggle(low.label().ui_id());
    harness.draw(s.env(), &mut low);
    assert_eq!(s.process.read_u8(address).unwrap(), 0b1010_0101);

    mid.commit(&s.env(), &editable(), "off").unwrap();
    assert_eq!(s.process.read_u8(address).unwrap(), 0b1010_0001);
}

#[test]
fn bool_rejects_unparseable_text() {
    let mut s = Scratch::new();
    let mut view = BoolView::new("bFlag", s.ids.allocate(), s.slot(), 0x02);
    let err = view.commit(&s.env(), &editable(), "perhaps").unwrap_err();
    assert!(matches!(err, EditError::Parse { .. }));
    assert_eq!(s.process.read_u8(s.slot().address()).unwrap(), 0);
}

// ── Scalars ─────────────────────────────────────────────────────────

#[test]
fn scalar_input_writes_only_while_owner_lives() {
    let mut s = Scratch::new();
    let address = s.slot().address();
    let mut view = ScalarView::new("Payload", s.ids.allocate(), s.slot(), ScalarKind::U64);

    let mut harness = Harness::new(editable());
    harness.ui.enter_scalar(view.label().ui_id(), ScalarValue::U64(77));
    harness.draw(s.env(), &mut view);
    assert_eq!(s.process.read_u64(address).unwrap(), 77);

    s.process.destroy(s.owner);
    harness.ui.enter_scalar(view.label().ui_id(), ScalarValue::U64(5));
    harness.ui.take_events();
    harness.draw(s.env(), &mut view);
    assert_eq!(s.process.read_u64(address).unwrap(), 77);
    assert!(harness.ui.disabled_texts().contains(&peek_view::view::STALE_TEXT));
}

// ── Enums ───────────────────────────────────────────────────────────

fn flag_enum() -> Arc<EnumDef> {
    Arc::new(EnumDef::new(
        ObjectRef::NULL,
        "EAccess",
        [("None", 0), ("Read", 1), ("Write", 2), ("Exec", 4), ("Admin", 8)],
    ))
}

fn plain_enum() -> Arc<EnumDef> {
    Arc::new(EnumDef::new(
        ObjectRef::NULL,
        "EState",
        [("Idle", 0), ("Walking", 1), ("Running", 2)],
    ))
}

#[test]
fn gapped_enum_defaults_to_flags() {
    let mut s = Scratch::new();
    let address = s.slot().address();
    s.process.write_u8(address, 1).unwrap();
    let mut view = EnumView::new("Access", s.ids.allocate(), s.slot(), ScalarKind::U8, flag_enum());
    assert!(view.is_flags());

    let mut harness = Harness::new(editable());
    harness.ui.open_combo(view.label().ui_id());
    // Entries by value: None, Read, Write, ...
    harness.ui.toggle(&view.label().sub_id("flag2"));
    harness.draw(s.env(), &mut view);

    assert_eq!(s.process.read_u8(address).unwrap(), 0b11);
    assert!(harness.ui.events().iter().any(|e| matches!(
        e,
        peek_test_utils::UiEvent::Combo { preview, .. } if preview == FLAGS_PREVIEW
    )));
}

#[test]
fn contiguous_enum_selects_one_entry() {
    let mut s = Scratch::new();
    let address = s.slot().address();
    s.process.write_u8(address, 1).unwrap();
    let mut view = EnumView::new("State", s.ids.allocate(), s.slot(), ScalarKind::U8, plain_enum());
    assert!(!view.is_flags());

    let mut harness = Harness::new(editable());
    harness.ui.open_combo(view.label().ui_id());
    harness.ui.select("Running (2)");
    harness.draw(s.env(), &mut view);
    assert_eq!(s.process.read_u8(address).unwrap(), 2);

    view.commit(&s.env(), &editable(), "Idle").unwrap();
    assert_eq!(s.process.read_u8(address).unwrap(), 0);
}

#[test]
fn read_only_enum_ignores_selection() {
    let mut s = Scratch::new();
    let mut view = EnumView::new("State", s.ids.allocate(), s.slot(), ScalarKind::U8, plain_enum());
    let mut harness = Harness::new(Settings::default());
    harness.ui.open_combo(view.label().ui_id());
    harness.ui.select("Running (2)");
    harness.draw(s.env(), &mut view);
    assert_eq!(s.process.read_u8(s.slot().address()).unwrap(), 0);
}

// ── Strings and names ───────────────────────────────────────────────

#[test]
fn string_commit_goes_through_the_runtime() {
    let mut s = Scratch::new();
    let address = s.slot().address();
    s.process.set_string(address, "old");
    let mut view = StringView::new("Title", s.ids.allocate(), s.slot(), StringKind::Str);

    let mut harness = Harness::new(editable());
    harness.draw(s.env(), &mut view);
    assert_eq!(harness.ui.input_text_of(view.label().ui_id()), Some("old"));

    harness.ui.type_text(view.label().ui_id(), "new title");
    harness.draw(s.env(), &mut view);
    assert_eq!(
        s.process.read_string(StringKind::Str, address).unwrap(),
        "new title"
    );
}

#[test]
fn string_owner_gone_is_stale() {
    let mut s = Scratch::new();
    s.process.set_string(s.slot().address(), "text");
    let mut view = StringView::new("Title", s.ids.allocate(), s.slot(), StringKind::Text);
    s.process.destroy(s.owner);

    let mut harness = Harness::new(editable());
    harness.draw(s.env(), &mut view);
    assert!(harness.ui.disabled_texts().contains(&peek_view::view::STALE_TEXT));
    let err = view.commit(&s.env(), &editable(), "x").unwrap_err();
    assert_eq!(err, EditError::Stale);
}

#[test]
fn string_filtered_out_then_drawn_shows_current_text() {
    let mut s = Scratch::new();
    let address = s.slot().address();
    s.process.set_string(address, "old");
    let mut view = StringView::new("Title", s.ids.allocate(), s.slot(), StringKind::Str);

    let filter = TextFilter::new("zzz");
    let mut cx = FilterContext {
        env: Env::new(&s.process, &s.process, s.process.layout()),
        filter: &filter,
        ids: &mut s.ids,
    };
    assert!(!view.passes_filter(&mut cx));

    // The row was never drawn; the runtime changes the string meanwhile.
    s.process.set_string(address, "new");
    let mut harness = Harness::new(Settings::default());
    harness.draw(s.env(), &mut view);
    assert_eq!(harness.ui.input_text_of(view.label().ui_id()), Some("new"));
}

#[test]
fn name_commit_interns_trimmed_text() {
    let mut s = Scratch::new();
    let address = s.slot().address();
    s.process.set_name(address, "Door");
    let mut view = NameView::new("Tag", s.ids.allocate(), s.slot());

    view.commit(&s.env(), &editable(), "  Gate ").unwrap();
    let id = s.process.name_id(address).unwrap();
    assert_eq!(s.process.name_text(id).as_deref(), Some("Gate"));

    let mut harness = Harness::new(Settings::default());
    harness.draw(s.env(), &mut view);
    assert_eq!(harness.ui.input_text_of(view.label().ui_id()), Some("Gate"));
}
