//! Integration test: whole inspector windows over a fake process.
//!
//! Exercises section layout, the toolbar, filter propagation through
//! nested structs, and the one-cycle force-expand signal.

use peek_core::{
    DeclarationKind, FieldDescriptor, IdAllocator, MemoryExt, ObjectRef, PropertyFlags, ScalarKind,
    TypeTag,
};
use peek_test_utils::process::FLAGS_OFFSET;
use peek_test_utils::{FakeProcess, RecordedRequests, ScriptedUi, UiEvent};
use peek_view::builder::NATIVE_SECTION;
use peek_view::inspector::{STALE_OBJECT_TEXT, UNKNOWN_OBJECT_TITLE};
use peek_view::{ConfigError, Env, InspectorConfig, ObjectInspector};

struct World {
    process: FakeProcess,
    hero: ObjectRef,
    health: usize,
}

/// `Player : Actor : Object`, with `Player.Stats.Inner.Core.Armor`
/// nested three structs deep.
fn world() -> World {
    let process = FakeProcess::new();
    let object = process.object_class();
    let actor = process.define_class("Actor", object);
    let health = process.add_field(actor, "Health", TypeTag::Scalar(ScalarKind::I32), 4);

    let core = process.define_struct("Core");
    process.add_field(core, "Armor", TypeTag::Scalar(ScalarKind::I32), 4);
    let inner = process.define_struct("Inner");
    process.add_field(inner, "Core", TypeTag::Struct { def: core }, process.type_size(core));
    let stats = process.define_struct("Stats");
    process.add_field(stats, "Speed", TypeTag::Scalar(ScalarKind::I32), 4);
    process.add_field(stats, "Inner", TypeTag::Struct { def: inner }, process.type_size(inner));

    let player = process.define_class("Player", actor);
    process.add_field(player, "Stats", TypeTag::Struct { def: stats }, process.type_size(stats));

    let level = process.spawn(object, "Level", ObjectRef::NULL);
    let hero = process.spawn(player, "Hero", level);
    World {
        process,
        hero,
        health,
    }
}

impl World {
    fn env(&self) -> Env<'_> {
        Env::new(&self.process, &self.process, self.process.layout())
    }
}

struct Window {
    ui: ScriptedUi,
    windows: RecordedRequests,
    ids: IdAllocator,
    inspector: ObjectInspector,
}

impl Window {
    fn open(w: &World, ui: ScriptedUi) -> Self {
        let mut ids = IdAllocator::new();
        let inspector =
            ObjectInspector::new(&w.env(), w.hero, &mut ids, &InspectorConfig::default()).unwrap();
        Self {
            ui,
            windows: RecordedRequests::new(),
            ids,
            inspector,
        }
    }

    /// Draw one cycle and return what was drawn.
    fn cycle(&mut self, env: &Env<'_>) -> Vec<UiEvent> {
        self.inspector
            .draw(env, &mut self.ui, &mut self.windows, &mut self.ids);
        self.ui.take_events()
    }

    fn filter(&mut self, text: &str) {
        let id = format!("{}_filter", self.inspector.window_id());
        self.ui.type_text(&id, text);
    }
}

fn tree_nodes(events: &[UiEvent]) -> Vec<(&str, Option<bool>, bool)> {
    events
        .iter()
        .filter_map(|e| match e {
            UiEvent::TreeNode {
                label, force, open, ..
            } => Some((label.as_str(), *force, *open)),
            _ => None,
        })
        .collect()
}

fn node_id<'a>(events: &'a [UiEvent], wanted: &str) -> &'a str {
    events
        .iter()
        .find_map(|e| match e {
            UiEvent::TreeNode { id, label, .. } if label == wanted => Some(id.as_str()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no tree node {wanted}"))
}

fn drew(events: &[UiEvent], text: &str) -> bool {
    events
        .iter()
        .any(|e| matches!(e, UiEvent::Text(t) | UiEvent::TextDisabled(t) if t == text))
}

// ── Construction ────────────────────────────────────────────────────

#[test]
fn sections_follow_the_inheritance_chain() {
    let w = world();
    let window = Window::open(&w, ScriptedUi::new());
    let sections = window.inspector.sections().unwrap();

    let headers: Vec<&str> = sections.properties.iter().map(|s| s.header()).collect();
    assert_eq!(headers, ["Player", "Actor", "Object"]);
    let headers: Vec<&str> = sections.fields.iter().map(|s| s.header()).collect();
    assert_eq!(headers, ["Player", "Actor", "Object"]);
    assert_eq!(sections.native.header(), NATIVE_SECTION);

    // Each level holds only what it declares itself.
    let names = |index: usize| -> Vec<String> {
        sections.properties[index]
            .views()
            .iter()
            .map(|v| v.label().name().to_string())
            .collect()
    };
    assert_eq!(names(0), ["Stats"]);
    assert_eq!(names(1), ["Health"]);
    assert!(names(2).is_empty());
    assert!(sections.fields.iter().all(|s| s.is_empty()));
}

#[test]
fn native_section_puts_kind_specific_fields_first() {
    let w = world();
    w.process.add_native_field(
        w.hero,
        FieldDescriptor::property("Serial", TypeTag::Scalar(ScalarKind::U32), FLAGS_OFFSET, 4),
    );
    let window = Window::open(&w, ScriptedUi::new());
    let native: Vec<&str> = window
        .inspector
        .sections()
        .unwrap()
        .native
        .views()
        .iter()
        .map(|v| v.label().name())
        .collect();
    assert_eq!(
        native,
        ["Serial", "ObjectFlags", "InternalIndex", "Class", "Name", "Outer"]
    );
}

#[test]
fn window_id_is_unique_per_inspector() {
    let w = world();
    let mut ids = IdAllocator::new();
    let config = InspectorConfig::default();
    let first = ObjectInspector::new(&w.env(), w.hero, &mut ids, &config).unwrap();
    let second = ObjectInspector::new(&w.env(), w.hero, &mut ids, &config).unwrap();
    assert_eq!(first.title(), "Player'Level.Hero'");
    assert_eq!(first.window_id(), "Player'Level.Hero'##object_0");
    assert_ne!(first.window_id(), second.window_id());
}

#[test]
fn invalid_config_is_rejected() {
    let w = world();
    let mut ids = IdAllocator::new();
    let config = InspectorConfig {
        pointer_size: 6,
        ..InspectorConfig::default()
    };
    let result = ObjectInspector::new(&w.env(), w.hero, &mut ids, &config);
    assert!(matches!(result, Err(ConfigError::UnsupportedPointerSize(6))));
}

#[test]
fn unknown_object_opens_a_stale_window() {
    let w = world();
    let mut ids = IdAllocator::new();
    let mut inspector =
        ObjectInspector::new(&w.env(), ObjectRef(0xDEAD0), &mut ids, &InspectorConfig::default())
            .unwrap();
    assert_eq!(inspector.title(), UNKNOWN_OBJECT_TITLE);
    assert!(inspector.sections().is_none());

    let mut ui = ScriptedUi::new();
    let mut windows = RecordedRequests::new();
    inspector.draw(&w.env(), &mut ui, &mut windows, &mut ids);
    assert_eq!(ui.texts(), [UNKNOWN_OBJECT_TITLE, STALE_OBJECT_TEXT]);
}

// ── Drawing ─────────────────────────────────────────────────────────

#[test]
fn destroyed_object_shows_the_banner_only() {
    let w = world();
    let mut window = Window::open(&w, ScriptedUi::expanded());
    w.process.destroy(w.hero);
    let events = window.cycle(&w.env());
    assert!(drew(&events, STALE_OBJECT_TEXT));
    assert!(tree_nodes(&events).is_empty());
    assert!(!events
        .iter()
        .any(|e| matches!(e, UiEvent::Checkbox { .. })));
}

#[test]
fn toolbar_toggles_editing() {
    let w = world();
    let mut window = Window::open(&w, ScriptedUi::new());
    assert!(!window.inspector.settings().editable);
    let id = format!("{}_editable", window.inspector.window_id());
    window.ui.toggle(&id);
    window.cycle(&w.env());
    assert!(window.inspector.settings().editable);
    assert!(!window.inspector.settings().hex_display);
}

#[test]
fn filter_matches_current_values() {
    let w = world();
    w.process
        .write_i32(w.hero.address().offset(w.health), 1234)
        .unwrap();
    let mut window = Window::open(&w, ScriptedUi::new());
    window.filter("1234");
    let events = window.cycle(&w.env());
    let nodes: Vec<&str> = tree_nodes(&events).into_iter().map(|(l, _, _)| l).collect();
    assert_eq!(nodes, ["Actor"]);
    assert!(drew(&events, "Health"));
}

#[test]
fn filter_reaches_great_grandchildren() {
    let w = world();
    let mut window = Window::open(&w, ScriptedUi::new());
    window.cycle(&w.env());

    window.filter("armor");
    let events = window.cycle(&w.env());
    assert_eq!(
        tree_nodes(&events),
        [
            ("Player", Some(true), true),
            ("Stats", Some(true), true),
            ("Inner", Some(true), true),
            ("Core", Some(true), true),
        ]
    );
    assert!(drew(&events, "Armor"));
    assert!(!drew(&events, "Speed"));
    assert!(!drew(&events, "Health"));
}

#[test]
fn matching_struct_shows_all_of_its_fields() {
    let w = world();
    let mut window = Window::open(&w, ScriptedUi::new());
    window.filter("stats");
    let events = window.cycle(&w.env());
    assert!(drew(&events, "Speed"));
    assert!(drew(&events, "Armor"));
}

#[test]
fn clearing_the_filter_closes_once_and_replays_for_reopened_nodes() {
    let w = world();
    let env = w.env();
    let mut window = Window::open(&w, ScriptedUi::new());
    window.cycle(&env);

    // Activation opens everything on the path.
    window.filter("armor");
    window.cycle(&env);
    let events = window.cycle(&env);
    assert!(tree_nodes(&events).iter().all(|(_, force, _)| force.is_none()));

    // Deactivation closes every drawn node.
    window.filter("");
    let events = window.cycle(&env);
    let nodes = tree_nodes(&events);
    assert!(!nodes.is_empty());
    assert!(nodes.iter().all(|(_, force, open)| *force == Some(false) && !open));
    let player = node_id(&events, "Player").to_string();

    // The user reopens the section; its still-open child gets the close
    // it missed while the section was shut.
    window.ui.set_open(&player, true);
    let events = window.cycle(&env);
    let nodes = tree_nodes(&events);
    assert!(nodes.contains(&("Player", None, true)));
    assert!(nodes.contains(&("Stats", Some(false), false)));

    // The replay happens once.
    let events = window.cycle(&env);
    assert!(tree_nodes(&events).contains(&("Stats", None, false)));
}

#[test]
fn declarations_list_their_members() {
    let process = FakeProcess::new();
    let weapon = process.define_class("Weapon", process.object_class());
    let fire = process.define_function(weapon, "Fire");
    process.add_property(
        fire,
        FieldDescriptor::property("Power", TypeTag::Scalar(ScalarKind::F32), 0, 4)
            .with_flags(PropertyFlags::PARAM | PropertyFlags::OPTIONAL),
    );
    process.add_property(
        fire,
        FieldDescriptor::property("ReturnValue", TypeTag::Bool { field_mask: 0xFF }, 0, 1)
            .with_flags(PropertyFlags::PARAM | PropertyFlags::RETURN),
    );
    let mode = process.define_enum("EMode", [("Idle", 0), ("Busy", 10)]);
    process.add_declaration(
        weapon,
        FieldDescriptor::declaration("EMode", mode.object, DeclarationKind::Enum(mode.clone())),
    );
    let rifle = process.spawn(weapon, "Rifle", ObjectRef::NULL);

    let env = Env::new(&process, &process, process.layout());
    let mut ids = IdAllocator::new();
    let mut inspector =
        ObjectInspector::new(&env, rifle, &mut ids, &InspectorConfig::default()).unwrap();
    let mut ui = ScriptedUi::expanded();
    let mut windows = RecordedRequests::new();

    let hex = format!("{}_hex", inspector.window_id());
    ui.toggle(&hex);
    inspector.draw(&env, &mut ui, &mut windows, &mut ids);

    let nodes: Vec<&str> = ui.tree_nodes().into_iter().map(|(l, _, _)| l).collect();
    assert!(nodes.contains(&"Function Fire"));
    assert!(nodes.contains(&"Enum EMode"));
    let texts = ui.texts();
    assert!(texts.contains(&"Power (optional):"));
    assert!(texts.contains(&"ReturnValue (return):"));
    assert!(texts.contains(&"FloatProperty"));
    assert!(texts.contains(&"Idle (0)"));
    assert!(texts.contains(&"Busy (A)"));
}
