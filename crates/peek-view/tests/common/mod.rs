//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use peek_core::{IdAllocator, ObjectRef, SlotGuard, ValueSlot};
use peek_test_utils::{FakeProcess, RecordedRequests, ScriptedUi};
use peek_view::{BoxedView, DrawContext, Env, ForceExpand, ObjectSections, Settings, View};

/// Slot at the start of `object`.
pub fn base_slot(process: &FakeProcess, object: ObjectRef) -> ValueSlot {
    let guard = SlotGuard::capture(process, object).expect("object is live");
    ValueSlot::new(object.address(), guard)
}

/// Settings with editing switched on.
pub fn editable() -> Settings {
    Settings {
        editable: true,
        ..Settings::default()
    }
}

/// The first top-level view called `name`.
pub fn view_named<'a>(sections: &'a mut ObjectSections, name: &str) -> &'a mut BoxedView {
    sections
        .iter_mut()
        .flat_map(|section| section.views_mut().iter_mut())
        .find(|view| view.label().name() == name)
        .unwrap_or_else(|| panic!("no view named {name}"))
}

/// Everything needed to draw a lone view outside an inspector.
pub struct Harness {
    pub ui: ScriptedUi,
    pub windows: RecordedRequests,
    pub ids: IdAllocator,
    pub settings: Settings,
}

impl Harness {
    pub fn new(settings: Settings) -> Self {
        Self {
            ui: ScriptedUi::expanded(),
            windows: RecordedRequests::new(),
            ids: IdAllocator::new(),
            settings,
        }
    }

    /// Draw `view` for one cycle.
    pub fn draw(&mut self, env: Env<'_>, view: &mut dyn View) {
        let mut cx = DrawContext {
            env,
            ui: &mut self.ui,
            windows: &mut self.windows,
            settings: &self.settings,
            ids: &mut self.ids,
            window_id: "Test##object_0",
        };
        view.draw(&mut cx, ForceExpand::None, false);
    }
}
