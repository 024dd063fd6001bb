//! One inspector window: an object, its sections, and its settings.

use peek_core::{IdAllocator, InputMode, ObjectRef, SlotGuard, Ui, WindowRequests};
use tracing::debug;

use crate::builder::{build_sections, ObjectSections};
use crate::config::{ConfigError, InspectorConfig};
use crate::context::{DrawContext, Env};
use crate::resolver::format_object_name;
use crate::settings::Settings;

/// Title of an inspector whose object could not be resolved.
pub const UNKNOWN_OBJECT_TITLE: &str = "Unknown Object";

/// Banner shown once the inspected object is gone.
pub const STALE_OBJECT_TEXT: &str = "Object is no longer valid";

/// A live inspector rooted at one object.
pub struct ObjectInspector {
    object: ObjectRef,
    guard: Option<SlotGuard>,
    title: String,
    window_id: String,
    settings: Settings,
    sections: Option<ObjectSections>,
}

impl ObjectInspector {
    /// Open an inspector on `object`.
    ///
    /// The window id is `title##object_N` with `N` unique per allocator,
    /// so two inspectors on the same object get separate windows.
    pub fn new(
        env: &Env<'_>,
        object: ObjectRef,
        ids: &mut IdAllocator,
        config: &InspectorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let guard = SlotGuard::capture(env.reflection, object);
        let title = if guard.is_some() {
            format_object_name(env.reflection, object)
        } else {
            UNKNOWN_OBJECT_TITLE.to_string()
        };
        let window_id = format!("{title}##object_{}", ids.allocate());
        let sections = build_sections(env, ids, object);
        debug!(%object, window = %window_id, "inspector opened");
        Ok(Self {
            object,
            guard,
            title,
            window_id,
            settings: Settings::from_config(config),
            sections,
        })
    }

    /// The inspected object.
    pub fn object(&self) -> ObjectRef {
        self.object
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Unique host window id.
    pub fn window_id(&self) -> &str {
        &self.window_id
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings, for hosts that drive the toolbar themselves.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Built sections. `None` if the object was gone at open time.
    pub fn sections(&self) -> Option<&ObjectSections> {
        self.sections.as_ref()
    }

    /// Mutable sections.
    pub fn sections_mut(&mut self) -> Option<&mut ObjectSections> {
        self.sections.as_mut()
    }

    /// Whether the inspected object still exists.
    pub fn is_live(&self, env: &Env<'_>) -> bool {
        self.guard.is_some_and(|guard| guard.is_live(env.reflection))
    }

    /// Draw one display cycle.
    pub fn draw(
        &mut self,
        env: &Env<'_>,
        ui: &mut dyn Ui,
        windows: &mut dyn WindowRequests,
        ids: &mut IdAllocator,
    ) {
        ui.text(&self.title);
        if !self.is_live(env) {
            ui.text_disabled(STALE_OBJECT_TEXT);
            return;
        }

        // ── Toolbar ─────────────────────────────────────────────
        let id = &self.window_id;
        ui.checkbox(&format!("{id}_editable"), "Editable", &mut self.settings.editable, true);
        ui.checkbox(&format!("{id}_hex"), "Hex", &mut self.settings.hex_display, true);
        ui.input_text(
            &format!("{id}_filter"),
            self.settings.filter.text_mut(),
            InputMode::CommitOnEnter,
        );
        self.settings.filter.rebuild();
        let expand = self.settings.advance_filter_state();

        let Some(sections) = self.sections.as_mut() else {
            return;
        };
        let mut cx = DrawContext {
            env: *env,
            ui,
            windows,
            settings: &self.settings,
            ids,
            window_id: &self.window_id,
        };
        for section in sections.iter_mut() {
            section.draw(&mut cx, expand);
        }
    }
}
