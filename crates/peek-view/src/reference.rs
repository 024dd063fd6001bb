//! Views over references to other objects.
//!
//! Direct references ([`ObjectRefView`]) hold a raw pointer, or for
//! interfaces a pointer pair. Indirect references ([`IndirectRefView`])
//! hold an identifier the runtime resolves: a weak table index, an asset
//! path, or a guid. Both edit through the same flow: parse the query,
//! look the object up, check it against the declared type, write.

use peek_core::{
    Address, EditError, Indirection, MemoryExt, ObjectRef, Reflection, ValueSlot, ViewId,
};
use tracing::{debug, trace};

use crate::context::{DrawContext, Env, FilterContext};
use crate::resolver::{format_object_name, resolve_query, ObjectLink};
use crate::settings::{ForceExpand, Settings};
use crate::view::{begin_row, draw_stale, Label, View};

/// Declared type of a direct reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceTarget {
    /// Instance of `class`.
    Object {
        /// Declared class. Null accepts anything.
        class: ObjectRef,
    },
    /// A type definition deriving from `meta_class`.
    Class {
        /// Class of the definition object itself.
        class: ObjectRef,
        /// Required base of the referenced type.
        meta_class: ObjectRef,
    },
    /// An object implementing `interface`.
    Interface {
        /// Declared interface.
        interface: ObjectRef,
    },
}

// ── Acceptance ──────────────────────────────────────────────────

fn check_instance(
    reflection: &dyn Reflection,
    object: ObjectRef,
    class: ObjectRef,
) -> Result<(), EditError> {
    if class.is_null() || reflection.is_instance(object, class) {
        Ok(())
    } else {
        Err(EditError::NotAnInstance {
            class: reflection.name_of(class),
            object: format_object_name(reflection, object),
        })
    }
}

fn check_subclass(
    reflection: &dyn Reflection,
    object: ObjectRef,
    meta_class: ObjectRef,
) -> Result<(), EditError> {
    if meta_class.is_null() || reflection.inherits(object, meta_class) {
        Ok(())
    } else {
        Err(EditError::NotASubclass {
            class: reflection.name_of(meta_class),
            object: format_object_name(reflection, object),
        })
    }
}

// ── Direct references ───────────────────────────────────────────

/// An object, class or interface pointer.
pub struct ObjectRefView {
    label: Label,
    slot: ValueSlot,
    target: ReferenceTarget,
    link: ObjectLink,
}

impl ObjectRefView {
    /// Bind a reference of declared type `target` at `slot`.
    pub fn new(name: impl Into<String>, id: ViewId, slot: ValueSlot, target: ReferenceTarget) -> Self {
        Self {
            label: Label::new(name, id),
            slot,
            target,
            link: ObjectLink::new(),
        }
    }

    /// The object currently referenced. `None` when the slot is stale.
    pub fn read(&self, env: &Env<'_>) -> Option<ObjectRef> {
        let address = self.slot.live_address(env.reflection)?;
        env.memory
            .read_pointer(address, &env.layout)
            .ok()
            .map(ObjectRef::from)
    }

    /// Display identity as of the last refresh.
    pub fn display(&self) -> &str {
        self.link.display()
    }

    /// Pending failure message, if any.
    pub fn failure(&self) -> Option<&str> {
        self.link.failure()
    }

    fn refresh(&mut self, env: &Env<'_>) -> bool {
        match self.read(env) {
            Some(object) => {
                self.link.update(env.reflection, object);
                true
            }
            None => false,
        }
    }

    fn try_commit(&self, env: &Env<'_>, settings: &Settings, text: &str) -> Result<ObjectRef, EditError> {
        if !settings.editable {
            return Err(EditError::NotEditable);
        }
        let address = self.slot.live_address(env.reflection).ok_or(EditError::Stale)?;
        let object = resolve_query(env.reflection, text)?;
        let reflection = env.reflection;

        match self.target {
            ReferenceTarget::Object { class } => {
                if !object.is_null() {
                    check_instance(reflection, object, class)?;
                }
                env.memory.write_pointer(address, object.address(), &env.layout)?;
            }
            ReferenceTarget::Class { class, meta_class } => {
                if !object.is_null() {
                    check_instance(reflection, object, class)?;
                    check_subclass(reflection, object, meta_class)?;
                }
                env.memory.write_pointer(address, object.address(), &env.layout)?;
            }
            ReferenceTarget::Interface { interface } => {
                let interface_pointer = if object.is_null() {
                    Address::NULL
                } else {
                    let offset = reflection.interface_offset(object, interface).ok_or_else(|| {
                        EditError::InterfaceNotImplemented {
                            interface: reflection.name_of(interface),
                            object: format_object_name(reflection, object),
                        }
                    })?;
                    object.address().offset(offset)
                };
                env.memory.write_pointer_pair(
                    address,
                    object.address(),
                    interface_pointer,
                    &env.layout,
                )?;
            }
        }
        Ok(object)
    }
}

impl View for ObjectRefView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, _expand: ForceExpand, _show_all: bool) {
        if !self.refresh(&cx.env) {
            draw_stale(cx.ui, &self.label);
            return;
        }
        begin_row(cx.ui, &self.label);
        if cx.settings.editable {
            if let Some(text) = self.link.draw_editable(cx, self.label.ui_id()) {
                let env = cx.env;
                let _ = self.commit(&env, cx.settings, &text);
            }
        } else {
            self.link.draw(cx, self.label.ui_id());
        }
        self.link.draw_notice(cx, &self.label.sub_id("notice"));
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        if self.label.passes(cx.filter) {
            return true;
        }
        self.refresh(&cx.env) && self.link.passes_filter(cx.filter)
    }

    fn commit(&mut self, env: &Env<'_>, settings: &Settings, text: &str) -> Result<(), EditError> {
        match self.try_commit(env, settings, text) {
            Ok(object) => {
                trace!(field = self.label.name(), %object, "reference committed");
                self.link.update(env.reflection, object);
                Ok(())
            }
            Err(err) => {
                debug!(field = self.label.name(), %err, "reference edit rejected");
                self.link.fail(&err);
                Err(err)
            }
        }
    }
}

// ── Indirect references ─────────────────────────────────────────

/// A weak, soft or lazy reference.
///
/// When the identifier does not currently resolve, the raw identifier
/// is shown instead of "None".
pub struct IndirectRefView {
    label: Label,
    slot: ValueSlot,
    indirection: Indirection,
    class: ObjectRef,
    meta_class: Option<ObjectRef>,
    link: ObjectLink,
    identifier: Option<String>,
}

impl IndirectRefView {
    /// Bind an indirect reference to instances of `class`. Soft class
    /// references also carry the base the referenced type must derive from.
    pub fn new(
        name: impl Into<String>,
        id: ViewId,
        slot: ValueSlot,
        indirection: Indirection,
        class: ObjectRef,
        meta_class: Option<ObjectRef>,
    ) -> Self {
        Self {
            label: Label::new(name, id),
            slot,
            indirection,
            class,
            meta_class,
            link: ObjectLink::new(),
            identifier: None,
        }
    }

    /// Which runtime table the identifier lives in.
    pub fn indirection(&self) -> Indirection {
        self.indirection
    }

    /// Display identity as of the last refresh.
    pub fn display(&self) -> &str {
        self.link.display()
    }

    /// Raw identifier as of the last refresh, when set.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Pending failure message, if any.
    pub fn failure(&self) -> Option<&str> {
        self.link.failure()
    }

    fn refresh(&mut self, env: &Env<'_>) -> bool {
        let Some(address) = self.slot.live_address(env.reflection) else {
            return false;
        };
        let object = env
            .reflection
            .read_indirect(self.indirection, address)
            .unwrap_or(ObjectRef::NULL);
        self.link.update(env.reflection, object);
        self.identifier = env
            .reflection
            .indirect_identifier(self.indirection, address)
            .ok()
            .filter(|id| !id.is_empty());
        true
    }

    fn try_commit(&self, env: &Env<'_>, settings: &Settings, text: &str) -> Result<ObjectRef, EditError> {
        if !settings.editable {
            return Err(EditError::NotEditable);
        }
        let address = self.slot.live_address(env.reflection).ok_or(EditError::Stale)?;
        let object = resolve_query(env.reflection, text)?;
        if !object.is_null() {
            check_instance(env.reflection, object, self.class)?;
            if let Some(meta_class) = self.meta_class {
                check_subclass(env.reflection, object, meta_class)?;
            }
        }
        env.reflection.write_indirect(self.indirection, address, object)?;
        Ok(object)
    }
}

impl View for IndirectRefView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, _expand: ForceExpand, _show_all: bool) {
        if !self.refresh(&cx.env) {
            draw_stale(cx.ui, &self.label);
            return;
        }
        begin_row(cx.ui, &self.label);
        if cx.settings.editable {
            if let Some(text) = self.link.draw_editable(cx, self.label.ui_id()) {
                let env = cx.env;
                let _ = self.commit(&env, cx.settings, &text);
            }
        } else if let (true, Some(identifier)) = (self.link.object().is_null(), &self.identifier) {
            cx.ui.text_disabled(identifier);
        } else {
            self.link.draw(cx, self.label.ui_id());
        }
        self.link.draw_notice(cx, &self.label.sub_id("notice"));
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        if self.label.passes(cx.filter) {
            return true;
        }
        if !self.refresh(&cx.env) {
            return false;
        }
        self.link.passes_filter(cx.filter)
            || self.identifier.as_deref().is_some_and(|id| cx.passes(id))
    }

    fn commit(&mut self, env: &Env<'_>, settings: &Settings, text: &str) -> Result<(), EditError> {
        match self.try_commit(env, settings, text) {
            Ok(object) => {
                trace!(field = self.label.name(), %object, kind = ?self.indirection, "reference committed");
                self.link.update(env.reflection, object);
                Ok(())
            }
            Err(err) => {
                debug!(field = self.label.name(), %err, "reference edit rejected");
                self.link.fail(&err);
                Err(err)
            }
        }
    }
}
