//! Dynamic arrays and multicast delegates.
//!
//! A container's backing store is a foreign array header
//! `(data, count, max)`. The runtime may reallocate `data` between any
//! two cycles, so the [`ChildList`] compares the data pointer by
//! identity every cycle and throws every child away when it moves, even
//! if the length is unchanged. Otherwise children track indices: growth
//! materializes new children, shrinking truncates.
//!
//! Removals are batched per cycle. Candidates are sorted, then each index
//! is shifted down by the number of removals already applied, so that
//! removing `{1, 3}` from five elements keeps original elements 0, 2, 4.

use peek_core::{
    Address, FieldDescriptor, IdAllocator, MemoryError, MemoryExt, ObjectRef, TypeTag, ValueSlot,
    ViewId,
};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::context::{DrawContext, Env, FilterContext};
use crate::dispatch::element_view;
use crate::settings::ForceExpand;
use crate::view::{draw_stale, BoxedView, ExpandState, Label, View};

// ── Backing store ───────────────────────────────────────────────

/// A foreign dynamic array header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayHeader {
    /// Element storage.
    pub data: Address,
    /// Live element count.
    pub count: i32,
    /// Allocated capacity.
    pub max: i32,
}

impl ArrayHeader {
    /// Read the header at `address`.
    pub fn read(env: &Env<'_>, address: Address) -> Result<Self, MemoryError> {
        let layout = &env.layout;
        Ok(Self {
            data: env.memory.read_pointer(address, layout)?,
            count: env.memory.read_i32(address.offset(layout.array_count_offset()))?,
            max: env.memory.read_i32(address.offset(layout.array_max_offset()))?,
        })
    }

    /// Element count, or `None` if the header is inconsistent.
    pub fn len(&self) -> Option<usize> {
        if self.count < 0 || self.count > self.max || (self.data.is_null() && self.count != 0) {
            return None;
        }
        usize::try_from(self.count).ok()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

// ── Sync engine ─────────────────────────────────────────────────

/// Child views of a container, kept in step with its backing store.
#[derive(Default)]
pub struct ChildList {
    views: Vec<BoxedView>,
    last_data: Option<Address>,
}

impl ChildList {
    /// An empty list that has not observed any store yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the children in line with a store of `len` elements at
    /// `data`. `materialize` builds the child for one index.
    ///
    /// Returns whether the child list changed.
    pub fn sync<F>(&mut self, data: Address, len: usize, mut materialize: F) -> bool
    where
        F: FnMut(usize) -> BoxedView,
    {
        let mut changed = false;
        if self.last_data.is_some_and(|last| last != data) {
            debug!(
                old = %self.last_data.unwrap_or(Address::NULL),
                new = %data,
                dropped = self.views.len(),
                "container reallocated"
            );
            changed = !self.views.is_empty();
            self.views.clear();
        }
        self.last_data = Some(data);

        let current = self.views.len();
        if len < current {
            trace!(from = current, to = len, "container shrank");
            self.views.truncate(len);
            changed = true;
        } else if len > current {
            trace!(from = current, to = len, "container grew");
            self.views.extend((current..len).map(&mut materialize));
            changed = true;
        }
        changed
    }

    /// Forget every child and the observed store.
    pub fn clear(&mut self) {
        self.views.clear();
        self.last_data = None;
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether there are no children.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// The children, in index order.
    pub fn views(&self) -> &[BoxedView] {
        &self.views
    }

    /// Mutable access to the children.
    pub fn views_mut(&mut self) -> &mut [BoxedView] {
        &mut self.views
    }
}

// ── Editing ─────────────────────────────────────────────────────

/// Indices to remove, in order, each adjusted for the removals before it.
pub fn removal_plan(candidates: &[usize]) -> SmallVec<[usize; 4]> {
    let mut sorted: SmallVec<[usize; 4]> = candidates.iter().copied().collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
        .iter()
        .enumerate()
        .map(|(applied, index)| index - applied)
        .collect()
}

/// Remove `candidates` from the array whose header is at `header_address`.
///
/// Each removed element is destroyed, later elements are moved down one
/// slot, and the count is decremented. Returns the final length.
pub fn remove_elements(
    env: &Env<'_>,
    header_address: Address,
    inner: &FieldDescriptor,
    candidates: &[usize],
) -> Result<usize, MemoryError> {
    let header = ArrayHeader::read(env, header_address)?;
    let Some(mut len) = header.len() else {
        return Err(MemoryError::Unreadable {
            address: header_address,
            len: env.layout.array_header_size(),
        });
    };
    let stride = inner.element_size;
    let count_address = header_address.offset(env.layout.array_count_offset());

    for index in removal_plan(candidates) {
        if index >= len {
            break;
        }
        let at = header.data.element(index, stride);
        env.reflection.destroy_value(inner, at)?;
        if index + 1 < len {
            let next = header.data.element(index + 1, stride);
            env.memory.copy_within(next, at, (len - index - 1) * stride)?;
        }
        len -= 1;
        let count = i32::try_from(len).map_err(|_| MemoryError::Unwritable {
            address: count_address,
            len: 4,
        })?;
        env.memory.write_i32(count_address, count)?;
        trace!(index, len, "array element removed");
    }
    Ok(len)
}

/// Grow the array whose header is at `header_address` by one
/// default-initialized element. Returns the new length.
///
/// The length is read from the store, so removals applied earlier in the
/// same cycle are accounted for.
pub fn append_element(
    env: &Env<'_>,
    header_address: Address,
    inner: &FieldDescriptor,
) -> Result<usize, MemoryError> {
    let Some(len) = ArrayHeader::read(env, header_address)?.len() else {
        return Err(MemoryError::Unreadable {
            address: header_address,
            len: env.layout.array_header_size(),
        });
    };
    env.reflection.resize_array(header_address, inner, len + 1)?;
    Ok(len + 1)
}

// ── View ────────────────────────────────────────────────────────

/// A dynamic array, or a multicast delegate's binding list.
pub struct ContainerView {
    label: Label,
    header: ValueSlot,
    inner: FieldDescriptor,
    children: ChildList,
    expand: ExpandState,
}

impl ContainerView {
    /// Bind an array of `inner` elements whose header is at `header`.
    pub fn new(name: impl Into<String>, id: ViewId, header: ValueSlot, inner: FieldDescriptor) -> Self {
        Self {
            label: Label::new(name, id),
            header,
            inner,
            children: ChildList::new(),
            expand: ExpandState::default(),
        }
    }

    /// Bind a multicast delegate: an array of `binding_size` byte bindings.
    pub fn multicast(
        name: impl Into<String>,
        id: ViewId,
        header: ValueSlot,
        signature: ObjectRef,
        binding_size: usize,
    ) -> Self {
        let inner = FieldDescriptor::element(TypeTag::Delegate { signature }, binding_size);
        Self::new(name, id, header, inner)
    }

    /// Element descriptor.
    pub fn inner(&self) -> &FieldDescriptor {
        &self.inner
    }

    /// Current children, as of the last sync.
    pub fn child_list(&self) -> &ChildList {
        &self.children
    }

    /// Run one sync step against the live store. `None` when the owner is
    /// gone or the header is inconsistent; children are dropped then.
    pub fn sync(&mut self, env: &Env<'_>, ids: &mut IdAllocator) -> Option<ArrayHeader> {
        let header = self
            .header
            .live_address(env.reflection)
            .and_then(|address| ArrayHeader::read(env, address).ok());
        let Some((header, len)) = header.and_then(|h| h.len().map(|len| (h, len))) else {
            self.children.clear();
            return None;
        };
        let guard = self.header.guard();
        let inner = &self.inner;
        self.children.sync(header.data, len, |index| {
            let slot = ValueSlot::new(header.data, guard).element(index, inner.element_size);
            element_view(env, ids, inner, slot, index)
        });
        Some(header)
    }

    fn title(&self) -> String {
        format!("({}) {}", self.children.len(), self.label.name())
    }
}

impl View for ContainerView {
    fn label(&self) -> &Label {
        &self.label
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>, expand: ForceExpand, show_all: bool) {
        let env = cx.env;
        if self.sync(&env, cx.ids).is_none() {
            draw_stale(cx.ui, &self.label);
            return;
        }
        let show_all = show_all || self.label.passes(&cx.settings.filter);
        let force = self.expand.begin(expand);
        cx.ui.row();
        let title = self.title();
        if !cx.ui.tree_node(self.label.ui_id(), &title, force) {
            return;
        }
        let child_expand = self.expand.for_children(expand);
        let editable = cx.settings.editable;
        let mut removals: SmallVec<[usize; 4]> = SmallVec::new();

        for (index, child) in self.children.views_mut().iter_mut().enumerate() {
            if !show_all && !child.passes_filter(&mut cx.filtering()) {
                continue;
            }
            child.draw(cx, child_expand, show_all);
            let remove_id = self.label.sub_id(&format!("remove{index}"));
            if editable && cx.ui.button(&remove_id, "Remove", true) {
                removals.push(index);
            }
        }
        self.expand.end();

        let add = editable && cx.ui.button(&self.label.sub_id("add"), "Add New", true);
        cx.ui.tree_pop();

        let Some(address) = self.header.live_address(env.reflection) else {
            return;
        };
        if !removals.is_empty() {
            match remove_elements(&env, address, &self.inner, &removals) {
                Ok(len) => debug!(field = self.label.name(), removed = removals.len(), len, "array elements removed"),
                Err(err) => debug!(field = self.label.name(), %err, "array removal failed"),
            }
        }
        if add {
            match append_element(&env, address, &self.inner) {
                Ok(len) => trace!(field = self.label.name(), len, "array element added"),
                Err(err) => debug!(field = self.label.name(), %err, "array append failed"),
            }
        }
    }

    fn passes_filter(&mut self, cx: &mut FilterContext<'_>) -> bool {
        if self.label.passes(cx.filter) {
            return true;
        }
        let env = cx.env;
        if self.sync(&env, cx.ids).is_none() {
            return false;
        }
        self.children
            .views_mut()
            .iter_mut()
            .any(|child| child.passes_filter(cx))
    }

    fn children(&self) -> &[BoxedView] {
        self.children.views()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::ConstView;
    use proptest::prelude::*;

    fn rows(ids: &mut IdAllocator) -> impl FnMut(usize) -> BoxedView + '_ {
        move |index| Box::new(ConstView::new(format!("[{index}]"), ids.allocate(), "")) as BoxedView
    }

    fn identities(list: &ChildList) -> Vec<ViewId> {
        list.views().iter().map(|v| v.label().id()).collect()
    }

    #[test]
    fn sync_is_idempotent() {
        let mut ids = IdAllocator::new();
        let mut list = ChildList::new();
        assert!(list.sync(Address(0x1000), 3, rows(&mut ids)));
        let before = identities(&list);
        assert!(!list.sync(Address(0x1000), 3, rows(&mut ids)));
        assert_eq!(identities(&list), before);
    }

    #[test]
    fn moved_store_rebuilds_every_child() {
        let mut ids = IdAllocator::new();
        let mut list = ChildList::new();
        list.sync(Address(0x1000), 3, rows(&mut ids));
        let before = identities(&list);
        assert!(list.sync(Address(0x2000), 3, rows(&mut ids)));
        let after = identities(&list);
        assert_eq!(after.len(), 3);
        assert!(after.iter().all(|id| !before.contains(id)));
    }

    #[test]
    fn grow_keeps_prefix_and_shrink_truncates() {
        let mut ids = IdAllocator::new();
        let mut list = ChildList::new();
        list.sync(Address(0x1000), 2, rows(&mut ids));
        let first = identities(&list);
        list.sync(Address(0x1000), 4, rows(&mut ids));
        assert_eq!(&identities(&list)[..2], &first[..]);
        list.sync(Address(0x1000), 1, rows(&mut ids));
        assert_eq!(identities(&list), vec![first[0]]);
    }

    #[test]
    fn inconsistent_headers_have_no_length() {
        let header = |count, max| ArrayHeader {
            data: Address(0x1000),
            count,
            max,
        };
        assert_eq!(header(2, 4).len(), Some(2));
        assert_eq!(header(-1, 4).len(), None);
        assert_eq!(header(5, 4).len(), None);
        let dangling = ArrayHeader {
            data: Address::NULL,
            count: 1,
            max: 1,
        };
        assert_eq!(dangling.len(), None);
    }

    #[test]
    fn plan_adjusts_for_prior_removals() {
        assert_eq!(removal_plan(&[3, 1]).as_slice(), &[1, 2]);
        assert_eq!(removal_plan(&[0, 0, 1]).as_slice(), &[0, 0]);
    }

    proptest! {
        #[test]
        fn plan_matches_naive_removal(len in 1usize..30, picks in prop::collection::vec(0usize..30, 0..10)) {
            let candidates: Vec<usize> = picks.into_iter().filter(|i| *i < len).collect();
            let mut simulated: Vec<usize> = (0..len).collect();
            for index in removal_plan(&candidates) {
                simulated.remove(index);
            }
            let expected: Vec<usize> = (0..len).filter(|i| !candidates.contains(i)).collect();
            prop_assert_eq!(simulated, expected);
        }
    }
}
