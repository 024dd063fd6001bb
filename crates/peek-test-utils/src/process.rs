//! A fake foreign process: flat byte memory plus a scripted reflection
//! oracle that describes the objects living in it.
//!
//! Objects are laid out with a 40 byte header:
//!
//! ```text
//! 0   vtable      (unused, zero)
//! 8   flags       u32
//! 12  index       i32
//! 16  class       pointer
//! 24  name        u64 name id
//! 32  outer       pointer
//! 40  declared fields
//! ```
//!
//! Strings, indirect references and names are stored as 8 byte handles
//! into side tables, the way the real runtime keeps them out of line.
//! Dynamic arrays use the `(data, count: i32, max: i32)` header.

use std::cell::RefCell;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use peek_core::{
    Address, DeclarationKind, DelegateBinding, EnumDef, FieldDescriptor, FieldKind, Generation,
    Indirection, MemoryError, MemoryLayout, NativeLayout, ObjectRef, PointerWidth, ProcessMemory,
    Reflection, ScalarKind, StringKind, TypeTag,
};

/// First address handed out by the allocator.
pub const BASE_ADDRESS: usize = 0x1000;
/// Size of the common object header.
pub const HEADER_SIZE: usize = 40;
/// Offset of the flags word.
pub const FLAGS_OFFSET: usize = 8;
/// Offset of the internal index.
pub const INDEX_OFFSET: usize = 12;
/// Offset of the class pointer.
pub const CLASS_OFFSET: usize = 16;
/// Offset of the name id.
pub const NAME_OFFSET: usize = 24;
/// Offset of the outer pointer.
pub const OUTER_OFFSET: usize = 32;
/// Size of a single delegate binding: object pointer plus name id.
pub const DELEGATE_SIZE: usize = 16;
/// Size of a dynamic array header.
pub const ARRAY_HEADER_SIZE: usize = 16;
/// Size of a string, name or indirect handle.
pub const HANDLE_SIZE: usize = 8;
/// Pointer width of the fake process.
pub const POINTER_SIZE: usize = 8;

#[derive(Clone, Debug)]
struct ObjectInfo {
    class: ObjectRef,
    name: String,
    outer: ObjectRef,
    generation: u64,
}

#[derive(Clone, Debug, Default)]
struct TypeInfo {
    super_type: ObjectRef,
    fields: Vec<FieldDescriptor>,
    size: usize,
}

#[derive(Clone, Debug)]
struct IndirectEntry {
    target: ObjectRef,
    identifier: String,
}

struct State {
    bytes: Vec<u8>,
    objects: IndexMap<ObjectRef, ObjectInfo>,
    types: IndexMap<ObjectRef, TypeInfo>,
    names: IndexSet<String>,
    strings: IndexMap<u64, String>,
    indirect: IndexMap<u64, IndirectEntry>,
    interfaces: IndexMap<(ObjectRef, ObjectRef), usize>,
    native: IndexMap<ObjectRef, Vec<FieldDescriptor>>,
    next_generation: u64,
    next_handle: u64,
    spawned: i32,
    destroyed: Vec<Address>,
}

impl State {
    fn new() -> Self {
        let mut names = IndexSet::new();
        names.insert("None".to_string());
        Self {
            bytes: Vec::new(),
            objects: IndexMap::new(),
            types: IndexMap::new(),
            names,
            strings: IndexMap::new(),
            indirect: IndexMap::new(),
            interfaces: IndexMap::new(),
            native: IndexMap::new(),
            next_generation: 0,
            next_handle: 0,
            spawned: 0,
            destroyed: Vec::new(),
        }
    }

    // ── Memory ──────────────────────────────────────────────────

    fn alloc(&mut self, size: usize) -> Address {
        let start = self.bytes.len().next_multiple_of(8);
        self.bytes.resize(start + size.max(8), 0);
        Address(BASE_ADDRESS + start)
    }

    fn range(&self, address: Address, len: usize) -> Option<std::ops::Range<usize>> {
        let start = address.0.checked_sub(BASE_ADDRESS)?;
        let end = start.checked_add(len)?;
        (end <= self.bytes.len()).then_some(start..end)
    }

    fn load(&self, address: Address, buf: &mut [u8]) -> Result<(), MemoryError> {
        let range = self.range(address, buf.len()).ok_or(MemoryError::Unreadable {
            address,
            len: buf.len(),
        })?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn store(&mut self, address: Address, bytes: &[u8]) -> Result<(), MemoryError> {
        let range = self.range(address, bytes.len()).ok_or(MemoryError::Unwritable {
            address,
            len: bytes.len(),
        })?;
        self.bytes[range].copy_from_slice(bytes);
        Ok(())
    }

    fn load_u64(&self, address: Address) -> Result<u64, MemoryError> {
        let mut buf = [0u8; 8];
        self.load(address, &mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn load_i32(&self, address: Address) -> Result<i32, MemoryError> {
        let mut buf = [0u8; 4];
        self.load(address, &mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    fn poke_u64(&mut self, address: Address, value: u64) {
        self.store(address, &value.to_le_bytes())
            .expect("fake process write out of range");
    }

    fn poke_i32(&mut self, address: Address, value: i32) {
        self.store(address, &value.to_le_bytes())
            .expect("fake process write out of range");
    }

    fn poke_pointer(&mut self, address: Address, value: Address) {
        self.poke_u64(address, value.0 as u64);
    }

    // ── Objects ─────────────────────────────────────────────────

    fn intern(&mut self, text: &str) -> u64 {
        self.names.insert_full(text.to_string()).0 as u64
    }

    fn handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn spawn(&mut self, class: ObjectRef, name: &str, outer: ObjectRef, size: usize) -> ObjectRef {
        let address = self.alloc(size.max(HEADER_SIZE));
        let object = ObjectRef::from(address);
        self.next_generation += 1;
        let name_id = self.intern(name);
        let index = self.spawned;
        self.spawned += 1;
        self.poke_i32(address.offset(INDEX_OFFSET), index);
        self.poke_pointer(address.offset(CLASS_OFFSET), class.address());
        self.poke_u64(address.offset(NAME_OFFSET), name_id);
        self.poke_pointer(address.offset(OUTER_OFFSET), outer.address());
        self.objects.insert(
            object,
            ObjectInfo {
                class,
                name: name.to_string(),
                outer,
                generation: self.next_generation,
            },
        );
        object
    }

    fn set_class(&mut self, object: ObjectRef, class: ObjectRef) {
        if let Some(info) = self.objects.get_mut(&object) {
            info.class = class;
        }
        self.poke_pointer(object.address().offset(CLASS_OFFSET), class.address());
    }

    fn is_live(&self, object: ObjectRef) -> bool {
        self.objects.contains_key(&object)
    }

    fn name_of(&self, object: ObjectRef) -> String {
        self.objects
            .get(&object)
            .map_or_else(|| "None".to_string(), |info| info.name.clone())
    }

    fn path_name(&self, object: ObjectRef) -> String {
        let mut parts = Vec::new();
        let mut current = object;
        while let Some(info) = self.objects.get(&current) {
            parts.push(info.name.as_str());
            if parts.len() > 64 {
                break;
            }
            current = info.outer;
        }
        parts.reverse();
        parts.join(".")
    }

    fn chain(&self, ty: ObjectRef) -> Vec<ObjectRef> {
        let mut chain = Vec::new();
        let mut current = ty;
        while !current.is_null() && !chain.contains(&current) {
            chain.push(current);
            current = self.types.get(&current).map_or(ObjectRef::NULL, |t| t.super_type);
        }
        chain
    }

    fn class_of(&self, object: ObjectRef) -> ObjectRef {
        self.objects.get(&object).map_or(ObjectRef::NULL, |info| info.class)
    }

    fn add_property(&mut self, ty: ObjectRef, mut field: FieldDescriptor) -> usize {
        let info = self.types.get_mut(&ty).expect("add_property on an undefined type");
        let size = field.element_size * field.array_dim.max(1);
        let align = field.element_size.clamp(1, 8).next_power_of_two();
        let offset = info.size.next_multiple_of(align);
        info.size = offset + size;
        field.offset = offset;
        info.fields.push(field);
        offset
    }
}

/// A fake foreign process.
///
/// Implements both [`ProcessMemory`] and [`Reflection`]. Tests build
/// classes and objects through the setup methods, hand the process to
/// the inspector as both collaborators, and then play the foreign
/// runtime by poking memory, reallocating arrays, or destroying objects
/// between cycles.
pub struct FakeProcess {
    state: RefCell<State>,
    object_class: ObjectRef,
    class_class: ObjectRef,
    script_struct_class: ObjectRef,
    function_class: ObjectRef,
    enum_class: ObjectRef,
    interface_class: ObjectRef,
}

impl Default for FakeProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeProcess {
    /// A process holding only the bootstrap classes.
    pub fn new() -> Self {
        let mut state = State::new();
        let object_class = state.spawn(ObjectRef::NULL, "Object", ObjectRef::NULL, HEADER_SIZE);
        let class_class = state.spawn(ObjectRef::NULL, "Class", ObjectRef::NULL, HEADER_SIZE);
        state.set_class(object_class, class_class);
        state.set_class(class_class, class_class);
        state.types.insert(
            object_class,
            TypeInfo {
                super_type: ObjectRef::NULL,
                fields: Vec::new(),
                size: HEADER_SIZE,
            },
        );
        state.types.insert(
            class_class,
            TypeInfo {
                super_type: object_class,
                fields: Vec::new(),
                size: HEADER_SIZE,
            },
        );

        let mut process = Self {
            state: RefCell::new(state),
            object_class,
            class_class,
            script_struct_class: ObjectRef::NULL,
            function_class: ObjectRef::NULL,
            enum_class: ObjectRef::NULL,
            interface_class: ObjectRef::NULL,
        };
        process.script_struct_class = process.define_class("ScriptStruct", object_class);
        process.function_class = process.define_class("Function", process.script_struct_class);
        process.enum_class = process.define_class("Enum", object_class);
        process.interface_class = process.define_class("Interface", object_class);
        process
    }

    /// The memory layout matching this process.
    pub fn layout(&self) -> MemoryLayout {
        MemoryLayout::new(PointerWidth::Eight)
    }

    /// Root class of every object.
    pub fn object_class(&self) -> ObjectRef {
        self.object_class
    }

    /// Class of every class.
    pub fn class_class(&self) -> ObjectRef {
        self.class_class
    }

    /// Class of struct definitions.
    pub fn script_struct_class(&self) -> ObjectRef {
        self.script_struct_class
    }

    /// Class of function definitions.
    pub fn function_class(&self) -> ObjectRef {
        self.function_class
    }

    /// Class of enum definitions.
    pub fn enum_class(&self) -> ObjectRef {
        self.enum_class
    }

    /// Base of every interface.
    pub fn interface_class(&self) -> ObjectRef {
        self.interface_class
    }

    // ── Type setup ──────────────────────────────────────────────

    /// Define a class deriving from `super_class`.
    pub fn define_class(&self, name: &str, super_class: ObjectRef) -> ObjectRef {
        let mut state = self.state.borrow_mut();
        let class = state.spawn(self.class_class, name, ObjectRef::NULL, HEADER_SIZE);
        let size = state.types.get(&super_class).map_or(HEADER_SIZE, |t| t.size);
        state.types.insert(
            class,
            TypeInfo {
                super_type: super_class,
                fields: Vec::new(),
                size,
            },
        );
        class
    }

    /// Define an interface type.
    pub fn define_interface(&self, name: &str) -> ObjectRef {
        self.define_class(name, self.interface_class)
    }

    /// Make instances of `class` implement `interface` at `offset`.
    pub fn implement_interface(&self, class: ObjectRef, interface: ObjectRef, offset: usize) {
        self.state
            .borrow_mut()
            .interfaces
            .insert((class, interface), offset);
    }

    /// Define a struct type. Its fields start at offset 0.
    pub fn define_struct(&self, name: &str) -> ObjectRef {
        let mut state = self.state.borrow_mut();
        let def = state.spawn(self.script_struct_class, name, ObjectRef::NULL, HEADER_SIZE);
        state.types.insert(def, TypeInfo::default());
        def
    }

    /// Define a function on `owner` and declare it there.
    pub fn define_function(&self, owner: ObjectRef, name: &str) -> ObjectRef {
        let function = {
            let mut state = self.state.borrow_mut();
            let function = state.spawn(self.function_class, name, owner, HEADER_SIZE);
            state.types.insert(function, TypeInfo::default());
            function
        };
        self.add_declaration(
            owner,
            FieldDescriptor::declaration(name, function, DeclarationKind::Function),
        );
        function
    }

    /// Define an enumeration.
    pub fn define_enum<S: Into<String>>(
        &self,
        name: &str,
        entries: impl IntoIterator<Item = (S, i64)>,
    ) -> Arc<EnumDef> {
        let object = self
            .state
            .borrow_mut()
            .spawn(self.enum_class, name, ObjectRef::NULL, HEADER_SIZE);
        Arc::new(EnumDef::new(object, name, entries))
    }

    /// Append a property to `ty`. Returns the assigned offset.
    pub fn add_field(&self, ty: ObjectRef, name: &str, tag: TypeTag, element_size: usize) -> usize {
        self.add_property(ty, FieldDescriptor::property(name, tag, 0, element_size))
    }

    /// Append a fully specified property to `ty`; its offset is assigned
    /// here. Returns the assigned offset.
    pub fn add_property(&self, ty: ObjectRef, field: FieldDescriptor) -> usize {
        self.state.borrow_mut().add_property(ty, field)
    }

    /// Append a declaration to `ty`.
    pub fn add_declaration(&self, ty: ObjectRef, field: FieldDescriptor) {
        let mut state = self.state.borrow_mut();
        if let Some(info) = state.types.get_mut(&ty) {
            info.fields.push(field);
        }
    }

    /// Attach a kind-specific native attribute to `object`.
    pub fn add_native_field(&self, object: ObjectRef, field: FieldDescriptor) {
        self.state
            .borrow_mut()
            .native
            .entry(object)
            .or_default()
            .push(field);
    }

    /// Instance size of `ty`.
    pub fn type_size(&self, ty: ObjectRef) -> usize {
        self.state.borrow().types.get(&ty).map_or(0, |t| t.size)
    }

    // ── Objects ─────────────────────────────────────────────────

    /// Create an instance of `class`, zero-initialized.
    pub fn spawn(&self, class: ObjectRef, name: &str, outer: ObjectRef) -> ObjectRef {
        let size = self.type_size(class);
        self.state.borrow_mut().spawn(class, name, outer, size)
    }

    /// Destroy `object`. Its memory stays mapped but its generation is gone.
    pub fn destroy(&self, object: ObjectRef) {
        self.state.borrow_mut().objects.shift_remove(&object);
    }

    /// Store `text` in the string at `address`.
    pub fn set_string(&self, address: Address, text: &str) {
        let mut state = self.state.borrow_mut();
        let handle = state.handle();
        state.strings.insert(handle, text.to_string());
        state.poke_u64(address, handle);
    }

    /// Store the name `text` at `address`.
    pub fn set_name(&self, address: Address, text: &str) {
        let mut state = self.state.borrow_mut();
        let id = state.intern(text);
        state.poke_u64(address, id);
    }

    /// Store an indirect reference at `address`. A null `target` with a
    /// non-empty identifier is an unresolved reference.
    pub fn set_indirect(&self, address: Address, target: ObjectRef, identifier: &str) {
        let mut state = self.state.borrow_mut();
        let handle = state.handle();
        state.indirect.insert(
            handle,
            IndirectEntry {
                target,
                identifier: identifier.to_string(),
            },
        );
        state.poke_u64(address, handle);
    }

    /// Bind the delegate at `address` to `function_name` on `object`.
    pub fn bind_delegate(&self, address: Address, object: ObjectRef, function_name: &str) {
        let mut state = self.state.borrow_mut();
        let id = state.intern(function_name);
        state.poke_pointer(address, object.address());
        state.poke_u64(address.offset(POINTER_SIZE), id);
    }

    /// Read a pointer-sized value.
    pub fn pointer_at(&self, address: Address) -> ObjectRef {
        let state = self.state.borrow();
        state
            .load_u64(address)
            .map_or(ObjectRef::NULL, |raw| ObjectRef(raw as usize))
    }

    // ── Arrays ──────────────────────────────────────────────────

    /// Allocate `len` zeroed elements and point the header at `header` at them.
    pub fn init_array(&self, header: Address, element_size: usize, len: usize) -> Address {
        let mut state = self.state.borrow_mut();
        let data = state.alloc(element_size * len);
        let count = i32::try_from(len).expect("array too long");
        state.poke_pointer(header, data);
        state.poke_i32(header.offset(POINTER_SIZE), count);
        state.poke_i32(header.offset(POINTER_SIZE + 4), count);
        data
    }

    /// Move the array's elements to fresh storage, keeping the count.
    pub fn realloc_array(&self, header: Address, element_size: usize) -> Address {
        let mut state = self.state.borrow_mut();
        let old = Address(state.load_u64(header).expect("array header") as usize);
        let count = state.load_i32(header.offset(POINTER_SIZE)).expect("array header");
        let max = state.load_i32(header.offset(POINTER_SIZE + 4)).expect("array header");
        let bytes = element_size * usize::try_from(max.max(0)).unwrap_or(0);
        let data = state.alloc(bytes);
        let live = element_size * usize::try_from(count.max(0)).unwrap_or(0);
        let mut buf = vec![0u8; live];
        state.load(old, &mut buf).expect("array data");
        state.store(data, &buf).expect("array data");
        state.poke_pointer(header, data);
        data
    }

    /// Current data pointer of the array at `header`.
    pub fn array_data(&self, header: Address) -> Address {
        self.pointer_at(header).address()
    }

    /// Current count of the array at `header`.
    pub fn array_len(&self, header: Address) -> i32 {
        self.state
            .borrow()
            .load_i32(header.offset(POINTER_SIZE))
            .unwrap_or(-1)
    }

    /// Addresses passed to [`Reflection::destroy_value`], in call order.
    pub fn destroyed_values(&self) -> Vec<Address> {
        self.state.borrow().destroyed.clone()
    }
}

impl ProcessMemory for FakeProcess {
    fn read(&self, address: Address, buf: &mut [u8]) -> Result<(), MemoryError> {
        if address.is_null() {
            return Err(MemoryError::NullPointer);
        }
        self.state.borrow().load(address, buf)
    }

    fn write(&self, address: Address, bytes: &[u8]) -> Result<(), MemoryError> {
        if address.is_null() {
            return Err(MemoryError::NullPointer);
        }
        self.state.borrow_mut().store(address, bytes)
    }
}

impl Reflection for FakeProcess {
    fn generation(&self, object: ObjectRef) -> Option<Generation> {
        self.state
            .borrow()
            .objects
            .get(&object)
            .map(|info| Generation(info.generation))
    }

    fn class_of(&self, object: ObjectRef) -> ObjectRef {
        self.state.borrow().class_of(object)
    }

    fn name_of(&self, object: ObjectRef) -> String {
        self.state.borrow().name_of(object)
    }

    fn path_name(&self, object: ObjectRef) -> String {
        self.state.borrow().path_name(object)
    }

    fn super_of(&self, ty: ObjectRef) -> ObjectRef {
        self.state
            .borrow()
            .types
            .get(&ty)
            .map_or(ObjectRef::NULL, |t| t.super_type)
    }

    fn declared_fields(&self, ty: ObjectRef) -> Vec<FieldDescriptor> {
        self.state
            .borrow()
            .types
            .get(&ty)
            .map(|t| t.fields.clone())
            .unwrap_or_default()
    }

    fn native_layout(&self) -> NativeLayout {
        NativeLayout {
            flags_offset: FLAGS_OFFSET,
            flags_kind: ScalarKind::U32,
            internal_index_offset: INDEX_OFFSET,
            class_offset: CLASS_OFFSET,
            name_offset: NAME_OFFSET,
            outer_offset: OUTER_OFFSET,
            object_class: self.object_class,
            class_class: self.class_class,
        }
    }

    fn native_fields(&self, object: ObjectRef) -> Vec<FieldDescriptor> {
        self.state
            .borrow()
            .native
            .get(&object)
            .cloned()
            .unwrap_or_default()
    }

    fn find_object(&self, class_name: &str, path: &str) -> Option<ObjectRef> {
        let state = self.state.borrow();
        state.objects.keys().copied().find(|object| {
            state.path_name(*object) == path
                && state
                    .chain(state.class_of(*object))
                    .iter()
                    .any(|class| state.name_of(*class) == class_name)
        })
    }

    fn interface_offset(&self, object: ObjectRef, interface: ObjectRef) -> Option<usize> {
        let state = self.state.borrow();
        state
            .chain(state.class_of(object))
            .into_iter()
            .find_map(|class| state.interfaces.get(&(class, interface)).copied())
    }

    fn find_function(&self, object: ObjectRef, name: &str) -> ObjectRef {
        let state = self.state.borrow();
        state
            .chain(state.class_of(object))
            .into_iter()
            .filter_map(|class| state.types.get(&class))
            .flat_map(|ty| ty.fields.iter())
            .find(|field| {
                field.name == name
                    && matches!(field.kind, FieldKind::Declaration(DeclarationKind::Function))
            })
            .map_or(ObjectRef::NULL, |field| field.object)
    }

    fn read_indirect(&self, _kind: Indirection, address: Address) -> Result<ObjectRef, MemoryError> {
        let state = self.state.borrow();
        let handle = state.load_u64(address)?;
        Ok(state
            .indirect
            .get(&handle)
            .map(|entry| entry.target)
            .filter(|target| state.is_live(*target))
            .unwrap_or(ObjectRef::NULL))
    }

    fn write_indirect(
        &self,
        kind: Indirection,
        address: Address,
        object: ObjectRef,
    ) -> Result<(), MemoryError> {
        let mut state = self.state.borrow_mut();
        let identifier = match (kind, object.is_null()) {
            (_, true) => String::new(),
            (Indirection::Soft, false) => state.path_name(object),
            (Indirection::Lazy, false) => format!("{:032X}", object.0),
            (Indirection::Weak, false) => format!("{}", state.objects.get_index_of(&object).unwrap_or(0)),
        };
        let handle = state.handle();
        state.indirect.insert(
            handle,
            IndirectEntry {
                target: object,
                identifier,
            },
        );
        state.store(address, &handle.to_le_bytes())
    }

    fn indirect_identifier(&self, _kind: Indirection, address: Address) -> Result<String, MemoryError> {
        let state = self.state.borrow();
        let handle = state.load_u64(address)?;
        Ok(state
            .indirect
            .get(&handle)
            .map(|entry| entry.identifier.clone())
            .unwrap_or_default())
    }

    fn read_string(&self, _kind: StringKind, address: Address) -> Result<String, MemoryError> {
        let state = self.state.borrow();
        let handle = state.load_u64(address)?;
        Ok(state.strings.get(&handle).cloned().unwrap_or_default())
    }

    fn write_string(&self, _kind: StringKind, address: Address, value: &str) -> Result<(), MemoryError> {
        let mut state = self.state.borrow_mut();
        state.load_u64(address)?;
        let handle = state.handle();
        state.strings.insert(handle, value.to_string());
        state.store(address, &handle.to_le_bytes())
    }

    fn name_id(&self, address: Address) -> Result<u64, MemoryError> {
        self.state.borrow().load_u64(address)
    }

    fn name_text(&self, id: u64) -> Option<String> {
        let index = usize::try_from(id).ok()?;
        self.state.borrow().names.get_index(index).cloned()
    }

    fn write_name(&self, address: Address, text: &str) -> Result<(), MemoryError> {
        let mut state = self.state.borrow_mut();
        state.load_u64(address)?;
        let id = state.intern(text);
        state.store(address, &id.to_le_bytes())
    }

    fn read_delegate(&self, address: Address) -> Result<DelegateBinding, MemoryError> {
        let state = self.state.borrow();
        let object = ObjectRef(state.load_u64(address)? as usize);
        let id = state.load_u64(address.offset(POINTER_SIZE))?;
        let function_name = match id {
            0 => String::new(),
            id => state
                .names
                .get_index(id as usize)
                .cloned()
                .unwrap_or_default(),
        };
        Ok(DelegateBinding {
            object: if state.is_live(object) {
                object
            } else {
                ObjectRef::NULL
            },
            function_name,
        })
    }

    fn resize_array(
        &self,
        header: Address,
        inner: &FieldDescriptor,
        new_len: usize,
    ) -> Result<(), MemoryError> {
        let mut state = self.state.borrow_mut();
        let stride = inner.element_size;
        let data = Address(state.load_u64(header)? as usize);
        let count = usize::try_from(state.load_i32(header.offset(POINTER_SIZE))?).unwrap_or(0);
        let max = usize::try_from(state.load_i32(header.offset(POINTER_SIZE + 4))?).unwrap_or(0);
        let new_count = i32::try_from(new_len).map_err(|_| MemoryError::Allocation { requested: new_len })?;

        if new_len > max {
            let fresh = state.alloc(stride * new_len);
            let mut buf = vec![0u8; stride * count];
            state.load(data, &mut buf)?;
            state.store(fresh, &buf)?;
            state.store(header, &(fresh.0 as u64).to_le_bytes())?;
            state.store(header.offset(POINTER_SIZE + 4), &new_count.to_le_bytes())?;
        } else if new_len > count {
            let zeros = vec![0u8; stride * (new_len - count)];
            state.store(data.element(count, stride), &zeros)?;
        }
        state.store(header.offset(POINTER_SIZE), &new_count.to_le_bytes())
    }

    fn destroy_value(&self, _inner: &FieldDescriptor, address: Address) -> Result<(), MemoryError> {
        self.state.borrow_mut().destroyed.push(address);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peek_core::MemoryExt;

    #[test]
    fn fields_are_laid_out_after_the_header() {
        let process = FakeProcess::new();
        let actor = process.define_class("Actor", process.object_class());
        let health = process.add_field(actor, "Health", TypeTag::Scalar(ScalarKind::I32), 4);
        let speed = process.add_field(actor, "Speed", TypeTag::Scalar(ScalarKind::F64), 8);
        assert_eq!(health, HEADER_SIZE);
        assert_eq!(speed, HEADER_SIZE + 8);
        assert_eq!(process.type_size(actor), HEADER_SIZE + 16);
    }

    #[test]
    fn objects_resolve_by_class_and_path() {
        let process = FakeProcess::new();
        let actor = process.define_class("Actor", process.object_class());
        let level = process.spawn(process.object_class(), "Level", ObjectRef::NULL);
        let door = process.spawn(actor, "Door", level);
        assert_eq!(process.path_name(door), "Level.Door");
        assert_eq!(process.find_object("Actor", "Level.Door"), Some(door));
        assert_eq!(process.find_object("Object", "Level.Door"), Some(door));
        assert_eq!(process.find_object("Class", "Level.Door"), None);
    }

    #[test]
    fn header_mirrors_reflection() {
        let process = FakeProcess::new();
        let actor = process.define_class("Actor", process.object_class());
        let door = process.spawn(actor, "Door", ObjectRef::NULL);
        let class = process
            .read_pointer(door.address().offset(CLASS_OFFSET), &process.layout())
            .unwrap();
        assert_eq!(ObjectRef::from(class), actor);
        let name = process.name_id(door.address().offset(NAME_OFFSET)).unwrap();
        assert_eq!(process.name_text(name).as_deref(), Some("Door"));
    }

    #[test]
    fn destroyed_objects_lose_their_generation() {
        let process = FakeProcess::new();
        let door = process.spawn(process.object_class(), "Door", ObjectRef::NULL);
        assert!(process.generation(door).is_some());
        process.destroy(door);
        assert!(process.generation(door).is_none());
    }

    #[test]
    fn resize_past_capacity_moves_storage() {
        let process = FakeProcess::new();
        let holder = process.define_class("Holder", process.object_class());
        let offset = process.add_field(
            holder,
            "Items",
            TypeTag::Array {
                inner: Box::new(FieldDescriptor::element(TypeTag::Scalar(ScalarKind::I32), 4)),
            },
            ARRAY_HEADER_SIZE,
        );
        let object = process.spawn(holder, "H", ObjectRef::NULL);
        let header = object.address().offset(offset);
        let data = process.init_array(header, 4, 2);
        process.write_i32(data, 7).unwrap();
        let inner = FieldDescriptor::element(TypeTag::Scalar(ScalarKind::I32), 4);
        process.resize_array(header, &inner, 3).unwrap();
        let moved = process.array_data(header);
        assert_ne!(moved, data);
        assert_eq!(process.array_len(header), 3);
        assert_eq!(process.read_i32(moved).unwrap(), 7);
        assert_eq!(process.read_i32(moved.offset(8)).unwrap(), 0);
    }
}
