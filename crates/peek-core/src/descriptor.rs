//! Reflected field metadata: descriptors, type tags, enum definitions.
//!
//! A [`FieldDescriptor`] is supplied by the reflection collaborator and
//! never mutated afterwards. Its [`FieldKind`] splits the closed tag set
//! in two: value-bearing properties, which get bound to memory, and
//! declarations (nested types, functions, constants), which do not.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::id::ObjectRef;

// ── Scalars ─────────────────────────────────────────────────────

/// Fixed-width numeric kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Signed 8-bit.
    I8,
    /// Signed 16-bit.
    I16,
    /// Signed 32-bit.
    I32,
    /// Signed 64-bit.
    I64,
    /// Unsigned 8-bit.
    U8,
    /// Unsigned 16-bit.
    U16,
    /// Unsigned 32-bit.
    U32,
    /// Unsigned 64-bit.
    U64,
    /// Single precision float.
    F32,
    /// Double precision float.
    F64,
}

impl ScalarKind {
    /// Every kind, narrowest first.
    pub const ALL: [ScalarKind; 10] = [
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
    ];

    /// Width in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    /// Whether this is a floating-point kind.
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Whether this is a signed integer kind.
    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Reflected type name.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::I8 => "Int8Property",
            Self::I16 => "Int16Property",
            Self::I32 => "IntProperty",
            Self::I64 => "Int64Property",
            Self::U8 => "ByteProperty",
            Self::U16 => "UInt16Property",
            Self::U32 => "UInt32Property",
            Self::U64 => "UInt64Property",
            Self::F32 => "FloatProperty",
            Self::F64 => "DoubleProperty",
        }
    }
}

/// Which of the runtime's string representations a slot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StringKind {
    /// Plain heap string.
    Str,
    /// Localizable display text.
    Text,
}

// ── Enums ───────────────────────────────────────────────────────

/// A reflected enumeration: ordered `name -> value` entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDef {
    /// The enum's own type definition object.
    pub object: ObjectRef,
    /// Enum type name.
    pub name: String,
    /// Entries in declaration order.
    pub entries: IndexMap<String, i64>,
}

impl EnumDef {
    /// Build a definition from `(name, value)` pairs.
    pub fn new<I, S>(object: ObjectRef, name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self {
            object,
            name: name.into(),
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// First entry name carrying `value`.
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| **v == value)
            .map(|(k, _)| k.as_str())
    }

    /// Legal values, sorted and de-duplicated.
    pub fn sorted_values(&self) -> Vec<i64> {
        let mut values: Vec<i64> = self.entries.values().copied().collect();
        values.sort_unstable();
        values.dedup();
        values
    }

    /// Entries ordered by value, ties kept in declaration order.
    pub fn entries_by_value(&self) -> Vec<(&str, i64)> {
        let mut out: Vec<(&str, i64)> = self.entries.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        out.sort_by_key(|(_, v)| *v);
        out
    }
}

// ── Type tags ───────────────────────────────────────────────────

/// Semantic type of a value-bearing property.
///
/// Closed over the runtime's built-in property kinds. Anything the
/// reflection collaborator cannot classify arrives as [`TypeTag::Other`].
#[derive(Clone, Debug, PartialEq)]
pub enum TypeTag {
    /// Fixed-width integer or float.
    Scalar(ScalarKind),
    /// One bit inside a shared byte. A mask of `0xFF` is a whole-byte bool.
    Bool {
        /// Bits belonging to this field.
        field_mask: u8,
    },
    /// Byte, optionally backed by an enumeration.
    Byte {
        /// Enum the byte is interpreted through.
        enum_def: Option<Arc<EnumDef>>,
    },
    /// Enumeration with an explicit underlying integer.
    Enum {
        /// Storage width.
        underlying: ScalarKind,
        /// Legal values.
        def: Arc<EnumDef>,
    },
    /// Heap string.
    Str,
    /// Localizable text.
    Text,
    /// Interned name.
    Name,
    /// Direct object pointer.
    Object {
        /// Declared target type.
        class: ObjectRef,
    },
    /// Direct pointer to a type definition.
    Class {
        /// Declared target type (the class of classes).
        class: ObjectRef,
        /// Base the referenced type must derive from.
        meta_class: ObjectRef,
    },
    /// Object pointer plus adjusted interface pointer.
    Interface {
        /// Declared interface.
        interface: ObjectRef,
    },
    /// Weak object reference held through the runtime's weak table.
    WeakObject {
        /// Declared target type.
        class: ObjectRef,
    },
    /// Soft (path based) object reference.
    SoftObject {
        /// Declared target type.
        class: ObjectRef,
    },
    /// Soft (path based) class reference.
    SoftClass {
        /// Declared target type.
        class: ObjectRef,
        /// Base the referenced type must derive from.
        meta_class: ObjectRef,
    },
    /// Lazy (guid based) object reference.
    LazyObject {
        /// Declared target type.
        class: ObjectRef,
    },
    /// Inline struct value.
    Struct {
        /// Struct type definition.
        def: ObjectRef,
    },
    /// Dynamic array.
    Array {
        /// Element descriptor. Offset is zero, name is unused.
        inner: Box<FieldDescriptor>,
    },
    /// Single bound function.
    Delegate {
        /// Function signature.
        signature: ObjectRef,
    },
    /// Dynamic array of bound functions.
    MulticastDelegate {
        /// Function signature.
        signature: ObjectRef,
        /// Size of one binding in bytes.
        binding_size: usize,
    },
    /// Unrecognized property kind.
    Other {
        /// Name the reflection collaborator reported.
        type_name: String,
    },
}

impl TypeTag {
    /// Reflected type name, as shown in placeholders.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar(kind) => kind.type_name(),
            Self::Bool { .. } => "BoolProperty",
            Self::Byte { .. } => "ByteProperty",
            Self::Enum { .. } => "EnumProperty",
            Self::Str => "StrProperty",
            Self::Text => "TextProperty",
            Self::Name => "NameProperty",
            Self::Object { .. } => "ObjectProperty",
            Self::Class { .. } => "ClassProperty",
            Self::Interface { .. } => "InterfaceProperty",
            Self::WeakObject { .. } => "WeakObjectProperty",
            Self::SoftObject { .. } => "SoftObjectProperty",
            Self::SoftClass { .. } => "SoftClassProperty",
            Self::LazyObject { .. } => "LazyObjectProperty",
            Self::Struct { .. } => "StructProperty",
            Self::Array { .. } => "ArrayProperty",
            Self::Delegate { .. } => "DelegateProperty",
            Self::MulticastDelegate { .. } => "MulticastDelegateProperty",
            Self::Other { type_name } => type_name,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Kind of a non-value declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationKind {
    /// Nested class.
    Class,
    /// Plain struct definition.
    Struct,
    /// Script-visible struct definition.
    ScriptStruct,
    /// Function signature.
    Function,
    /// Enumeration definition.
    Enum(Arc<EnumDef>),
    /// Named constant, already formatted.
    Const {
        /// Display text of the constant.
        value: String,
    },
    /// Unrecognized declaration kind.
    Other {
        /// Name the reflection collaborator reported.
        type_name: String,
    },
}

impl DeclarationKind {
    /// Reflected type name.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Class => "Class",
            Self::Struct => "Struct",
            Self::ScriptStruct => "ScriptStruct",
            Self::Function => "Function",
            Self::Enum(_) => "Enum",
            Self::Const { .. } => "Const",
            Self::Other { type_name } => type_name,
        }
    }
}

/// What a descriptor describes.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    /// A value stored at `offset` inside the owner.
    Property(TypeTag),
    /// A nested definition with no storage in the owner.
    Declaration(DeclarationKind),
}

// ── Flags ───────────────────────────────────────────────────────

/// Subset of the runtime's property flags the inspector displays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PropertyFlags(pub u64);

impl PropertyFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Optional parameter.
    pub const OPTIONAL: Self = Self(0x10);
    /// Function parameter.
    pub const PARAM: Self = Self(0x80);
    /// Output parameter.
    pub const OUT: Self = Self(0x100);
    /// Return value.
    pub const RETURN: Self = Self(0x400);

    /// Whether every bit of `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Parameter annotations, `(return, out, optional)` style. Empty when none apply.
    pub fn param_annotation(self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.contains(Self::RETURN) {
            parts.push("return");
        }
        if self.contains(Self::OUT) {
            parts.push("out");
        }
        if self.contains(Self::OPTIONAL) {
            parts.push("optional");
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("({})", parts.join(", "))
        }
    }
}

impl std::ops::BitOr for PropertyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ── Descriptor ──────────────────────────────────────────────────

/// One reflected field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// The reflection object describing this field (the property or the
    /// nested definition itself). May be null for synthesized descriptors.
    pub object: ObjectRef,
    /// Property or declaration.
    pub kind: FieldKind,
    /// Byte offset from the owner's base address.
    pub offset: usize,
    /// Size of one element in bytes.
    pub element_size: usize,
    /// Fixed inline arity. 1 for ordinary fields.
    pub array_dim: usize,
    /// Property flags.
    pub flags: PropertyFlags,
}

impl FieldDescriptor {
    /// A value-bearing property.
    pub fn property(
        name: impl Into<String>,
        tag: TypeTag,
        offset: usize,
        element_size: usize,
    ) -> Self {
        Self {
            name: name.into(),
            object: ObjectRef::NULL,
            kind: FieldKind::Property(tag),
            offset,
            element_size,
            array_dim: 1,
            flags: PropertyFlags::NONE,
        }
    }

    /// A declaration backed by the definition object `object`.
    pub fn declaration(name: impl Into<String>, object: ObjectRef, kind: DeclarationKind) -> Self {
        Self {
            name: name.into(),
            object,
            kind: FieldKind::Declaration(kind),
            offset: 0,
            element_size: 0,
            array_dim: 1,
            flags: PropertyFlags::NONE,
        }
    }

    /// Element descriptor for a dynamic array.
    pub fn element(tag: TypeTag, element_size: usize) -> Self {
        Self::property(String::new(), tag, 0, element_size)
    }

    /// Set the fixed inline arity.
    #[must_use]
    pub fn with_array_dim(mut self, array_dim: usize) -> Self {
        self.array_dim = array_dim;
        self
    }

    /// Set the property flags.
    #[must_use]
    pub fn with_flags(mut self, flags: PropertyFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the describing reflection object.
    #[must_use]
    pub fn with_object(mut self, object: ObjectRef) -> Self {
        self.object = object;
        self
    }

    /// The type tag, if this is a property.
    pub fn tag(&self) -> Option<&TypeTag> {
        match &self.kind {
            FieldKind::Property(tag) => Some(tag),
            FieldKind::Declaration(_) => None,
        }
    }

    /// Whether this is a value-bearing property.
    pub fn is_property(&self) -> bool {
        matches!(self.kind, FieldKind::Property(_))
    }

    /// Reflected type name of the property or declaration.
    pub fn type_name(&self) -> &str {
        match &self.kind {
            FieldKind::Property(tag) => tag.type_name(),
            FieldKind::Declaration(decl) => decl.type_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_enum() -> EnumDef {
        EnumDef::new(ObjectRef(0x900), "EColor", [("Red", 2), ("Green", 0), ("Blue", 1)])
    }

    #[test]
    fn enum_lookup_and_ordering() {
        let def = color_enum();
        assert_eq!(def.name_of(1), Some("Blue"));
        assert_eq!(def.name_of(7), None);
        assert_eq!(def.sorted_values(), vec![0, 1, 2]);
        let names: Vec<&str> = def.entries_by_value().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Green", "Blue", "Red"]);
    }

    #[test]
    fn sorted_values_dedups_aliases() {
        let def = EnumDef::new(ObjectRef::NULL, "E", [("A", 1), ("Alias", 1), ("B", 4)]);
        assert_eq!(def.sorted_values(), vec![1, 4]);
    }

    #[test]
    fn scalar_sizes() {
        assert_eq!(ScalarKind::I8.size(), 1);
        assert_eq!(ScalarKind::U16.size(), 2);
        assert_eq!(ScalarKind::F32.size(), 4);
        assert_eq!(ScalarKind::I64.size(), 8);
        assert!(ScalarKind::F64.is_float());
        assert!(ScalarKind::I32.is_signed());
        assert!(!ScalarKind::U32.is_signed());
    }

    #[test]
    fn param_annotation_lists_set_flags() {
        let flags = PropertyFlags::PARAM | PropertyFlags::OUT | PropertyFlags::RETURN;
        assert_eq!(flags.param_annotation(), "(return, out)");
        assert_eq!(PropertyFlags::PARAM.param_annotation(), "");
    }

    #[test]
    fn other_tag_reports_its_own_name() {
        let tag = TypeTag::Other {
            type_name: "FieldPathProperty".into(),
        };
        assert_eq!(tag.to_string(), "FieldPathProperty");
    }

    #[test]
    fn descriptor_kind_split() {
        let prop = FieldDescriptor::property("Health", TypeTag::Scalar(ScalarKind::F32), 8, 4);
        assert!(prop.is_property());
        assert_eq!(prop.array_dim, 1);
        let decl = FieldDescriptor::declaration("Tick", ObjectRef(0x10), DeclarationKind::Function);
        assert!(!decl.is_property());
        assert_eq!(decl.tag(), None);
        assert_eq!(decl.type_name(), "Function");
    }
}
