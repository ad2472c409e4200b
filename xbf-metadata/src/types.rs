//! Type descriptors and the record-shape classification.

use core::fmt;
use std::sync::Arc;

/// Stable, version-independent index of a type in the compiled metadata set.
///
/// Indices are dense and assigned once when the markup is compiled; they are
/// only meaningful relative to the [`Registry`](crate::Registry) the stream
/// was compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIndex(pub u32);

impl TypeIndex {
    /// The index as a table slot.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// The markup-extension placeholder kinds a record can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    /// Resource lookup by key against the nearest resource dictionary.
    StaticResource,
    /// Resource lookup by key against the active theme's dictionary.
    ThemeResource,
    /// Binding through a templated parent's property.
    TemplateBinding,
    /// An explicit null value (`{x:Null}`).
    Null,
}

/// How a record with this type reads its body.
///
/// Decided once per node from the type descriptor, then matched
/// exhaustively; there is no runtime type inspection during the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordShape {
    /// A plain object: property assignments only.
    Object,
    /// A collection: property assignments plus ordered items.
    Collection,
    /// A keyed dictionary: property assignments plus keyed entries.
    Dictionary,
    /// A markup-extension placeholder with a kind-specific payload.
    Extension(ExtensionKind),
}

#[derive(Debug, Clone)]
struct TypeDesc {
    index: TypeIndex,
    name: String,
    shape: RecordShape,
    has_runtime_class: bool,
    defines_namescope: bool,
    enum_members: Option<Vec<u32>>,
}

/// An immutable, interned type descriptor.
///
/// Cloning is cheap (one `Arc` bump); equality and hashing go through the
/// stable index, never through the name.
#[derive(Debug, Clone)]
pub struct XamlType(Arc<TypeDesc>);

impl XamlType {
    /// Create a descriptor for `index` with the given full name and shape.
    pub fn new(index: TypeIndex, name: impl Into<String>, shape: RecordShape) -> Self {
        Self(Arc::new(TypeDesc {
            index,
            name: name.into(),
            shape,
            has_runtime_class: false,
            defines_namescope: false,
            enum_members: None,
        }))
    }

    /// Mark the type as having an associated runtime class (as opposed to a
    /// pure value type).
    pub fn with_runtime_class(mut self) -> Self {
        Arc::make_mut(&mut self.0).has_runtime_class = true;
        self
    }

    /// Mark the type as starting a fresh namescope for its subtree
    /// (templates do this in the original format).
    pub fn with_namescope(mut self) -> Self {
        Arc::make_mut(&mut self.0).defines_namescope = true;
        self
    }

    /// Declare the known enum constants for this type. Used only by the
    /// reader's strict enum validation.
    pub fn with_enum_members(mut self, members: Vec<u32>) -> Self {
        Arc::make_mut(&mut self.0).enum_members = Some(members);
        self
    }

    /// The stable index this descriptor was registered under.
    pub fn index(&self) -> TypeIndex {
        self.0.index
    }

    /// The full type name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The record shape the reader dispatches on.
    pub fn shape(&self) -> RecordShape {
        self.0.shape
    }

    /// Whether the type has an associated runtime class.
    pub fn has_runtime_class(&self) -> bool {
        self.0.has_runtime_class
    }

    /// Whether a node of this type owns a fresh namescope.
    pub fn defines_namescope(&self) -> bool {
        self.0.defines_namescope
    }

    /// The declared enum constants, if this type is an enum with a known
    /// member list.
    pub fn enum_members(&self) -> Option<&[u32]> {
        self.0.enum_members.as_deref()
    }

    /// Whether `value` is one of the declared enum constants. Types without
    /// a declared member list accept everything.
    pub fn is_known_enum_value(&self, value: u32) -> bool {
        match &self.0.enum_members {
            Some(members) => members.contains(&value),
            None => true,
        }
    }
}

impl PartialEq for XamlType {
    fn eq(&self, other: &Self) -> bool {
        self.0.index == other.0.index
    }
}

impl Eq for XamlType {}

impl core::hash::Hash for XamlType {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.0.index.hash(state);
    }
}

impl fmt::Display for XamlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
