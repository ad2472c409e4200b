//! Property descriptors.

use core::fmt;
use std::sync::Arc;

use crate::types::TypeIndex;

/// Stable, version-independent index of a property in the compiled metadata
/// set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyIndex(pub u32);

impl PropertyIndex {
    /// The index as a table slot.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PropertyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "property#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct PropertyDesc {
    index: PropertyIndex,
    name: String,
    declaring_type: TypeIndex,
    attachable: bool,
}

/// An immutable, interned property descriptor.
///
/// Equality and hashing go through the stable index, so a `XamlProperty`
/// works as a map key without string comparisons.
#[derive(Debug, Clone)]
pub struct XamlProperty(Arc<PropertyDesc>);

impl XamlProperty {
    /// Create a descriptor for `index`, named `name`, declared on
    /// `declaring_type`.
    pub fn new(index: PropertyIndex, name: impl Into<String>, declaring_type: TypeIndex) -> Self {
        Self(Arc::new(PropertyDesc {
            index,
            name: name.into(),
            declaring_type,
            attachable: false,
        }))
    }

    /// Mark the property as attachable (settable on instances of types
    /// other than its declaring type).
    pub fn attachable(mut self) -> Self {
        Arc::make_mut(&mut self.0).attachable = true;
        self
    }

    /// The stable index this descriptor was registered under.
    pub fn index(&self) -> PropertyIndex {
        self.0.index
    }

    /// The property name, without the declaring type.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The index of the declaring type.
    pub fn declaring_type(&self) -> TypeIndex {
        self.0.declaring_type
    }

    /// Whether the property is attachable.
    pub fn is_attachable(&self) -> bool {
        self.0.attachable
    }
}

impl PartialEq for XamlProperty {
    fn eq(&self, other: &Self) -> bool {
        self.0.index == other.0.index
    }
}

impl Eq for XamlProperty {}

impl core::hash::Hash for XamlProperty {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.0.index.hash(state);
    }
}

impl fmt::Display for XamlProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0.declaring_type, self.0.name)
    }
}
