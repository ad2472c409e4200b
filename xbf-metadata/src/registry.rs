//! The read-only type/property lookup table.

use std::collections::HashMap;

use crate::error::MetadataError;
use crate::property::{PropertyIndex, XamlProperty};
use crate::types::{TypeIndex, XamlType};

/// The read-only metadata lookup table for one compiled metadata set.
///
/// Built once by the loader (via [`Registry::builder`]) and shared across
/// every stream compiled against the same metadata version. All lookups are
/// `&self`; the registry is safe for concurrent read-only access.
#[derive(Debug)]
pub struct Registry {
    types: Vec<XamlType>,
    properties: Vec<XamlProperty>,
    properties_by_name: HashMap<(TypeIndex, String), PropertyIndex>,
    name_property: Option<PropertyIndex>,
}

impl Registry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Resolve a type index to its descriptor.
    pub fn type_by_index(&self, index: TypeIndex) -> Result<&XamlType, MetadataError> {
        self.types
            .get(index.as_usize())
            .ok_or(MetadataError::UnknownTypeIndex { index })
    }

    /// Resolve a property index to its descriptor.
    pub fn property_by_index(&self, index: PropertyIndex) -> Result<&XamlProperty, MetadataError> {
        self.properties
            .get(index.as_usize())
            .ok_or(MetadataError::UnknownPropertyIndex { index })
    }

    /// Resolve a property by declaring type and name. This is the late-bound
    /// path, used when the compiler could not resolve the property to an
    /// index statically.
    pub fn property_by_name(
        &self,
        declaring_type: TypeIndex,
        name: &str,
    ) -> Result<&XamlProperty, MetadataError> {
        let index = self
            .properties_by_name
            .get(&(declaring_type, name.to_owned()))
            .ok_or_else(|| MetadataError::UnknownPropertyName {
                declaring_type,
                name: name.to_owned(),
            })?;
        self.property_by_index(*index)
    }

    /// The property that stores an object's name alongside its namescope
    /// registration, if the loader configured one.
    pub fn name_property(&self) -> Option<&XamlProperty> {
        self.name_property
            .and_then(|index| self.properties.get(index.as_usize()))
    }

    /// Number of registered types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Number of registered properties.
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

/// Builder for [`Registry`].
///
/// Indices are dense: types and properties must be registered in index
/// order, starting at zero. Registering out of order is a programming
/// error in the loader and panics.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: Vec<XamlType>,
    properties: Vec<XamlProperty>,
    properties_by_name: HashMap<(TypeIndex, String), PropertyIndex>,
    name_property: Option<PropertyIndex>,
}

impl RegistryBuilder {
    /// Register a type descriptor. Must arrive in index order.
    pub fn register_type(mut self, ty: XamlType) -> Self {
        assert_eq!(
            ty.index().as_usize(),
            self.types.len(),
            "type {} registered out of order",
            ty.index()
        );
        self.types.push(ty);
        self
    }

    /// Register a property descriptor. Must arrive in index order.
    pub fn register_property(mut self, property: XamlProperty) -> Self {
        assert_eq!(
            property.index().as_usize(),
            self.properties.len(),
            "property {} registered out of order",
            property.index()
        );
        self.properties_by_name.insert(
            (property.declaring_type(), property.name().to_owned()),
            property.index(),
        );
        self.properties.push(property);
        self
    }

    /// Nominate the property that receives an object's name when the stream
    /// carries a name directive (`DependencyObject.Name` in the original
    /// metadata set).
    pub fn name_property(mut self, index: PropertyIndex) -> Self {
        self.name_property = Some(index);
        self
    }

    /// Freeze the table.
    pub fn build(self) -> Registry {
        if let Some(index) = self.name_property {
            assert!(
                index.as_usize() < self.properties.len(),
                "name property {index} was never registered"
            );
        }
        Registry {
            types: self.types,
            properties: self.properties,
            properties_by_name: self.properties_by_name,
            name_property: self.name_property,
        }
    }
}
