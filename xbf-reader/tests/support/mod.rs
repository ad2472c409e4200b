//! Shared fixtures for the reader's integration tests: a hand-rolled
//! stream encoder and a small metadata set to decode against.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use std::sync::Arc;

use xbf_metadata::{
    ExtensionKind, PropertyIndex, RecordShape, Registry, TypeIndex, XamlProperty, XamlType,
};
use xbf_reader::wire;

// =============================================================================
// Type and property indices of the fixture metadata set
// =============================================================================

pub const BUTTON: u32 = 0;
pub const STACK_PANEL: u32 = 1;
pub const UI_ELEMENT_COLLECTION: u32 = 2;
pub const RESOURCE_DICTIONARY: u32 = 3;
pub const STYLE: u32 = 4;
pub const STATIC_RESOURCE: u32 = 5;
pub const THEME_RESOURCE: u32 = 6;
pub const TEMPLATE_BINDING: u32 = 7;
pub const NULL_EXTENSION: u32 = 8;
pub const VISIBILITY: u32 = 9;
pub const CONTROL_TEMPLATE: u32 = 10;

pub const PROP_CONTENT: u32 = 0;
pub const PROP_NAME: u32 = 1;
pub const PROP_WIDTH: u32 = 2;
pub const PROP_VISIBILITY: u32 = 3;
pub const PROP_CHILDREN: u32 = 4;
pub const PROP_SETTERS: u32 = 5;
pub const PROP_TEMPLATE: u32 = 6;

/// The metadata set every test stream is compiled against.
pub fn registry() -> Arc<Registry> {
    let registry = Registry::builder()
        .register_type(XamlType::new(TypeIndex(BUTTON), "Button", RecordShape::Object)
            .with_runtime_class())
        .register_type(
            XamlType::new(TypeIndex(STACK_PANEL), "StackPanel", RecordShape::Object)
                .with_runtime_class(),
        )
        .register_type(XamlType::new(
            TypeIndex(UI_ELEMENT_COLLECTION),
            "UIElementCollection",
            RecordShape::Collection,
        ))
        .register_type(XamlType::new(
            TypeIndex(RESOURCE_DICTIONARY),
            "ResourceDictionary",
            RecordShape::Dictionary,
        ))
        .register_type(XamlType::new(TypeIndex(STYLE), "Style", RecordShape::Object))
        .register_type(XamlType::new(
            TypeIndex(STATIC_RESOURCE),
            "StaticResource",
            RecordShape::Extension(ExtensionKind::StaticResource),
        ))
        .register_type(XamlType::new(
            TypeIndex(THEME_RESOURCE),
            "ThemeResource",
            RecordShape::Extension(ExtensionKind::ThemeResource),
        ))
        .register_type(XamlType::new(
            TypeIndex(TEMPLATE_BINDING),
            "TemplateBinding",
            RecordShape::Extension(ExtensionKind::TemplateBinding),
        ))
        .register_type(XamlType::new(
            TypeIndex(NULL_EXTENSION),
            "NullExtension",
            RecordShape::Extension(ExtensionKind::Null),
        ))
        .register_type(
            XamlType::new(TypeIndex(VISIBILITY), "Visibility", RecordShape::Object)
                .with_enum_members(vec![0, 1]),
        )
        .register_type(
            XamlType::new(TypeIndex(CONTROL_TEMPLATE), "ControlTemplate", RecordShape::Object)
                .with_namescope(),
        )
        .register_property(XamlProperty::new(
            PropertyIndex(PROP_CONTENT),
            "Content",
            TypeIndex(BUTTON),
        ))
        .register_property(XamlProperty::new(
            PropertyIndex(PROP_NAME),
            "Name",
            TypeIndex(BUTTON),
        ))
        .register_property(XamlProperty::new(
            PropertyIndex(PROP_WIDTH),
            "Width",
            TypeIndex(BUTTON),
        ))
        .register_property(XamlProperty::new(
            PropertyIndex(PROP_VISIBILITY),
            "Visibility",
            TypeIndex(BUTTON),
        ))
        .register_property(XamlProperty::new(
            PropertyIndex(PROP_CHILDREN),
            "Children",
            TypeIndex(STACK_PANEL),
        ))
        .register_property(XamlProperty::new(
            PropertyIndex(PROP_SETTERS),
            "Setters",
            TypeIndex(STYLE),
        ))
        .register_property(XamlProperty::new(
            PropertyIndex(PROP_TEMPLATE),
            "Template",
            TypeIndex(BUTTON),
        ))
        .name_property(PropertyIndex(PROP_NAME))
        .build();
    Arc::new(registry)
}

// =============================================================================
// Stream encoder
// =============================================================================

/// Byte-level stream encoder, mirroring what the markup compiler emits.
///
/// Deliberately low-level: tests spell out every record so the expected
/// byte layout stays visible. `len()` is the absolute offset of the next
/// write, which is how tests compute token targets.
pub struct StreamBuilder {
    bytes: Vec<u8>,
}

impl StreamBuilder {
    /// Start a stream: magic, format version, and the shared pool.
    pub fn header(pool: &[&str]) -> Self {
        let mut b = Self { bytes: Vec::new() };
        b.bytes.extend_from_slice(&wire::MAGIC);
        b.varint(wire::FORMAT_VERSION as u64);
        b.varint(pool.len() as u64);
        for s in pool {
            b.inline_string(s);
        }
        b
    }

    /// A builder with no header, for encoding record fragments whose
    /// length a test needs before splicing them into a stream.
    pub fn fragment() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Absolute offset of the next byte written.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    pub fn u8(&mut self, byte: u8) -> &mut Self {
        self.bytes.push(byte);
        self
    }

    pub fn varint(&mut self, mut value: u64) -> &mut Self {
        loop {
            let group = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.bytes.push(group);
                break;
            }
            self.bytes.push(group | 0x80);
        }
        self
    }

    pub fn zigzag(&mut self, value: i32) -> &mut Self {
        let encoded = ((value as u32) << 1) ^ ((value >> 31) as u32);
        self.varint(encoded as u64)
    }

    pub fn f64(&mut self, value: f64) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn inline_string(&mut self, s: &str) -> &mut Self {
        self.varint(s.len() as u64);
        self.bytes.extend_from_slice(s.as_bytes());
        self
    }

    /// A shared-pool reference.
    pub fn pool_ref(&mut self, index: u32) -> &mut Self {
        self.varint(index as u64)
    }

    /// A token addressing `offset`, or the none token.
    pub fn token(&mut self, offset: Option<u64>) -> &mut Self {
        match offset {
            Some(offset) => self.varint(offset + 1),
            None => self.varint(0),
        }
    }

    pub fn bytes(&mut self, raw: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(raw);
        self
    }

    // -- record scaffolding ---------------------------------------------------

    /// Open a record: type index, then `xmlns_count` prefix/namespace pool
    /// pairs must follow, then the member section.
    pub fn record(&mut self, type_index: u32, xmlns_count: u32) -> &mut Self {
        self.varint(type_index as u64);
        self.varint(xmlns_count as u64)
    }

    /// Member-section count.
    pub fn members(&mut self, count: u32) -> &mut Self {
        self.varint(count as u64)
    }

    /// An index-resolved property member header; the value follows.
    pub fn property(&mut self, property_index: u32) -> &mut Self {
        self.u8(wire::member::PROPERTY);
        self.varint(property_index as u64)
    }

    /// A late-bound property member header; the value follows.
    pub fn late_bound_property(&mut self, declaring_type: u32, name_pool_index: u32) -> &mut Self {
        self.u8(wire::member::LATE_BOUND_PROPERTY);
        self.varint(declaring_type as u64);
        self.pool_ref(name_pool_index)
    }

    /// A name-directive member.
    pub fn name(&mut self, name_pool_index: u32) -> &mut Self {
        self.u8(wire::member::NAME);
        self.pool_ref(name_pool_index)
    }

    // -- values ---------------------------------------------------------------

    pub fn value_string(&mut self, pool_index: u32) -> &mut Self {
        self.u8(wire::tag::STRING);
        self.pool_ref(pool_index)
    }

    pub fn value_i32(&mut self, value: i32) -> &mut Self {
        self.u8(wire::tag::I32);
        self.zigzag(value)
    }

    pub fn value_f64(&mut self, value: f64) -> &mut Self {
        self.u8(wire::tag::F64);
        self.f64(value)
    }

    pub fn value_bool(&mut self, value: bool) -> &mut Self {
        self.u8(if value { wire::tag::TRUE } else { wire::tag::FALSE })
    }

    pub fn value_enum(&mut self, type_index: u32, constant: u32) -> &mut Self {
        self.u8(wire::tag::ENUM);
        self.varint(type_index as u64);
        self.varint(constant as u64)
    }

    /// A nested-record value; the record bytes must follow.
    pub fn value_object(&mut self) -> &mut Self {
        self.u8(wire::tag::OBJECT)
    }

    pub fn value_deferred(&mut self, offset: Option<u64>) -> &mut Self {
        self.u8(wire::tag::DEFERRED);
        self.token(offset)
    }

    /// A custom runtime data value header; the payload bytes must follow.
    pub fn value_runtime_data(&mut self, version: u32) -> &mut Self {
        self.u8(wire::tag::RUNTIME_DATA);
        self.varint(version as u64)
    }
}
