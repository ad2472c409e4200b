//! Custom runtime data records.
//!
//! Some record kinds carry a payload with its own flags-driven encoding
//! instead of ordinary members (the original format calls this "custom
//! writer runtime data"). The decoded shapes live here; the flags-first
//! decoding itself is in the reader crate.

use std::sync::Arc;

use bitflags::bitflags;
use xbf_metadata::XamlProperty;

use crate::token::StreamOffsetToken;

bitflags! {
    /// Flags bitmask carried by each setter essence.
    ///
    /// The six `HAS_*` flags are mutually exclusive: at most one may be set
    /// per entry (none means the value is absent). The four token-carrying
    /// flags share one wire encoding, a [`StreamOffsetToken`]; which flag
    /// is set tells the consumer what the token means.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SetterFlags: u32 {
        /// The property was resolved to a stable index at compile time.
        const IS_PROPERTY_RESOLVED = 1 << 0;
        /// The value is an inline string.
        const HAS_STRING_VALUE = 1 << 1;
        /// The value is a shared constant-pool entry.
        const HAS_CONTAINER_VALUE = 1 << 2;
        /// The token addresses a static-resource record.
        const HAS_STATIC_RESOURCE_VALUE = 1 << 3;
        /// The token addresses a theme-resource record.
        const HAS_THEME_RESOURCE_VALUE = 1 << 4;
        /// The token addresses a nested object record.
        const HAS_OBJECT_VALUE = 1 << 5;
        /// The token addresses this setter's own record.
        const HAS_TOKEN_FOR_SELF = 1 << 6;
        /// The setter's value may be replaced at runtime (style v2 only).
        const IS_VALUE_MUTABLE = 1 << 7;
    }
}

impl SetterFlags {
    /// The mutually exclusive value-selecting flags.
    pub const VALUE_FLAGS: Self = Self::HAS_STRING_VALUE
        .union(Self::HAS_CONTAINER_VALUE)
        .union(Self::HAS_STATIC_RESOURCE_VALUE)
        .union(Self::HAS_THEME_RESOURCE_VALUE)
        .union(Self::HAS_OBJECT_VALUE)
        .union(Self::HAS_TOKEN_FOR_SELF);

    /// The subset of value flags whose payload is a token.
    pub const TOKEN_FLAGS: Self = Self::HAS_STATIC_RESOURCE_VALUE
        .union(Self::HAS_THEME_RESOURCE_VALUE)
        .union(Self::HAS_OBJECT_VALUE)
        .union(Self::HAS_TOKEN_FOR_SELF);
}

/// One property/value assignment in a style's setter list.
///
/// Exactly one of `string_value`, `container_value`, or `token` is
/// populated, selected by the flags; the others stay at their default.
/// Entries decoded through the late-bound property path are promoted, so
/// `flags` always has [`SetterFlags::IS_PROPERTY_RESOLVED`] set by the
/// time a consumer sees the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SetterEssence {
    /// The entry's flags, after promotion.
    pub flags: SetterFlags,
    /// The resolved target property.
    pub property: XamlProperty,
    /// Inline string value, if `HAS_STRING_VALUE`.
    pub string_value: Option<String>,
    /// Shared constant-pool value, if `HAS_CONTAINER_VALUE`.
    pub container_value: Option<Arc<str>>,
    /// Deferred value, if one of the token flags is set.
    pub token: StreamOffsetToken,
}

impl SetterEssence {
    /// Whether the setter's value may be replaced at runtime.
    pub fn is_mutable(&self) -> bool {
        self.flags.contains(SetterFlags::IS_VALUE_MUTABLE)
    }

    /// Whether the value is deferred behind a token.
    pub fn has_token_value(&self) -> bool {
        self.flags.intersects(SetterFlags::TOKEN_FLAGS)
    }
}

/// Style runtime-data format versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleVersion {
    /// Initial encoding.
    V1,
    /// Adds mutable setters ([`SetterFlags::IS_VALUE_MUTABLE`]).
    V2,
}

/// A style's decoded setter list.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRuntimeData {
    /// The format version the payload was encoded with.
    pub version: StyleVersion,
    /// The setters, in document order.
    pub setters: Vec<SetterEssence>,
}

/// One deferred entry of a resource dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredResourceEntry {
    /// The resource key.
    pub key: Arc<str>,
    /// Where the resource's record starts in the stream.
    pub token: StreamOffsetToken,
}

/// A resource dictionary's deferral map: keys known up front, values left
/// in the stream until asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDictionaryRuntimeData {
    /// The deferred entries, keys unique.
    pub entries: Vec<DeferredResourceEntry>,
}

/// A decoded custom runtime data payload, tagged by record kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomRuntimeData {
    /// A style's setter list.
    Style(StyleRuntimeData),
    /// A resource dictionary's deferral map.
    ResourceDictionary(ResourceDictionaryRuntimeData),
}
