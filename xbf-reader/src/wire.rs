//! Wire-level constants for the XBF stream encoding.

/// Magic bytes at the start of every stream.
pub const MAGIC: [u8; 4] = *b"XBF\0";

/// The stream format version this reader understands.
pub const FORMAT_VERSION: u32 = 1;

/// Member kinds inside a record's member section.
pub mod member {
    /// Property resolved to a stable index at compile time.
    pub const PROPERTY: u8 = 0x00;
    /// Late-bound property: declaring-type index plus name.
    pub const LATE_BOUND_PROPERTY: u8 = 0x01;
    /// Name directive: registers the node in the nearest namescope.
    pub const NAME: u8 = 0x02;
}

/// Value tags. One tag byte precedes every value; the tag is never
/// inferred from context.
pub mod tag {
    /// No value.
    pub const NULL: u8 = 0x00;
    /// Boolean false.
    pub const FALSE: u8 = 0x01;
    /// Boolean true.
    pub const TRUE: u8 = 0x02;
    /// Zigzag varint i32.
    pub const I32: u8 = 0x03;
    /// 8-byte little-endian f64.
    pub const F64: u8 = 0x04;
    /// Shared-pool string reference.
    pub const STRING: u8 = 0x05;
    /// Enum: type index plus raw constant.
    pub const ENUM: u8 = 0x06;
    /// Nested record, decoded inline.
    pub const OBJECT: u8 = 0x07;
    /// Deferred record: a stream offset token.
    pub const DEFERRED: u8 = 0x08;
    /// Custom runtime data payload.
    pub const RUNTIME_DATA: u8 = 0x09;
}

/// Custom runtime data version tags.
pub mod runtime_data {
    /// Style setter list, initial encoding.
    pub const STYLE_V1: u32 = 1;
    /// Style setter list with mutable setters.
    pub const STYLE_V2: u32 = 2;
    /// Resource dictionary deferral map.
    pub const RESOURCE_DICTIONARY_V1: u32 = 3;
}
