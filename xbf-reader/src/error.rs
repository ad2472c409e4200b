//! Error type for XBF deserialization.
//!
//! Every variant is fatal to the current parse and carries the byte offset
//! at which it was detected, so the loader can report a diagnosable
//! failure instead of a raw panic.

use core::fmt;

use xbf_metadata::MetadataError;
use xbf_model::StreamOffsetToken;

/// A failed parse. Fatal; a corrupt stream cannot be partially trusted.
#[derive(Debug, Clone, PartialEq)]
pub enum XbfError {
    /// The stream does not start with the XBF magic bytes.
    InvalidMagic {
        /// Detection offset.
        offset: usize,
    },

    /// A stream or runtime-data version tag this reader does not understand.
    UnsupportedFormatVersion {
        /// The version tag as read.
        version: u32,
        /// Detection offset.
        offset: usize,
    },

    /// A varint continued past the maximum allowed groups, or its value
    /// overflows the target width.
    MalformedVarint {
        /// Detection offset (start of the varint).
        offset: usize,
    },

    /// The cursor would run past the end of the buffer.
    UnexpectedEndOfStream {
        /// Detection offset.
        offset: usize,
    },

    /// A type index outside the registry's table.
    UnknownTypeIndex {
        /// The index as read.
        index: u32,
        /// Offset of the index read.
        offset: usize,
    },

    /// A property index outside the registry's table.
    UnknownPropertyIndex {
        /// The index as read.
        index: u32,
        /// Offset of the index read.
        offset: usize,
    },

    /// A late-bound property name that does not resolve on its declaring
    /// type.
    UnknownPropertyName {
        /// The declaring type index as read.
        declaring_type: u32,
        /// The property name as read.
        name: String,
        /// Offset of the reference.
        offset: usize,
    },

    /// A value tag outside the closed tag set.
    InvalidValueTag {
        /// The tag byte as read.
        tag: u8,
        /// Offset of the tag byte.
        offset: usize,
    },

    /// A member kind outside the closed member-kind set.
    InvalidMemberKind {
        /// The kind byte as read.
        kind: u8,
        /// Offset of the kind byte.
        offset: usize,
    },

    /// A shared-pool reference outside the pool.
    InvalidPoolIndex {
        /// The pool index as read.
        index: u32,
        /// Offset of the reference.
        offset: usize,
    },

    /// A string whose bytes are not UTF-8.
    InvalidUtf8 {
        /// Offset of the string bytes.
        offset: usize,
    },

    /// A setter-essence flags bitmask with unknown bits, or with zero-or-
    /// several of its mutually exclusive value flags where exactly one is
    /// required.
    InvalidFlagCombination {
        /// The bitmask as read.
        flags: u32,
        /// Offset of the flags varint.
        offset: usize,
    },

    /// An offset token pointing outside the stream's record region.
    CorruptOffsetToken {
        /// The offending token.
        token: StreamOffsetToken,
        /// Detection offset.
        offset: usize,
    },

    /// A dictionary entry whose key value is not a string.
    InvalidDictionaryKey {
        /// Offset of the key value.
        offset: usize,
    },

    /// Strict mode only: an enum constant outside the declared member list.
    UnknownEnumValue {
        /// The enum type index as read.
        type_index: u32,
        /// The constant as read.
        value: u32,
        /// Offset of the constant.
        offset: usize,
    },

    /// The root record of a stream is not an object record.
    InvalidRootRecord {
        /// Offset of the root record.
        offset: usize,
    },
}

impl XbfError {
    /// The byte offset at which the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            Self::InvalidMagic { offset }
            | Self::UnsupportedFormatVersion { offset, .. }
            | Self::MalformedVarint { offset }
            | Self::UnexpectedEndOfStream { offset }
            | Self::UnknownTypeIndex { offset, .. }
            | Self::UnknownPropertyIndex { offset, .. }
            | Self::UnknownPropertyName { offset, .. }
            | Self::InvalidValueTag { offset, .. }
            | Self::InvalidMemberKind { offset, .. }
            | Self::InvalidPoolIndex { offset, .. }
            | Self::InvalidUtf8 { offset }
            | Self::InvalidFlagCombination { offset, .. }
            | Self::CorruptOffsetToken { offset, .. }
            | Self::InvalidDictionaryKey { offset }
            | Self::UnknownEnumValue { offset, .. }
            | Self::InvalidRootRecord { offset } => *offset,
        }
    }

    /// Attach a byte offset to a registry lookup failure.
    pub(crate) fn metadata(error: MetadataError, offset: usize) -> Self {
        match error {
            MetadataError::UnknownTypeIndex { index } => Self::UnknownTypeIndex {
                index: index.0,
                offset,
            },
            MetadataError::UnknownPropertyIndex { index } => Self::UnknownPropertyIndex {
                index: index.0,
                offset,
            },
            MetadataError::UnknownPropertyName {
                declaring_type,
                name,
            } => Self::UnknownPropertyName {
                declaring_type: declaring_type.0,
                name,
                offset,
            },
        }
    }
}

impl fmt::Display for XbfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMagic { offset } => {
                write!(f, "not an XBF stream (bad magic) at offset {offset}")
            }
            Self::UnsupportedFormatVersion { version, offset } => {
                write!(f, "unsupported format version {version} at offset {offset}")
            }
            Self::MalformedVarint { offset } => {
                write!(f, "malformed varint at offset {offset}")
            }
            Self::UnexpectedEndOfStream { offset } => {
                write!(f, "unexpected end of stream at offset {offset}")
            }
            Self::UnknownTypeIndex { index, offset } => {
                write!(f, "unknown type index {index} at offset {offset}")
            }
            Self::UnknownPropertyIndex { index, offset } => {
                write!(f, "unknown property index {index} at offset {offset}")
            }
            Self::UnknownPropertyName {
                declaring_type,
                name,
                offset,
            } => write!(
                f,
                "no property named {name:?} on type {declaring_type} at offset {offset}"
            ),
            Self::InvalidValueTag { tag, offset } => {
                write!(f, "invalid value tag 0x{tag:02x} at offset {offset}")
            }
            Self::InvalidMemberKind { kind, offset } => {
                write!(f, "invalid member kind 0x{kind:02x} at offset {offset}")
            }
            Self::InvalidPoolIndex { index, offset } => {
                write!(f, "string pool index {index} out of range at offset {offset}")
            }
            Self::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 in string at offset {offset}")
            }
            Self::InvalidFlagCombination { flags, offset } => write!(
                f,
                "invalid setter flag combination 0x{flags:08x} at offset {offset}"
            ),
            Self::CorruptOffsetToken { token, offset } => {
                write!(f, "corrupt {token} detected at offset {offset}")
            }
            Self::InvalidDictionaryKey { offset } => {
                write!(f, "dictionary key is not a string at offset {offset}")
            }
            Self::UnknownEnumValue {
                type_index,
                value,
                offset,
            } => write!(
                f,
                "value {value} is not a known member of enum type {type_index} at offset {offset}"
            ),
            Self::InvalidRootRecord { offset } => {
                write!(f, "root record is not an object record at offset {offset}")
            }
        }
    }
}

impl std::error::Error for XbfError {}

#[cfg(feature = "pretty-errors")]
impl miette::Diagnostic for XbfError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            Self::InvalidMagic { .. } => "xbf::invalid_magic",
            Self::UnsupportedFormatVersion { .. } => "xbf::unsupported_format_version",
            Self::MalformedVarint { .. } => "xbf::malformed_varint",
            Self::UnexpectedEndOfStream { .. } => "xbf::unexpected_end_of_stream",
            Self::UnknownTypeIndex { .. } => "xbf::unknown_type_index",
            Self::UnknownPropertyIndex { .. } => "xbf::unknown_property_index",
            Self::UnknownPropertyName { .. } => "xbf::unknown_property_name",
            Self::InvalidValueTag { .. } => "xbf::invalid_value_tag",
            Self::InvalidMemberKind { .. } => "xbf::invalid_member_kind",
            Self::InvalidPoolIndex { .. } => "xbf::invalid_pool_index",
            Self::InvalidUtf8 { .. } => "xbf::invalid_utf8",
            Self::InvalidFlagCombination { .. } => "xbf::invalid_flag_combination",
            Self::CorruptOffsetToken { .. } => "xbf::corrupt_offset_token",
            Self::InvalidDictionaryKey { .. } => "xbf::invalid_dictionary_key",
            Self::UnknownEnumValue { .. } => "xbf::unknown_enum_value",
            Self::InvalidRootRecord { .. } => "xbf::invalid_root_record",
        };
        Some(Box::new(code))
    }
}
