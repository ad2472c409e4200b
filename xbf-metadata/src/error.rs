//! Error type for metadata lookups.

use core::fmt;

use crate::property::PropertyIndex;
use crate::types::TypeIndex;

/// A failed registry lookup.
///
/// All of these indicate a corrupt or version-mismatched stream: the
/// indices were baked in at markup compile time and must resolve against
/// the metadata set the loader supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// A type index outside the registry's table.
    UnknownTypeIndex {
        /// The index the stream asked for.
        index: TypeIndex,
    },

    /// A property index outside the registry's table.
    UnknownPropertyIndex {
        /// The index the stream asked for.
        index: PropertyIndex,
    },

    /// A late-bound property name that does not exist on the declaring type.
    UnknownPropertyName {
        /// The declaring type the stream named.
        declaring_type: TypeIndex,
        /// The property name the stream named.
        name: String,
    },
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTypeIndex { index } => {
                write!(f, "unknown {index}: not in the registry's type table")
            }
            Self::UnknownPropertyIndex { index } => {
                write!(f, "unknown {index}: not in the registry's property table")
            }
            Self::UnknownPropertyName {
                declaring_type,
                name,
            } => {
                write!(f, "no property named {name:?} on {declaring_type}")
            }
        }
    }
}

impl std::error::Error for MetadataError {}
