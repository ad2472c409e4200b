//! Values that can occupy a property, collection, or dictionary slot.

use std::sync::Arc;

use xbf_metadata::XamlType;

use crate::extension::MarkupExtension;
use crate::object::XamlObjectRef;
use crate::runtime_data::CustomRuntimeData;
use crate::token::StreamOffsetToken;

/// A decoded slot value.
///
/// Equality is structural: two `Object` values compare equal when the
/// graphs below them are value-equal, regardless of whether they are the
/// same instance.
#[derive(Debug, Clone)]
pub enum Value {
    /// No value.
    Null,
    /// An inline boolean.
    Bool(bool),
    /// An inline 32-bit integer.
    I32(i32),
    /// An inline double.
    F64(f64),
    /// A string from the shared pool.
    String(Arc<str>),
    /// An enum constant: the enum type plus the raw constant.
    Enum {
        /// The enum type descriptor.
        ty: XamlType,
        /// The raw constant as encoded. Validated against the declared
        /// members only in strict mode.
        value: u32,
    },
    /// A nested object, owned by this slot.
    Object(XamlObjectRef),
    /// A markup-extension placeholder for the caller to resolve.
    Extension(MarkupExtension),
    /// A record serialized elsewhere in the stream, not yet materialized.
    Deferred(StreamOffsetToken),
    /// A record-kind-specific payload (a style's setter list, a resource
    /// dictionary's deferral map).
    RuntimeData(CustomRuntimeData),
}

impl Value {
    /// The nested object, if this is an `Object` value.
    pub fn as_object(&self) -> Option<&XamlObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The string, if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The token, if this is a `Deferred` value.
    pub fn as_deferred(&self) -> Option<StreamOffsetToken> {
        match self {
            Self::Deferred(token) => Some(*token),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (
                Self::Enum { ty: at, value: av },
                Self::Enum { ty: bt, value: bv },
            ) => at == bt && av == bv,
            // Structural, not identity: distinct instances of the same
            // graph compare equal.
            (Self::Object(a), Self::Object(b)) => *a.borrow() == *b.borrow(),
            (Self::Extension(a), Self::Extension(b)) => a == b,
            (Self::Deferred(a), Self::Deferred(b)) => a == b,
            (Self::RuntimeData(a), Self::RuntimeData(b)) => a == b,
            _ => false,
        }
    }
}
