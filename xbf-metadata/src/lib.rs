//! Type and property metadata for the XBF compiled-markup reader.
//!
//! A compiled XBF stream refers to types and properties through stable
//! integer indices baked in when the markup was compiled. The loader that
//! owns the stream knows which metadata set those indices were compiled
//! against and builds a [`Registry`] from it; the reader then resolves
//! every index through that registry. Descriptors are interned, so
//! [`XamlType`] and [`XamlProperty`] are cheap to clone and compare.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod error;
mod property;
mod registry;
mod types;

pub use error::MetadataError;
pub use property::{PropertyIndex, XamlProperty};
pub use registry::{Registry, RegistryBuilder};
pub use types::{ExtensionKind, RecordShape, TypeIndex, XamlType};
