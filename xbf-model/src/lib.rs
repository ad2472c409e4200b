//! In-memory object graph for compiled XBF markup.
//!
//! A deserialized stream becomes a tree of [`XamlObject`] nodes. The tree
//! owns its children (`Rc` in property slots, collection slots, and
//! dictionary slots); parent pointers and namescope entries are `Weak`
//! back-references. Exactly one strong owner exists for any node at a time:
//! attaching a node that already has a parent detaches it from the old
//! parent first, and every attach/detach goes through the operations in
//! this crate so the invariant is mechanically enforced.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod extension;
mod object;
mod runtime_data;
mod token;
mod value;

pub use extension::MarkupExtension;
pub use object::{
    XamlObject, XamlObjectRef, XamlObjectWeak, add_collection_item, add_dictionary_item, detach,
    register_name, set_value,
};
pub use runtime_data::{
    CustomRuntimeData, DeferredResourceEntry, ResourceDictionaryRuntimeData, SetterEssence,
    SetterFlags, StyleRuntimeData, StyleVersion,
};
pub use token::StreamOffsetToken;
pub use value::Value;
