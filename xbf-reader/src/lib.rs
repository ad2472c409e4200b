//! Deserializer for XBF compiled-markup binary streams.
//!
//! An XBF stream is produced once at markup-compile time and read many
//! times at load time: a header, a shared string pool, then a recursive
//! record region describing an object graph. [`from_slice`] parses a whole
//! buffer into an [`XbfDocument`] whose root is a mutable
//! [`xbf_model::XamlObject`] graph; deferred records stay in the buffer as
//! [`xbf_model::StreamOffsetToken`]s until [`XbfDocument::resolve`] is
//! asked for them.
//!
//! Parsing is all-or-nothing. Any malformed byte aborts with an
//! [`XbfError`] carrying the offset where it was detected; no partial
//! graph is ever returned.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod builder;
mod cursor;
mod error;
mod pool;
mod runtime_data;
pub mod wire;

pub use builder::{DecodeOptions, EnumMode, XbfDocument, from_slice, from_slice_with_options};
pub use cursor::XbfCursor;
pub use error::XbfError;
pub use pool::SharedPool;
