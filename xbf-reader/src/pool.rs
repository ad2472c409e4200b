//! The shared string pool.

use std::sync::Arc;

use crate::cursor::XbfCursor;
use crate::error::XbfError;

/// The de-duplicated string table read from the head of a stream.
///
/// Immutable after parsing and `Send + Sync`; one pool can back any number
/// of concurrent reads over the same buffer. Lookups return shared views
/// (`Arc<str>`), never copies.
#[derive(Debug, Clone)]
pub struct SharedPool {
    strings: Vec<Arc<str>>,
}

impl SharedPool {
    /// Parse the pool segment at the cursor's position: a varint count,
    /// then that many length-prefixed UTF-8 strings.
    pub fn parse(cursor: &mut XbfCursor<'_>) -> Result<Self, XbfError> {
        let strings = cursor.read_vector(|cursor| {
            let s = cursor.read_inline_string()?;
            Ok(Arc::from(s))
        })?;
        Ok(Self { strings })
    }

    /// An empty pool, for streams that intern nothing.
    pub fn empty() -> Self {
        Self {
            strings: Vec::new(),
        }
    }

    /// Resolve a pool index. `offset` is the stream position of the
    /// reference, for the error path.
    pub fn get(&self, index: u32, offset: usize) -> Result<Arc<str>, XbfError> {
        self.strings
            .get(index as usize)
            .cloned()
            .ok_or(XbfError::InvalidPoolIndex { index, offset })
    }

    /// Number of pooled strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
