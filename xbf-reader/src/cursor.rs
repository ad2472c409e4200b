//! Bounds-checked byte cursor over an immutable stream buffer.

use std::sync::Arc;

use xbf_model::StreamOffsetToken;

use crate::error::XbfError;
use crate::pool::SharedPool;

/// Maximum continuation groups for a `u32` varint.
const MAX_VARINT_GROUPS_U32: u32 = 5;
/// Maximum continuation groups for a `u64` varint.
const MAX_VARINT_GROUPS_U64: u32 = 10;

/// A read cursor over an immutable byte buffer.
///
/// The cursor only ever advances; the one sanctioned random access is
/// constructing a fresh cursor at a [`StreamOffsetToken`]'s address. All
/// reads are bounds-checked and fail with
/// [`XbfError::UnexpectedEndOfStream`] rather than reading short.
#[derive(Debug, Clone)]
pub struct XbfCursor<'buf> {
    input: &'buf [u8],
    pos: usize,
}

impl<'buf> XbfCursor<'buf> {
    /// Create a cursor at the start of `input`.
    pub fn new(input: &'buf [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Create a cursor positioned at `offset`. The caller validates the
    /// offset (see the token checks in the builder).
    pub fn at_offset(input: &'buf [u8], offset: usize) -> Self {
        Self { input, pos: offset }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.input.len().saturating_sub(self.pos)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, XbfError> {
        let byte = self
            .input
            .get(self.pos)
            .copied()
            .ok_or(XbfError::UnexpectedEndOfStream { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read `n` bytes as a slice of the underlying buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'buf [u8], XbfError> {
        if self.remaining() < n {
            return Err(XbfError::UnexpectedEndOfStream { offset: self.pos });
        }
        let slice = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read an 8-byte little-endian f64.
    pub fn read_f64(&mut self) -> Result<f64, XbfError> {
        let bytes = self.read_bytes(8)?;
        Ok(f64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    fn read_varint_raw(&mut self, max_groups: u32) -> Result<u64, XbfError> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut shift: u32 = 0;

        for _ in 0..max_groups {
            let byte = self.read_u8()?;
            let data = (byte & 0x7f) as u64;

            // The final group of a 10-group varint only has one usable bit.
            if shift == 63 && data > 1 {
                return Err(XbfError::MalformedVarint { offset: start });
            }
            result |= data << shift;
            shift += 7;

            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(XbfError::MalformedVarint { offset: start })
    }

    /// Read a 7-bit variable-length u32 (LEB128, little-endian group
    /// order, at most five groups).
    pub fn read_varint_u32(&mut self) -> Result<u32, XbfError> {
        let start = self.pos;
        let value = self.read_varint_raw(MAX_VARINT_GROUPS_U32)?;
        u32::try_from(value).map_err(|_| XbfError::MalformedVarint { offset: start })
    }

    /// Read a 7-bit variable-length u64 (at most ten groups).
    pub fn read_varint_u64(&mut self) -> Result<u64, XbfError> {
        self.read_varint_raw(MAX_VARINT_GROUPS_U64)
    }

    /// Read a zigzag-encoded i32.
    pub fn read_zigzag_i32(&mut self) -> Result<i32, XbfError> {
        let encoded = self.read_varint_u32()?;
        Ok(((encoded >> 1) as i32) ^ -((encoded & 1) as i32))
    }

    /// Read an inline string: varint byte length followed by UTF-8 bytes.
    pub fn read_inline_string(&mut self) -> Result<&'buf str, XbfError> {
        let len = self.read_varint_u32()? as usize;
        let offset = self.pos;
        let bytes = self.read_bytes(len)?;
        core::str::from_utf8(bytes).map_err(|_| XbfError::InvalidUtf8 { offset })
    }

    /// Read a shared-pool string reference: a varint index resolved
    /// against the pool, returning a view of pool-owned storage.
    pub fn read_shared_string(&mut self, pool: &SharedPool) -> Result<Arc<str>, XbfError> {
        let offset = self.pos;
        let index = self.read_varint_u32()?;
        pool.get(index, offset)
    }

    /// Read a stream offset token: varint `v` where zero is "no token"
    /// and anything else addresses offset `v - 1`.
    pub fn read_token(&mut self) -> Result<StreamOffsetToken, XbfError> {
        let raw = self.read_varint_u64()?;
        Ok(match raw.checked_sub(1) {
            Some(offset) => StreamOffsetToken::at(offset),
            None => StreamOffsetToken::NONE,
        })
    }

    /// Read a varint count, then `count` items via `read_item`. The count
    /// is sanity-checked against the bytes remaining (every item costs at
    /// least one byte), so a corrupt count fails fast instead of looping.
    pub fn read_vector<T>(
        &mut self,
        mut read_item: impl FnMut(&mut Self) -> Result<T, XbfError>,
    ) -> Result<Vec<T>, XbfError> {
        let offset = self.pos;
        let count = self.read_varint_u32()? as usize;
        if count > self.remaining() {
            return Err(XbfError::UnexpectedEndOfStream { offset });
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(read_item(self)?);
        }
        Ok(items)
    }
}
