//! Deferred references into the byte stream.

use core::fmt;

/// A deferred reference to another record's position in the stream.
///
/// Either "no token" or an absolute byte offset. The two states are
/// explicit: the default token is *not* a token at offset zero, and a
/// token cannot be built from or compared against a bare integer by
/// accident. Resolution happens outside the model, by re-entering the
/// reader at the token's offset against the same buffer and registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StreamOffsetToken(Option<u64>);

impl StreamOffsetToken {
    /// The "no value" token.
    pub const NONE: Self = Self(None);

    /// A token addressing the record starting at `offset`.
    pub fn at(offset: u64) -> Self {
        Self(Some(offset))
    }

    /// The addressed byte offset, or `None` for the "no value" token.
    pub fn offset(self) -> Option<u64> {
        self.0
    }

    /// Whether this is the "no value" token.
    pub fn is_none(self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for StreamOffsetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(offset) => write!(f, "token@{offset}"),
            None => f.write_str("token@none"),
        }
    }
}
