// Chunk: docs/chunks/checked_cursors - Reported errors for allocation and cursor misuse

//! Error type for gap buffer operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors reported by [`GapBuffer`](crate::GapBuffer) operations.
///
/// Over-deletion is not an error: `erase_back` and `erase_forward` saturate
/// at the available amount.
#[derive(Debug, Error)]
pub enum BufferError {
    /// Growing the backing storage failed.
    #[error("failed to grow buffer storage by {requested} bytes")]
    AllocationFailed {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// The cursor was obtained before the gap moved or the storage changed.
    #[error("cursor from generation {cursor_generation} used on buffer at generation {buffer_generation}")]
    StaleCursor {
        cursor_generation: u64,
        buffer_generation: u64,
    },

    /// The cursor was handed out by a different buffer.
    #[error("cursor belongs to a different buffer")]
    ForeignCursor,

    /// A cursor or logical index lies outside `[0, len]`.
    #[error("position {position} is out of bounds for buffer of length {len}")]
    OutOfBounds { position: isize, len: usize },

    /// An erase range whose start lies after its end.
    #[error("inverted range: {from} > {to}")]
    InvertedRange { from: usize, to: usize },
}

/// Result alias for buffer operations.
pub type Result<T, E = BufferError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = BufferError::OutOfBounds {
            position: -3,
            len: 10,
        };
        assert_eq!(
            err.to_string(),
            "position -3 is out of bounds for buffer of length 10"
        );

        let err = BufferError::InvertedRange { from: 7, to: 2 };
        assert_eq!(err.to_string(), "inverted range: 7 > 2");

        assert_eq!(
            BufferError::ForeignCursor.to_string(),
            "cursor belongs to a different buffer"
        );
    }

    #[test]
    fn test_allocation_failure_keeps_source() {
        let source = Vec::<u8>::new().try_reserve_exact(usize::MAX).unwrap_err();
        let err = BufferError::AllocationFailed {
            requested: usize::MAX,
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
