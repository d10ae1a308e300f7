// Chunk: docs/chunks/text_buffer - Text buffer data structure with gap buffer backing
// Chunk: docs/chunks/byte_gap_buffer - Byte storage, range erase and relocation

//! gapline-buffer: the editable text store behind the gapline editor.
//!
//! This crate provides a gap buffer of UTF-8 code units together with the
//! cursors and iterators that let callers treat the split storage as one
//! contiguous sequence. It does not know about characters, lines or files;
//! those belong to the layers above it.
//!
//! # Overview
//!
//! The main type is [`GapBuffer`], which provides:
//! - Insertion at the gap in amortized O(1)
//! - Saturating deletion before and after the gap
//! - Range erasure that moves the gap as little as possible
//! - Gap relocation in O(distance)
//! - Random access, iteration and contiguous chunk reads
//!
//! # Example
//!
//! ```
//! use gapline_buffer::GapBuffer;
//!
//! let mut buffer = GapBuffer::new();
//! buffer.insert_str("two,").unwrap();
//!
//! buffer.place_gap(buffer.begin()).unwrap();
//! buffer.insert_str("one,").unwrap();
//!
//! buffer.place_gap(buffer.end()).unwrap();
//! buffer.insert_str("three").unwrap();
//!
//! assert_eq!(buffer.to_string(), "one,two,three");
//! ```
//!
//! # Cursors
//!
//! [`Cursor`] values are detached positions tagged with the buffer's
//! generation. Any insert, erase or relocation starts a new generation, and
//! passing an older cursor back to the buffer yields
//! [`BufferError::StaleCursor`] instead of touching the wrong bytes:
//!
//! ```
//! use gapline_buffer::{BufferError, GapBuffer};
//!
//! let mut buffer = GapBuffer::from_str("abc");
//! let start = buffer.begin();
//! buffer.insert_str("d").unwrap();
//! assert!(matches!(
//!     buffer.place_gap(start),
//!     Err(BufferError::StaleCursor { .. })
//! ));
//! ```

mod cursor;
mod error;
mod gap_buffer;
mod iter;

pub use cursor::{physical_offset, Cursor, CursorMut, CursorRef};
pub use error::{BufferError, Result};
pub use gap_buffer::{GapBuffer, GROWTH_FACTOR, MIN_CAPACITY};
pub use iter::{Inserter, Iter, IterMut};
