// Chunk: docs/chunks/checked_cursors - Gap-relative cursors with generation checks

//! Cursors into a [`GapBuffer`].
//!
//! A cursor position is stored relative to the gap: `0` is the gap itself,
//! negative offsets count back into the text before the gap, and non-negative
//! offsets count forward from the end of the gap. Translating such an offset
//! to a physical index is the job of [`physical_offset`].
//!
//! [`Cursor`] is a detached `Copy` token that can be handed back to mutating
//! buffer operations. It records the buffer generation it was taken at, so a
//! cursor that outlived an insert, erase or relocation is rejected rather than
//! silently reading the wrong byte. [`CursorRef`] and [`CursorMut`] bind a
//! cursor to a borrowed buffer for reading and in-place writes.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::gap_buffer::GapBuffer;

/// Translates a gap-relative offset into a physical index into the storage.
///
/// Non-negative offsets are measured from `gap_end`, negative offsets from
/// `gap_start`. Returns `None` when a negative offset reaches before the
/// start of the storage. The result is not checked against the capacity.
pub fn physical_offset(gap_relative: isize, gap_start: usize, gap_end: usize) -> Option<usize> {
    if gap_relative >= 0 {
        gap_end.checked_add(gap_relative.unsigned_abs())
    } else {
        gap_start.checked_sub(gap_relative.unsigned_abs())
    }
}

/// A position in a gap buffer, detached from any borrow of it.
///
/// Cursors are only meaningful for the buffer and generation they were
/// created at. Arithmetic saturates and never fails; bounds are checked when
/// the cursor is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    offset: isize,
    generation: u64,
    buffer_id: u64,
}

impl Cursor {
    pub(crate) fn new(offset: isize, generation: u64, buffer_id: u64) -> Self {
        Self {
            offset,
            generation,
            buffer_id,
        }
    }

    /// Returns the gap-relative offset of this cursor.
    pub fn gap_relative(&self) -> isize {
        self.offset
    }

    /// Returns the buffer generation this cursor was created at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the identity of the buffer this cursor belongs to.
    pub fn buffer_id(&self) -> u64 {
        self.buffer_id
    }

    /// Returns the cursor one byte further on.
    #[must_use]
    pub fn forward(self) -> Self {
        self.advance(1)
    }

    /// Returns the cursor one byte back.
    #[must_use]
    pub fn backward(self) -> Self {
        self.advance(-1)
    }

    /// Returns the cursor moved by `distance` bytes (negative moves back).
    #[must_use]
    pub fn advance(self, distance: isize) -> Self {
        Self {
            offset: self.offset.saturating_add(distance),
            ..self
        }
    }

    /// Signed number of bytes from this cursor to `other`.
    pub fn distance_to(self, other: Cursor) -> isize {
        other.offset.saturating_sub(self.offset)
    }
}

impl PartialOrd for Cursor {
    /// Cursors from different buffers or generations are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.generation == other.generation && self.buffer_id == other.buffer_id)
            .then(|| self.offset.cmp(&other.offset))
    }
}

impl Add<isize> for Cursor {
    type Output = Cursor;

    fn add(self, rhs: isize) -> Cursor {
        self.advance(rhs)
    }
}

impl Sub<isize> for Cursor {
    type Output = Cursor;

    fn sub(self, rhs: isize) -> Cursor {
        self.advance(rhs.saturating_neg())
    }
}

impl Sub for Cursor {
    type Output = isize;

    fn sub(self, rhs: Cursor) -> isize {
        rhs.distance_to(self)
    }
}

impl AddAssign<isize> for Cursor {
    fn add_assign(&mut self, rhs: isize) {
        *self = self.advance(rhs);
    }
}

impl SubAssign<isize> for Cursor {
    fn sub_assign(&mut self, rhs: isize) {
        *self = self.advance(rhs.saturating_neg());
    }
}

/// A read-only cursor bound to a buffer.
///
/// Created with [`GapBuffer::cursor_ref`]. The shared borrow keeps the buffer
/// from changing underneath it.
#[derive(Debug, Clone, Copy)]
pub struct CursorRef<'a> {
    buffer: &'a GapBuffer,
    cursor: Cursor,
}

impl<'a> CursorRef<'a> {
    pub(crate) fn new(buffer: &'a GapBuffer, cursor: Cursor) -> Self {
        Self { buffer, cursor }
    }

    /// Returns the byte under the cursor, or `None` at the end of the buffer
    /// or after moving out of bounds.
    pub fn get(&self) -> Option<u8> {
        self.buffer.byte_at_offset(self.cursor.gap_relative())
    }

    /// Returns the detached position of this cursor.
    pub fn position(&self) -> Cursor {
        self.cursor
    }

    /// Returns the logical index of the cursor if it lies within `[0, len]`.
    pub fn logical_index(&self) -> Option<usize> {
        self.buffer.logical_index(self.cursor)
    }

    /// Steps one byte forward.
    pub fn forward(&mut self) {
        self.cursor = self.cursor.forward();
    }

    /// Steps one byte back.
    pub fn backward(&mut self) {
        self.cursor = self.cursor.backward();
    }

    /// Moves by `distance` bytes (negative moves back).
    pub fn advance(&mut self, distance: isize) {
        self.cursor = self.cursor.advance(distance);
    }

    /// Signed number of bytes from this cursor to `other`.
    pub fn distance_to(&self, other: &CursorRef<'_>) -> isize {
        self.cursor.distance_to(other.cursor)
    }
}

impl PartialEq for CursorRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.buffer, other.buffer) && self.cursor == other.cursor
    }
}

impl Eq for CursorRef<'_> {}

/// A cursor that can write through to the byte under it.
///
/// Created with [`GapBuffer::cursor_mut`]. Converts one way into a
/// [`CursorRef`]; there is no conversion back.
#[derive(Debug)]
pub struct CursorMut<'a> {
    buffer: &'a mut GapBuffer,
    cursor: Cursor,
}

impl<'a> CursorMut<'a> {
    pub(crate) fn new(buffer: &'a mut GapBuffer, cursor: Cursor) -> Self {
        Self { buffer, cursor }
    }

    /// Returns the byte under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<u8> {
        self.buffer.byte_at_offset(self.cursor.gap_relative())
    }

    /// Returns a mutable reference to the byte under the cursor.
    pub fn get_mut(&mut self) -> Option<&mut u8> {
        self.buffer.byte_at_offset_mut(self.cursor.gap_relative())
    }

    /// Overwrites the byte under the cursor. Returns `false` at the end.
    pub fn set(&mut self, byte: u8) -> bool {
        match self.get_mut() {
            Some(slot) => {
                *slot = byte;
                true
            }
            None => false,
        }
    }

    /// Returns the detached position of this cursor.
    pub fn position(&self) -> Cursor {
        self.cursor
    }

    /// Returns the logical index of the cursor if it lies within `[0, len]`.
    pub fn logical_index(&self) -> Option<usize> {
        self.buffer.logical_index(self.cursor)
    }

    /// Steps one byte forward.
    pub fn forward(&mut self) {
        self.cursor = self.cursor.forward();
    }

    /// Steps one byte back.
    pub fn backward(&mut self) {
        self.cursor = self.cursor.backward();
    }

    /// Moves by `distance` bytes (negative moves back).
    pub fn advance(&mut self, distance: isize) {
        self.cursor = self.cursor.advance(distance);
    }

    /// Signed number of bytes from this cursor to `other`.
    pub fn distance_to(&self, other: Cursor) -> isize {
        self.cursor.distance_to(other)
    }

    /// Reborrows as a read-only cursor.
    pub fn reborrow(&self) -> CursorRef<'_> {
        CursorRef::new(self.buffer, self.cursor)
    }

    /// Gives up write access, keeping the position.
    pub fn into_ref(self) -> CursorRef<'a> {
        CursorRef::new(self.buffer, self.cursor)
    }
}

impl<'a> From<CursorMut<'a>> for CursorRef<'a> {
    fn from(cursor: CursorMut<'a>) -> Self {
        cursor.into_ref()
    }
}
