// Chunk: docs/chunks/text_buffer - Text buffer data structure with gap buffer backing
// Chunk: docs/chunks/byte_gap_buffer - Byte storage, range erase and relocation

//! Gap buffer implementation for efficient text editing.
//!
//! A gap buffer is a byte array with a movable gap at the edit point.
//! Insertions and deletions at the gap are O(1); moving the gap is
//! O(gap_distance) but amortizes well for typical editing patterns
//! (locality of edits).
//!
//! Storage layout:
//!
//! ```text
//! data: [---prefix---][====gap====][---suffix---]
//!       0         gap_start     gap_end      capacity
//! ```
//!
//! Every byte inside the gap is zero whenever no operation is in progress.

use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hasher};
use std::ops::{Index, IndexMut};

use tracing::{debug, trace};

use crate::cursor::{physical_offset, Cursor, CursorMut, CursorRef};
use crate::error::{BufferError, Result};
use crate::iter::{Inserter, Iter, IterMut};

/// Smallest allocation made when the buffer first grows.
pub const MIN_CAPACITY: usize = 64;
/// Capacity multiplier applied on each growth.
pub const GROWTH_FACTOR: usize = 2;

#[cfg(debug_assertions)]
const GAP_CHECK_INTERVAL: u64 = 1024;

/// Identity tag for a new buffer. Each `RandomState` is seeded differently,
/// so distinct buffers get distinct tags with overwhelming probability.
fn next_buffer_id() -> u64 {
    RandomState::new().build_hasher().finish()
}

/// A gap buffer of UTF-8 code units.
///
/// Positions handed out by [`begin`](Self::begin), [`end`](Self::end) and
/// [`gap`](Self::gap) are [`Cursor`]s tagged with the current generation.
/// Every change to the layout (insert, erase, relocation, growth) starts a
/// new generation, and operations that take a cursor reject ones from an
/// older generation. Cursors also carry the identity of the buffer that made
/// them, so a cursor from another buffer (or a clone) is rejected too.
pub struct GapBuffer {
    /// The underlying storage. Contains [prefix | gap | suffix].
    data: Vec<u8>,
    /// Index where the gap starts (first unused position).
    gap_start: usize,
    /// Index where the gap ends (first used position after gap).
    gap_end: usize,
    /// Bumped on every layout change.
    generation: u64,
    /// Distinguishes cursors of this buffer from those of any other.
    id: u64,
}

impl GapBuffer {
    /// Creates a new empty gap buffer without allocating.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            gap_start: 0,
            gap_end: 0,
            generation: 0,
            id: next_buffer_id(),
        }
    }

    /// Creates an empty buffer whose gap holds `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            gap_start: 0,
            gap_end: capacity,
            generation: 0,
            id: next_buffer_id(),
        }
    }

    /// Creates a gap buffer initialized with the given bytes, gap at the end.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let len = bytes.len();
        let capacity = len + MIN_CAPACITY;

        let mut data = Vec::with_capacity(capacity);
        data.extend_from_slice(bytes);
        data.resize(capacity, 0);

        Self {
            data,
            gap_start: len,
            gap_end: capacity,
            generation: 0,
            id: next_buffer_id(),
        }
    }

    /// Creates a gap buffer initialized with the given text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Builds a buffer by inserting each byte at the gap in turn, reporting
    /// allocation failure instead of aborting.
    pub fn try_from_iter<I>(bytes: I) -> Result<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut buffer = Self::new();
        let gap = buffer.gap();
        buffer.inserter(gap)?.extend_from(bytes)?;
        Ok(buffer)
    }

    // ==================== Accessors ====================

    /// Returns the logical length of the buffer (excluding the gap).
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    /// Alias for [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the physical size of the storage, gap included.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the current gap size.
    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Returns the logical offset of the gap.
    pub fn gap_position(&self) -> usize {
        self.gap_start
    }

    /// Returns the current layout generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the identity carried by every cursor this buffer hands out.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the raw physical storage, gap included.
    ///
    /// Use [`begin`](Self::begin), [`gap`](Self::gap) and [`end`](Self::end)
    /// (or simply [`as_slices`](Self::as_slices)) to tell which part of it is
    /// the prefix and which the suffix.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the text before and after the gap.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        (&self.data[..self.gap_start], &self.data[self.gap_end..])
    }

    /// Returns true if every byte in the gap is zero.
    pub fn gap_is_zeroed(&self) -> bool {
        self.data[self.gap_start..self.gap_end]
            .iter()
            .all(|&byte| byte == 0)
    }

    // ==================== Cursors ====================

    /// Cursor at the first logical byte.
    pub fn begin(&self) -> Cursor {
        Cursor::new(-(self.gap_start as isize), self.generation, self.id)
    }

    /// Cursor one past the last logical byte.
    pub fn end(&self) -> Cursor {
        Cursor::new(
            (self.data.len() - self.gap_end) as isize,
            self.generation,
            self.id,
        )
    }

    /// Cursor at the gap, i.e. the edit point.
    pub fn gap(&self) -> Cursor {
        Cursor::new(0, self.generation, self.id)
    }

    /// Cursor at a logical index in `[0, len]`.
    pub fn cursor_at(&self, index: usize) -> Result<Cursor> {
        if index > self.len() {
            return Err(BufferError::OutOfBounds {
                position: index as isize,
                len: self.len(),
            });
        }
        Ok(self.begin().advance(index as isize))
    }

    /// Binds a cursor to this buffer for reading.
    pub fn cursor_ref(&self, cursor: Cursor) -> Result<CursorRef<'_>> {
        self.check_cursor(cursor)?;
        Ok(CursorRef::new(self, cursor))
    }

    /// Binds a cursor to this buffer for reading and writing bytes in place.
    pub fn cursor_mut(&mut self, cursor: Cursor) -> Result<CursorMut<'_>> {
        self.check_cursor(cursor)?;
        Ok(CursorMut::new(self, cursor))
    }

    /// Returns the logical index of `cursor` if it is current and in bounds.
    pub fn logical_index(&self, cursor: Cursor) -> Option<usize> {
        self.check_cursor(cursor).ok()
    }

    /// Validates a cursor and returns its logical index.
    fn check_cursor(&self, cursor: Cursor) -> Result<usize> {
        if cursor.buffer_id() != self.id {
            return Err(BufferError::ForeignCursor);
        }
        if cursor.generation() != self.generation {
            return Err(BufferError::StaleCursor {
                cursor_generation: cursor.generation(),
                buffer_generation: self.generation,
            });
        }
        let position = (self.gap_start as isize).saturating_add(cursor.gap_relative());
        if position < 0 || position > self.len() as isize {
            return Err(BufferError::OutOfBounds {
                position,
                len: self.len(),
            });
        }
        Ok(position as usize)
    }

    /// Physical index of the byte at a gap-relative offset, if there is one.
    fn byte_offset(&self, gap_relative: isize) -> Option<usize> {
        physical_offset(gap_relative, self.gap_start, self.gap_end)
            .filter(|&index| index < self.data.len())
    }

    pub(crate) fn byte_at_offset(&self, gap_relative: isize) -> Option<u8> {
        self.byte_offset(gap_relative).map(|index| self.data[index])
    }

    pub(crate) fn byte_at_offset_mut(&mut self, gap_relative: isize) -> Option<&mut u8> {
        self.byte_offset(gap_relative)
            .map(move |index| &mut self.data[index])
    }

    /// Physical index of a logical index, if it names a byte.
    fn logical_to_physical(&self, index: usize) -> Option<usize> {
        if index >= self.len() {
            return None;
        }
        self.byte_offset(index as isize - self.gap_start as isize)
    }

    // ==================== Reading ====================

    /// Returns the byte at the given logical position.
    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.logical_to_physical(index).map(|i| self.data[i])
    }

    /// Returns a mutable reference to the byte at the given logical position.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut u8> {
        self.logical_to_physical(index)
            .map(move |i| &mut self.data[i])
    }

    /// Returns the longest contiguous run of bytes starting at a logical
    /// offset. The run stops at the gap or the end of the buffer; an empty
    /// slice means there is nothing left to read.
    ///
    /// This is the read callback shape incremental parsers expect.
    pub fn chunk_at(&self, offset: usize) -> &[u8] {
        if offset < self.gap_start {
            &self.data[offset..self.gap_start]
        } else if offset < self.len() {
            &self.data[offset + self.gap_len()..]
        } else {
            &[]
        }
    }

    /// Returns the non-empty contiguous runs of the buffer in order.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let (prefix, suffix) = self.as_slices();
        [prefix, suffix].into_iter().filter(|chunk| !chunk.is_empty())
    }

    /// Returns an iterator over all bytes in the buffer.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self, self.begin(), self.end())
    }

    /// Returns a mutable iterator over all bytes in the buffer.
    pub fn iter_mut(&mut self) -> IterMut<'_> {
        let (head, suffix) = self.data.split_at_mut(self.gap_end);
        IterMut::new(&mut head[..self.gap_start], suffix)
    }

    /// Returns an iterator over the bytes in `[from, to)`.
    pub fn range(&self, from: Cursor, to: Cursor) -> Result<Iter<'_>> {
        let (from_index, to_index) = (self.check_cursor(from)?, self.check_cursor(to)?);
        if from_index > to_index {
            return Err(BufferError::InvertedRange {
                from: from_index,
                to: to_index,
            });
        }
        Ok(Iter::new(self, from, to))
    }

    /// Returns the content of a logical range, clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> Vec<u8> {
        let start = start.min(self.len());
        let end = end.min(self.len());
        if start >= end {
            return Vec::new();
        }
        self.iter().skip(start).take(end - start).collect()
    }

    /// Copies the logical content into a contiguous vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let (prefix, suffix) = self.as_slices();
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(prefix);
        out.extend_from_slice(suffix);
        out
    }

    // ==================== Mutations ====================

    /// Ensures the gap can hold at least `extra` more bytes.
    ///
    /// Growth keeps the gap where it is: the suffix is shifted to the end of
    /// the enlarged storage and the widened gap is zero-filled. Capacity at
    /// least doubles on each growth, so repeated inserts are amortized O(1).
    pub fn accommodate(&mut self, extra: usize) -> Result<()> {
        if extra <= self.gap_len() {
            return Ok(());
        }

        let old_capacity = self.data.len();
        let required = self.len().saturating_add(extra);
        let mut new_capacity = required
            .max(old_capacity.saturating_mul(GROWTH_FACTOR))
            .max(MIN_CAPACITY);

        if self
            .data
            .try_reserve_exact(new_capacity - old_capacity)
            .is_err()
        {
            // Doubling was too ambitious; settle for exactly what is needed.
            new_capacity = required;
            self.data
                .try_reserve_exact(new_capacity - old_capacity)
                .map_err(|source| BufferError::AllocationFailed {
                    requested: extra,
                    source,
                })?;
        }
        self.data.resize(new_capacity, 0);

        let suffix_len = old_capacity - self.gap_end;
        let new_gap_end = new_capacity - suffix_len;
        self.data.copy_within(self.gap_end..old_capacity, new_gap_end);
        self.data[self.gap_end..new_gap_end].fill(0);
        self.gap_end = new_gap_end;

        debug!(old_capacity, new_capacity, extra, "grew gap buffer storage");
        self.touch();
        Ok(())
    }

    /// Inserts bytes at the gap. The gap ends up just after them.
    pub fn insert(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.accommodate(bytes.len())?;
        let end = self.gap_start + bytes.len();
        self.data[self.gap_start..end].copy_from_slice(bytes);
        self.gap_start = end;
        self.touch();
        Ok(())
    }

    /// Inserts a string at the gap.
    pub fn insert_str(&mut self, text: &str) -> Result<()> {
        self.insert(text.as_bytes())
    }

    /// Moves the gap to `at`, inserts one byte there, and returns the cursor
    /// just after it.
    pub fn insert_at(&mut self, at: Cursor, byte: u8) -> Result<Cursor> {
        self.place_gap(at)?;
        self.insert(&[byte])?;
        Ok(self.gap())
    }

    /// Returns an adapter that inserts bytes one by one at `at`.
    pub fn inserter(&mut self, at: Cursor) -> Result<Inserter<'_>> {
        self.place_gap(at)?;
        Ok(Inserter::new(self))
    }

    /// Deletes up to `n` bytes before the gap (backspace).
    ///
    /// Asking for more than is there deletes everything before the gap.
    /// Returns the new gap cursor.
    pub fn erase_back(&mut self, n: usize) -> Cursor {
        let n = n.min(self.gap_start);
        if n > 0 {
            self.gap_start -= n;
            self.data[self.gap_start..self.gap_start + n].fill(0);
            self.touch();
        }
        self.gap()
    }

    /// Deletes up to `n` bytes after the gap (delete key).
    ///
    /// Saturates at the end of the buffer. Returns the new gap cursor.
    pub fn erase_forward(&mut self, n: usize) -> Cursor {
        let n = n.min(self.data.len() - self.gap_end);
        if n > 0 {
            self.data[self.gap_end..self.gap_end + n].fill(0);
            self.gap_end += n;
            self.touch();
        }
        self.gap()
    }

    /// Deletes the logical range `[from, to)` and returns the gap cursor,
    /// which ends up where the range was.
    ///
    /// When the gap already sits inside the range nothing is relocated.
    /// Otherwise the gap moves only as far as the nearer end of the range.
    pub fn erase(&mut self, from: Cursor, to: Cursor) -> Result<Cursor> {
        let from_index = self.check_cursor(from)?;
        let to_index = self.check_cursor(to)?;
        if from_index > to_index {
            return Err(BufferError::InvertedRange {
                from: from_index,
                to: to_index,
            });
        }

        let gap = self.gap_start;
        if (from_index..=to_index).contains(&gap) {
            trace!(from_index, to_index, gap, "erasing around gap");
            self.erase_back(gap - from_index);
            self.erase_forward(to_index - gap);
        } else if gap < from_index {
            trace!(from_index, to_index, gap, "erasing after gap");
            self.move_gap_to(from_index);
            self.erase_forward(to_index - from_index);
        } else {
            trace!(from_index, to_index, gap, "erasing before gap");
            self.move_gap_to(to_index);
            self.erase_back(to_index - from_index);
        }
        Ok(self.gap())
    }

    /// Moves the gap to the position of `pos`.
    pub fn place_gap(&mut self, pos: Cursor) -> Result<()> {
        let index = self.check_cursor(pos)?;
        self.move_gap_to(index);
        Ok(())
    }

    /// Moves the gap to the specified logical position (clamped to `len`).
    ///
    /// This is O(distance) where distance is the absolute difference between
    /// the current gap position and the target position.
    pub fn move_gap_to(&mut self, pos: usize) {
        let pos = pos.min(self.len());
        let (old_start, old_end) = (self.gap_start, self.gap_end);
        if pos == old_start {
            return;
        }

        if pos > old_start {
            // Move gap right: shift [gap_end..gap_end + shift] down to gap_start.
            let shift = pos - old_start;
            self.data.copy_within(old_end..old_end + shift, old_start);
            self.gap_start += shift;
            self.gap_end += shift;
            // Only bytes that used to be suffix can be non-zero.
            let dirty_from = old_end.max(self.gap_start);
            self.data[dirty_from..self.gap_end].fill(0);
        } else {
            // Move gap left: shift [pos..gap_start] up to end at gap_end.
            let shift = old_start - pos;
            self.data.copy_within(pos..old_start, old_end - shift);
            self.gap_start = pos;
            self.gap_end -= shift;
            let dirty_to = old_start.min(self.gap_end);
            self.data[self.gap_start..dirty_to].fill(0);
        }

        trace!(from = old_start, to = pos, "relocated gap");
        self.touch();
    }

    /// Starts a new generation after a layout change.
    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.assert_gap_zeroed();
    }

    /// Samples the zero-gap invariant (debug builds only).
    #[cfg(debug_assertions)]
    fn assert_gap_zeroed(&self) {
        if self.generation % GAP_CHECK_INTERVAL != 0 {
            return;
        }
        assert!(
            self.gap_is_zeroed(),
            "gap [{}, {}) holds non-zero bytes at generation {}",
            self.gap_start,
            self.gap_end,
            self.generation,
        );
    }

    #[cfg(not(debug_assertions))]
    fn assert_gap_zeroed(&self) {}
}

impl Index<usize> for GapBuffer {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        match self.logical_to_physical(index) {
            Some(physical) => &self.data[physical],
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            ),
        }
    }
}

impl IndexMut<usize> for GapBuffer {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        match self.logical_to_physical(index) {
            Some(physical) => &mut self.data[physical],
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            ),
        }
    }
}

impl PartialEq for GapBuffer {
    /// Buffers are equal when their logical content is, wherever the gaps are.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for GapBuffer {}

impl From<&str> for GapBuffer {
    fn from(text: &str) -> Self {
        Self::from_str(text)
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for GapBuffer {
    /// Copies the content and layout. The copy is a new buffer: cursors of
    /// the original are foreign to it.
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            gap_start: self.gap_start,
            gap_end: self.gap_end,
            generation: self.generation,
            id: next_buffer_id(),
        }
    }
}

impl From<Vec<u8>> for GapBuffer {
    /// Takes ownership of the bytes; the gap starts out empty at the end.
    fn from(data: Vec<u8>) -> Self {
        let len = data.len();
        Self {
            data,
            gap_start: len,
            gap_end: len,
            generation: 0,
            id: next_buffer_id(),
        }
    }
}

impl FromIterator<u8> for GapBuffer {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<u8>>())
    }
}

impl fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_vec()))
    }
}

impl fmt::Debug for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GapBuffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("gap_start", &self.gap_start)
            .field("gap_end", &self.gap_end)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_empty() {
        let buf = GapBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.begin(), buf.end());
    }

    #[test]
    fn test_with_capacity() {
        let buf = GapBuffer::with_capacity(16);
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.gap_len(), 16);
        assert!(buf.gap_is_zeroed());
    }

    #[test]
    fn test_from_str() {
        let buf = GapBuffer::from_str("hello");
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.to_string(), "hello");
        assert_eq!(buf.gap_position(), 5);
    }

    #[test]
    fn test_from_vec_has_empty_gap() {
        let mut buf = GapBuffer::from(b"abc".to_vec());
        assert_eq!(buf.gap_len(), 0);
        assert_eq!(buf.capacity(), 3);
        buf.insert(b"d").unwrap();
        assert_eq!(buf.to_string(), "abcd");
        assert!(buf.gap_is_zeroed());
    }

    #[test]
    fn test_collect_and_try_from_iter_agree() {
        let collected: GapBuffer = b"bytes".iter().copied().collect();
        let inserted = GapBuffer::try_from_iter(b"bytes".iter().copied()).unwrap();
        assert_eq!(collected, inserted);
        assert_eq!(inserted.to_vec(), b"bytes");
    }

    #[test]
    fn test_insert() {
        let mut buf = GapBuffer::new();
        buf.insert(b"a").unwrap();
        buf.insert(b"b").unwrap();
        buf.insert(b"c").unwrap();
        assert_eq!(buf.to_string(), "abc");
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.gap(), buf.end());
    }

    #[test]
    fn test_insert_empty_is_noop() {
        let mut buf = GapBuffer::from_str("x");
        let generation = buf.generation();
        buf.insert(b"").unwrap();
        assert_eq!(buf.generation(), generation);
    }

    #[test]
    fn test_insert_at_middle() {
        let mut buf = GapBuffer::from_str("ac");
        let after = buf.insert_at(buf.begin() + 1, b'b').unwrap();
        assert_eq!(buf.to_string(), "abc");
        assert_eq!(after, buf.gap());
        assert_eq!(buf.logical_index(after), Some(2));
    }

    #[test]
    fn test_growth_preserves_suffix() {
        let mut buf = GapBuffer::new();
        buf.insert_str("tail").unwrap();
        buf.move_gap_to(0);
        let big = vec![b'x'; 500];
        buf.insert(&big).unwrap();
        assert_eq!(buf.len(), 504);
        assert_eq!(buf.slice(500, 504), b"tail");
        assert_eq!(buf.gap_position(), 500);
        assert!(buf.gap_is_zeroed());
    }

    #[test]
    fn test_growth_at_least_doubles() {
        let mut buf = GapBuffer::from(vec![b'a'; 100]);
        buf.accommodate(1).unwrap();
        assert_eq!(buf.capacity(), 200);
        assert_eq!(buf.gap_len(), 100);
    }

    #[test]
    fn test_accommodate_within_gap_is_noop() {
        let mut buf = GapBuffer::with_capacity(10);
        buf.accommodate(10).unwrap();
        assert_eq!(buf.capacity(), 10);
        assert_eq!(buf.generation(), 0);
    }

    #[test]
    fn test_accommodate_reports_allocation_failure() {
        let mut buf = GapBuffer::from_str("x");
        let err = buf.accommodate(usize::MAX).unwrap_err();
        assert!(matches!(err, BufferError::AllocationFailed { .. }));
        assert_eq!(buf.to_string(), "x");
    }

    #[test]
    fn test_erase_back() {
        let mut buf = GapBuffer::new();
        buf.insert_str("erase this").unwrap();
        let gap = buf.erase_back(5);
        assert_eq!(buf.to_string(), "erase");
        assert_eq!(gap, buf.gap());
        assert!(buf.gap_is_zeroed());
    }

    #[test]
    fn test_erase_forward() {
        let mut buf = GapBuffer::new();
        buf.insert_str("erase this, please").unwrap();
        buf.place_gap(buf.end() - 13).unwrap();
        buf.erase_forward(5);
        assert_eq!(buf.to_string(), "erase, please");
        assert!(buf.gap_is_zeroed());
    }

    #[test]
    fn test_over_erase_back_saturates() {
        let mut buf = GapBuffer::new();
        buf.insert_str("XXXtest").unwrap();
        buf.place_gap(buf.begin() + 3).unwrap();
        buf.erase_back(10);
        assert_eq!(buf.to_string(), "test");
        assert_eq!(buf.gap(), buf.begin());
    }

    #[test]
    fn test_over_erase_forward_saturates() {
        let mut buf = GapBuffer::new();
        buf.insert_str("testXXX").unwrap();
        buf.place_gap(buf.end() - 3).unwrap();
        buf.erase_forward(10);
        assert_eq!(buf.to_string(), "test");
        assert_eq!(buf.gap(), buf.end());
    }

    #[test]
    fn test_erase_on_empty_buffer() {
        let mut buf = GapBuffer::new();
        assert_eq!(buf.erase_back(3), buf.gap());
        assert_eq!(buf.erase_forward(3), buf.gap());
        let gap = buf.erase(buf.begin(), buf.end()).unwrap();
        assert_eq!(gap, buf.end());
    }

    #[test]
    fn test_erase_inverted_range() {
        let mut buf = GapBuffer::from_str("abc");
        let err = buf.erase(buf.end(), buf.begin()).unwrap_err();
        assert!(matches!(err, BufferError::InvertedRange { from: 3, to: 0 }));
        assert_eq!(buf.to_string(), "abc");
    }

    #[test]
    fn test_stale_cursor_rejected() {
        let mut buf = GapBuffer::from_str("abc");
        let begin = buf.begin();
        buf.insert(b"d").unwrap();
        let err = buf.place_gap(begin).unwrap_err();
        assert!(matches!(err, BufferError::StaleCursor { .. }));
        assert!(buf.cursor_ref(begin).is_err());
    }

    #[test]
    fn test_out_of_bounds_cursor_rejected() {
        let mut buf = GapBuffer::from_str("abc");
        let err = buf.place_gap(buf.end() + 1).unwrap_err();
        assert!(matches!(
            err,
            BufferError::OutOfBounds {
                position: 4,
                len: 3
            }
        ));
        assert!(buf.place_gap(buf.begin() - 1).is_err());
        assert!(buf.cursor_at(4).is_err());
    }

    #[test]
    fn test_extreme_cursor_arithmetic_is_out_of_bounds() {
        let mut buf = GapBuffer::from_str("abc");
        let err = buf.place_gap(buf.begin() - isize::MAX).unwrap_err();
        assert!(matches!(err, BufferError::OutOfBounds { len: 3, .. }));
        assert!(buf.place_gap(buf.begin() - isize::MIN).is_err());
        assert!(buf.place_gap(buf.end() + isize::MAX).is_err());
        assert!(buf.erase(buf.begin() - isize::MAX, buf.end()).is_err());
        assert_eq!(buf.begin().distance_to(buf.end() + isize::MAX), isize::MAX);
        assert_eq!(buf.to_string(), "abc");
        assert_eq!(buf.gap_position(), 3);
    }

    #[test]
    fn test_foreign_cursor_rejected() {
        let a = GapBuffer::from_str("abcdef");
        let mut b = GapBuffer::from_str("0123456789");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.generation(), b.generation());

        let err = b.erase(a.begin(), a.end()).unwrap_err();
        assert!(matches!(err, BufferError::ForeignCursor));
        assert_eq!(b.to_string(), "0123456789");
        assert!(b.place_gap(a.gap()).is_err());
        assert!(b.cursor_ref(a.begin()).is_err());
        assert_eq!(b.logical_index(a.end()), None);
        assert_eq!(b.gap_position(), 10);
    }

    #[test]
    fn test_clone_rejects_original_cursors() {
        let buf = GapBuffer::from_str("shared");
        let mut copy = buf.clone();
        let err = copy.place_gap(buf.begin()).unwrap_err();
        assert!(matches!(err, BufferError::ForeignCursor));
        copy.place_gap(copy.begin()).unwrap();
        assert_eq!(copy, buf);
    }

    #[test]
    fn test_move_gap() {
        let mut buf = GapBuffer::from_str("abcdef");
        assert_eq!(buf.gap_position(), 6);

        buf.move_gap_to(3);
        assert_eq!(buf.gap_position(), 3);
        assert_eq!(buf.to_string(), "abcdef");

        buf.move_gap_to(0);
        assert_eq!(buf.gap_position(), 0);
        assert_eq!(buf.to_string(), "abcdef");

        buf.move_gap_to(6);
        assert_eq!(buf.gap_position(), 6);
        assert_eq!(buf.to_string(), "abcdef");
        assert!(buf.gap_is_zeroed());
    }

    #[test]
    fn test_move_gap_further_than_gap_len() {
        // A 2-byte gap moved across 6 and then 5 bytes.
        let mut buf = GapBuffer::with_capacity(9);
        buf.insert_str("abcdefg").unwrap();
        assert_eq!(buf.gap_len(), 2);
        let capacity = buf.capacity();
        buf.move_gap_to(1);
        assert_eq!(buf.to_string(), "abcdefg");
        assert!(buf.gap_is_zeroed());
        buf.move_gap_to(6);
        assert_eq!(buf.to_string(), "abcdefg");
        assert!(buf.gap_is_zeroed());
        buf.move_gap_to(1);
        assert_eq!(buf.to_string(), "abcdefg");
        assert!(buf.gap_is_zeroed());
        assert_eq!(buf.capacity(), capacity);
    }

    #[test]
    fn test_move_gap_clamps() {
        let mut buf = GapBuffer::from_str("abc");
        buf.move_gap_to(0);
        buf.move_gap_to(100);
        assert_eq!(buf.gap_position(), 3);
    }

    #[test]
    fn test_place_gap_same_position_keeps_generation() {
        let mut buf = GapBuffer::from_str("abc");
        let generation = buf.generation();
        buf.place_gap(buf.gap()).unwrap();
        assert_eq!(buf.generation(), generation);
    }

    #[test]
    fn test_byte_at() {
        let buf = GapBuffer::from_str("hello");
        assert_eq!(buf.byte_at(0), Some(b'h'));
        assert_eq!(buf.byte_at(4), Some(b'o'));
        assert_eq!(buf.byte_at(5), None);
    }

    #[test]
    fn test_byte_at_with_gap_in_middle() {
        let mut buf = GapBuffer::from_str("hello");
        buf.move_gap_to(2);
        assert_eq!(buf.byte_at(0), Some(b'h'));
        assert_eq!(buf.byte_at(1), Some(b'e'));
        assert_eq!(buf.byte_at(2), Some(b'l'));
        assert_eq!(buf.byte_at(3), Some(b'l'));
        assert_eq!(buf.byte_at(4), Some(b'o'));
    }

    #[test]
    fn test_index_and_index_mut() {
        let mut buf = GapBuffer::from_str("hello");
        buf.move_gap_to(2);
        assert_eq!(buf[3], b'l');
        buf[0] = b'j';
        buf[4] = b'y';
        assert_eq!(buf.to_string(), "jelly");
        *buf.get_mut(1).unwrap() = b'o';
        assert_eq!(buf.to_string(), "jolly");
        assert!(buf.get_mut(5).is_none());
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_index_out_of_bounds_panics() {
        let buf = GapBuffer::from_str("abc");
        let _ = buf[3];
    }

    #[test]
    fn test_slice() {
        let mut buf = GapBuffer::from_str("hello world");
        buf.move_gap_to(3);
        assert_eq!(buf.slice(0, 5), b"hello");
        assert_eq!(buf.slice(6, 11), b"world");
        assert_eq!(buf.slice(0, 11), b"hello world");
        assert_eq!(buf.slice(6, 100), b"world");
        assert!(buf.slice(8, 2).is_empty());
    }

    #[test]
    fn test_range() {
        let mut buf = GapBuffer::from_str("hello world");
        buf.move_gap_to(5);
        let from = buf.begin() + 3;
        let to = buf.begin() + 8;
        let bytes: Vec<u8> = buf.range(from, to).unwrap().collect();
        assert_eq!(bytes, b"lo wo");
        assert!(buf.range(to, from).is_err());
    }

    #[test]
    fn test_chunk_at() {
        let mut buf = GapBuffer::from_str("hello world");
        buf.move_gap_to(5);
        assert_eq!(buf.chunk_at(0), b"hello");
        assert_eq!(buf.chunk_at(3), b"lo");
        assert_eq!(buf.chunk_at(5), b" world");
        assert_eq!(buf.chunk_at(10), b"d");
        assert!(buf.chunk_at(11).is_empty());
        assert!(buf.chunk_at(500).is_empty());
    }

    #[test]
    fn test_chunks() {
        let mut buf = GapBuffer::from_str("hello world");
        let whole: Vec<&[u8]> = buf.chunks().collect();
        assert_eq!(whole, vec![&b"hello world"[..]]);

        buf.move_gap_to(5);
        let split: Vec<&[u8]> = buf.chunks().collect();
        assert_eq!(split, vec![&b"hello"[..], &b" world"[..]]);

        assert_eq!(GapBuffer::new().chunks().count(), 0);
    }

    #[test]
    fn test_data_exposes_layout() {
        let mut buf = GapBuffer::from_str("abcd");
        buf.move_gap_to(2);
        let gap_start = buf.gap_position();
        let gap_end = gap_start + buf.gap_len();
        assert_eq!(&buf.data()[..gap_start], b"ab");
        assert_eq!(&buf.data()[gap_end..], b"cd");
        assert!(buf.data()[gap_start..gap_end].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_equality_ignores_gap_position() {
        let a = GapBuffer::from_str("same");
        let mut b = GapBuffer::from_str("same");
        b.move_gap_to(1);
        assert_eq!(a, b);
        assert_ne!(a, GapBuffer::from_str("sam"));
    }

    #[test]
    fn test_clone_is_snapshot() {
        let mut buf = GapBuffer::new();
        buf.insert_str("copy me").unwrap();
        let copy = buf.clone();
        buf.erase_back(3);
        assert_eq!(copy.len(), 7);
        assert_eq!(copy.to_string(), "copy me");
        assert_eq!(buf.to_string(), "copy");
    }

    #[test]
    fn test_display_joins_split_utf8() {
        let mut buf = GapBuffer::from_str("héllo");
        // Split the two bytes of 'é' across the gap.
        buf.move_gap_to(2);
        assert_eq!(buf.to_string(), "héllo");
    }

    #[test]
    fn test_debug_summary() {
        let buf = GapBuffer::from_str("ab");
        let debug = format!("{buf:?}");
        assert!(debug.contains("len: 2"));
        assert!(debug.contains("gap_start: 2"));
    }

    #[test]
    fn test_large_insert() {
        let mut buf = GapBuffer::new();
        for i in 0..1000u32 {
            buf.insert(&[b'a' + (i % 26) as u8]).unwrap();
        }
        assert_eq!(buf.len(), 1000);
        assert!(buf.gap_is_zeroed());
    }
}
