// Chunk: docs/chunks/byte_gap_buffer - Iteration and bulk insertion over the gap

//! Iterators over the logical content of a [`GapBuffer`] and the insertion
//! adapter used to stream bytes into it.

use std::io;
use std::iter::{Chain, FusedIterator};
use std::slice;

use crate::cursor::Cursor;
use crate::error::Result;
use crate::gap_buffer::GapBuffer;

/// Iterator over the bytes between two cursors, skipping the gap.
///
/// Front and back are gap-relative offsets, so stepping from `-1` to `0`
/// jumps from the last byte before the gap to the first byte after it.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    buffer: &'a GapBuffer,
    front: isize,
    back: isize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(buffer: &'a GapBuffer, front: Cursor, back: Cursor) -> Self {
        Self {
            buffer,
            front: front.gap_relative(),
            back: back.gap_relative(),
        }
    }

    /// Returns the detached cursor at the front of the remaining range.
    pub fn position(&self) -> Cursor {
        Cursor::new(self.front, self.buffer.generation(), self.buffer.id())
    }
}

impl Iterator for Iter<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.front >= self.back {
            return None;
        }
        let byte = self.buffer.byte_at_offset(self.front)?;
        self.front += 1;
        Some(byte)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back.saturating_sub(self.front).max(0).unsigned_abs();
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<u8> {
        let remaining = self.len();
        if n >= remaining {
            self.front = self.back;
            return None;
        }
        // n < remaining, which fits in isize
        self.front += n as isize;
        self.next()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<u8> {
        if self.front >= self.back {
            return None;
        }
        let byte = self.buffer.byte_at_offset(self.back - 1)?;
        self.back -= 1;
        Some(byte)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a GapBuffer {
    type Item = u8;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Mutable iterator over the logical content of a buffer.
#[derive(Debug)]
pub struct IterMut<'a> {
    inner: Chain<slice::IterMut<'a, u8>, slice::IterMut<'a, u8>>,
}

impl<'a> IterMut<'a> {
    pub(crate) fn new(prefix: &'a mut [u8], suffix: &'a mut [u8]) -> Self {
        Self {
            inner: prefix.iter_mut().chain(suffix.iter_mut()),
        }
    }
}

impl<'a> Iterator for IterMut<'a> {
    type Item = &'a mut u8;

    fn next(&mut self) -> Option<&'a mut u8> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for IterMut<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for IterMut<'_> {}

impl FusedIterator for IterMut<'_> {}

impl<'a> IntoIterator for &'a mut GapBuffer {
    type Item = &'a mut u8;
    type IntoIter = IterMut<'a>;

    fn into_iter(self) -> IterMut<'a> {
        self.iter_mut()
    }
}

/// Inserts bytes one at a time at a fixed edit point.
///
/// Created with [`GapBuffer::inserter`], which moves the gap to the target
/// once. Every pushed byte lands after the previous one, so the inserted
/// sequence keeps its order.
#[derive(Debug)]
pub struct Inserter<'a> {
    buffer: &'a mut GapBuffer,
}

impl<'a> Inserter<'a> {
    pub(crate) fn new(buffer: &'a mut GapBuffer) -> Self {
        Self { buffer }
    }

    /// Inserts a single byte at the edit point.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        self.buffer.insert(&[byte])
    }

    /// Inserts every byte of `bytes` in order and returns how many were
    /// inserted.
    pub fn extend_from<I>(&mut self, bytes: I) -> Result<usize>
    where
        I: IntoIterator<Item = u8>,
    {
        let bytes = bytes.into_iter();
        self.buffer.accommodate(bytes.size_hint().0)?;
        let mut count = 0;
        for byte in bytes {
            self.push(byte)?;
            count += 1;
        }
        Ok(count)
    }

    /// Returns the cursor just after the last inserted byte.
    pub fn position(&self) -> Cursor {
        self.buffer.gap()
    }

    /// Ends the insertion, handing back the buffer.
    pub fn into_inner(self) -> &'a mut GapBuffer {
        self.buffer
    }
}

impl io::Write for Inserter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .insert(buf)
            .map_err(|err| io::Error::new(io::ErrorKind::OutOfMemory, err))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
