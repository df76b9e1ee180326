use alloc::vec::Vec;
use core::ptr;

use crate::{
    chunk::Chunk,
    error::SequenceError,
    owner::BufferOwner,
    position::{Anchor, Position},
};

/// An immutable, zero-copy logical view over one or more runs of storage.
///
/// A sequence is nothing but a `(start, end)` pair of [`Position`]s into
/// borrowed storage: a chunk chain, a flat slice, a string's UTF-8 bytes, or
/// an externally owned buffer. Construction and slicing are O(1) and never
/// copy; length is O(1) thanks to chunk running indices. The only operation
/// that walks the chain is run enumeration ([`Sequence::runs`]), and it never
/// allocates.
///
/// Materialization is always explicit: [`Sequence::as_contiguous`] borrows a
/// single-run sequence as one slice, [`Sequence::to_vec`] and
/// [`Sequence::copy_to`] flatten a multi-run one.
pub struct Sequence<'a, T> {
    start: Position<'a, T>,
    end: Position<'a, T>,
}

impl<T> Clone for Sequence<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Sequence<'_, T> {}

impl<T> core::fmt::Debug for Sequence<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sequence")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}

/// A contiguous run handed out while walking a sequence, together with where
/// it starts and where the following run begins.
pub(crate) struct RunView<'a, T> {
    pub(crate) run: &'a [T],
    pub(crate) start: Position<'a, T>,
    pub(crate) next: Option<Position<'a, T>>,
}

impl<'a, T> Sequence<'a, T> {
    /// The empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            start: Position::new(Anchor::Empty, 0),
            end: Position::new(Anchor::Empty, 0),
        }
    }

    /// Views `len` elements of `buf` starting at `start`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the window exceeds the bounds of `buf`.
    pub fn from_slice(buf: &'a [T], start: usize, len: usize) -> Result<Self, SequenceError> {
        let end = window_end(buf.len(), start, len)
            .ok_or(SequenceError::InvalidArgument("window exceeds buffer bounds"))?;
        Ok(Self {
            start: Position::new(Anchor::Slice(buf), start),
            end: Position::new(Anchor::Slice(buf), end),
        })
    }

    /// Views a window of an externally owned contiguous buffer.
    ///
    /// The owner's slice is resolved exactly once, here.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the window exceeds the owner's storage.
    pub fn from_owner(
        owner: &'a dyn BufferOwner<T>,
        start: usize,
        len: usize,
    ) -> Result<Self, SequenceError> {
        let buf = owner.as_slice();
        let end = window_end(buf.len(), start, len)
            .ok_or(SequenceError::InvalidArgument("window exceeds owner bounds"))?;
        Ok(Self {
            start: Position::new(Anchor::Owner(buf), start),
            end: Position::new(Anchor::Owner(buf), end),
        })
    }

    /// Views the span from `(start, start_index)` to `(end, end_index)` of a
    /// chunk chain.
    ///
    /// The chain itself is trusted to be well ordered (strictly increasing
    /// running indices, `next` links reaching `end` from `start`); that is the
    /// chunk provider's contract. What is validated here is cheap: each index
    /// against its chunk's length, and the two endpoints against each other by
    /// running-index magnitude.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when an index exceeds its chunk or the endpoints are
    /// inverted.
    pub fn from_chain(
        start: &'a Chunk<'a, T>,
        start_index: usize,
        end: &'a Chunk<'a, T>,
        end_index: usize,
    ) -> Result<Self, SequenceError> {
        if start_index > start.len() || end_index > end.len() {
            return Err(SequenceError::InvalidArgument("index exceeds chunk length"));
        }
        if start.run_index() > end.run_index() {
            return Err(SequenceError::InvalidArgument("chunk endpoints are inverted"));
        }
        if ptr::eq(start, end) && end_index < start_index {
            return Err(SequenceError::InvalidArgument("chunk endpoints are inverted"));
        }
        if start.run_index() + start_index > end.run_index() + end_index {
            return Err(SequenceError::InvalidArgument("chunk endpoints are inverted"));
        }
        Ok(Self {
            start: Position::new(Anchor::Chunk(start), start_index),
            end: Position::new(Anchor::Chunk(end), end_index),
        })
    }

    /// Where this sequence begins.
    #[must_use]
    pub fn start(&self) -> Position<'a, T> {
        self.start
    }

    /// Where this sequence ends (exclusive).
    #[must_use]
    pub fn end(&self) -> Position<'a, T> {
        self.end
    }

    /// Number of elements in the view. O(1) for every storage kind.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.absolute() - self.start.absolute()
    }

    /// Whether the view holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the whole view lies within one physical run.
    #[must_use]
    pub fn is_single_run(&self) -> bool {
        match (self.start.anchor, self.end.anchor) {
            (Anchor::Chunk(a), Anchor::Chunk(b)) => ptr::eq(a, b),
            _ => true,
        }
    }

    /// The first contiguous run of the view, skipping exhausted chunks.
    /// Empty only when the sequence is empty.
    #[must_use]
    pub fn first_run(&self) -> &'a [T] {
        self.run_at(self.start).map_or(&[], |view| view.run)
    }

    /// Walks the contiguous runs of the view in logical order.
    ///
    /// This is the only place chunk-chain walking happens; the iterator never
    /// allocates and never yields storage outside `[start, end)`.
    #[must_use]
    pub fn runs(&self) -> Runs<'a, T> {
        Runs {
            sequence: *self,
            pos: Some(self.start),
        }
    }

    /// The run beginning at `pos` and the position where the following run
    /// starts, or `None` when `pos` sits at the end (or never came from this
    /// view). Stepping the returned position through repeated calls walks the
    /// runs exactly as [`Sequence::runs`] does.
    #[must_use]
    pub fn next_run_at(
        &self,
        pos: Position<'a, T>,
    ) -> Option<(&'a [T], Option<Position<'a, T>>)> {
        self.check_position(pos).ok()?;
        let view = self.run_at(pos)?;
        Some((view.run, view.next))
    }

    /// Borrows the whole view as one slice, when it is single-run.
    #[must_use]
    pub fn as_contiguous(&self) -> Option<&'a [T]> {
        if self.is_single_run() {
            Some(self.first_run())
        } else {
            None
        }
    }

    /// The position `offset` elements past the start of the view.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when `offset` exceeds the view's length.
    pub fn position_at(&self, offset: usize) -> Result<Position<'a, T>, SequenceError> {
        self.position_from(offset, self.start)
    }

    /// The position `offset` elements past `from`.
    ///
    /// For chunked views this walks forward chunk by chunk from `from`,
    /// accumulating spans until the offset is exhausted; flat views are a
    /// single addition.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when `from` lies outside the view or the offset exceeds
    /// the remaining length; `InvalidArgument` when `from` belongs to
    /// different storage.
    pub fn position_from(
        &self,
        offset: usize,
        from: Position<'a, T>,
    ) -> Result<Position<'a, T>, SequenceError> {
        self.check_position(from)?;
        let target = from
            .absolute()
            .checked_add(offset)
            .ok_or(SequenceError::OutOfRange)?;
        if target > self.end.absolute() {
            return Err(SequenceError::OutOfRange);
        }
        match from.anchor {
            Anchor::Empty => Ok(from),
            Anchor::Slice(_) | Anchor::Str(_) | Anchor::Owner(_) => {
                Ok(Position::new(from.anchor, from.index + offset))
            }
            Anchor::Chunk(start_chunk) => {
                let mut chunk = start_chunk;
                let mut index = from.index;
                let mut left = offset;
                loop {
                    let span = chunk.len() - index;
                    if left <= span {
                        return Ok(Position::new(Anchor::Chunk(chunk), index + left));
                    }
                    left -= span;
                    chunk = chunk.next().ok_or(SequenceError::OutOfRange)?;
                    index = 0;
                }
            }
        }
    }

    /// A sub-view of `len` elements starting `start` elements in. Never
    /// copies.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when the window exceeds this view's window.
    pub fn slice(&self, start: usize, len: usize) -> Result<Self, SequenceError> {
        let start_pos = self.position_at(start)?;
        let end_pos = self.position_from(len, start_pos)?;
        Ok(Self::sub(start_pos, end_pos))
    }

    /// A sub-view from `start` elements in up to the position `end`.
    ///
    /// # Errors
    ///
    /// `OutOfRange`/`InvalidArgument` when `end` lies outside this view or
    /// before the requested start.
    pub fn slice_until(
        &self,
        start: usize,
        end: Position<'a, T>,
    ) -> Result<Self, SequenceError> {
        self.check_position(end)?;
        let start_pos = self.position_at(start)?;
        if start_pos.absolute() > end.absolute() {
            return Err(SequenceError::OutOfRange);
        }
        Ok(Self::sub(start_pos, end))
    }

    /// A sub-view of `len` elements starting at the position `start`.
    ///
    /// # Errors
    ///
    /// `OutOfRange`/`InvalidArgument` when `start` lies outside this view or
    /// fewer than `len` elements follow it.
    pub fn slice_at(
        &self,
        start: Position<'a, T>,
        len: usize,
    ) -> Result<Self, SequenceError> {
        self.check_position(start)?;
        let end_pos = self.position_from(len, start)?;
        Ok(Self::sub(start, end_pos))
    }

    /// A sub-view between two positions previously obtained from this view.
    ///
    /// Position validation is a cheap identity-plus-magnitude comparison; for
    /// chunked views it consults only the two endpoint chunks' running
    /// indices, never the whole chain.
    ///
    /// # Errors
    ///
    /// `OutOfRange`/`InvalidArgument` when either position lies outside this
    /// view or the pair is inverted.
    pub fn slice_between(
        &self,
        start: Position<'a, T>,
        end: Position<'a, T>,
    ) -> Result<Self, SequenceError> {
        self.check_position(start)?;
        self.check_position(end)?;
        if start.absolute() > end.absolute() {
            return Err(SequenceError::OutOfRange);
        }
        Ok(Self::sub(start, end))
    }

    /// Internal constructor for endpoints already known to be valid.
    pub(crate) fn sub(start: Position<'a, T>, end: Position<'a, T>) -> Self {
        debug_assert!(start.anchor.same_family(&end.anchor));
        debug_assert!(start.absolute() <= end.absolute());
        Self { start, end }
    }

    /// The run beginning at `pos`, normalized past exhausted chunks, or
    /// `None` when `pos` sits at or past the end. Runs are never empty.
    pub(crate) fn run_at(&self, pos: Position<'a, T>) -> Option<RunView<'a, T>> {
        match (pos.anchor, self.end.anchor) {
            (Anchor::Empty, _) => None,
            (Anchor::Slice(buf) | Anchor::Str(buf) | Anchor::Owner(buf), _) => {
                if pos.index < self.end.index {
                    Some(RunView {
                        run: &buf[pos.index..self.end.index],
                        start: pos,
                        next: None,
                    })
                } else {
                    None
                }
            }
            (Anchor::Chunk(start_chunk), Anchor::Chunk(end_chunk)) => {
                let mut chunk = start_chunk;
                let mut index = pos.index;
                loop {
                    let last = ptr::eq(chunk, end_chunk);
                    let run_end = if last { self.end.index } else { chunk.len() };
                    if index < run_end {
                        let next = if last {
                            None
                        } else {
                            chunk
                                .next()
                                .map(|n| Position::new(Anchor::Chunk(n), 0))
                        };
                        return Some(RunView {
                            run: &chunk.data()[index..run_end],
                            start: Position::new(Anchor::Chunk(chunk), index),
                            next,
                        });
                    }
                    if last {
                        return None;
                    }
                    chunk = chunk.next()?;
                    index = 0;
                }
            }
            _ => None,
        }
    }

    /// Verifies that `pos` came from this view's storage and lies within its
    /// window.
    fn check_position(&self, pos: Position<'a, T>) -> Result<(), SequenceError> {
        if !self.start.anchor.same_family(&pos.anchor) {
            return Err(SequenceError::InvalidArgument(
                "position does not belong to this sequence",
            ));
        }
        let abs = pos.absolute();
        if abs < self.start.absolute() || abs > self.end.absolute() {
            return Err(SequenceError::OutOfRange);
        }
        Ok(())
    }
}

impl<'a, T: Clone> Sequence<'a, T> {
    /// Flattens the view into an owned vector. The one operation that copies
    /// on request.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        for run in self.runs() {
            out.extend_from_slice(run);
        }
        out
    }
}

impl<'a, T: Copy> Sequence<'a, T> {
    /// Copies the whole view into the front of `dest`.
    ///
    /// Returns `false` (writing nothing) when `dest` is too short.
    pub fn copy_to(&self, dest: &mut [T]) -> bool {
        if dest.len() < self.len() {
            return false;
        }
        let mut filled = 0;
        for run in self.runs() {
            dest[filled..filled + run.len()].copy_from_slice(run);
            filled += run.len();
        }
        true
    }
}

impl<'a> Sequence<'a, u8> {
    /// Views `len` bytes of a string's UTF-8 storage starting at byte offset
    /// `start`.
    ///
    /// Elements are bytes, so offsets need not fall on character boundaries.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the window exceeds the string's storage.
    pub fn from_text(text: &'a str, start: usize, len: usize) -> Result<Self, SequenceError> {
        let buf = text.as_bytes();
        let end = window_end(buf.len(), start, len)
            .ok_or(SequenceError::InvalidArgument("window exceeds string bounds"))?;
        Ok(Self {
            start: Position::new(Anchor::Str(buf), start),
            end: Position::new(Anchor::Str(buf), end),
        })
    }
}

fn window_end(buf_len: usize, start: usize, len: usize) -> Option<usize> {
    let end = start.checked_add(len)?;
    (end <= buf_len).then_some(end)
}

/// Allocation-free iterator over the contiguous runs of a [`Sequence`].
pub struct Runs<'a, T> {
    sequence: Sequence<'a, T>,
    pos: Option<Position<'a, T>>,
}

impl<'a, T> Iterator for Runs<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos.take()?;
        let view = self.sequence.run_at(pos)?;
        self.pos = view.next;
        Some(view.run)
    }
}
