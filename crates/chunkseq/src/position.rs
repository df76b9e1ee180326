use core::fmt;

use crate::chunk::Chunk;

/// The storage a position's offset indexes into.
///
/// This is the explicit enum rendering of a tagged offset: one `Copy`,
/// allocation-free value that self-describes which storage representation it
/// came from, without a separate discriminator on the sequence. `Chunk`
/// offsets are relative to their chunk; the flat kinds use absolute indices
/// into the whole backing buffer.
pub(crate) enum Anchor<'a, T> {
    /// The empty sequence.
    Empty,
    /// A link in a chunk chain; the offset is chunk-relative.
    Chunk(&'a Chunk<'a, T>),
    /// A flat borrowed slice; the offset is absolute.
    Slice(&'a [T]),
    /// The UTF-8 storage of a string; the offset is absolute.
    Str(&'a [T]),
    /// A buffer resolved from an external owner; the offset is absolute.
    Owner(&'a [T]),
}

impl<T> Clone for Anchor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Anchor<'_, T> {}

impl<T> Anchor<'_, T> {
    /// Whether two anchors are the same kind over the same storage.
    ///
    /// For flat kinds this compares buffer identity. For the chunked kind the
    /// chunks may legitimately differ (two ends of one chain); membership in
    /// the same chain is the provider's contract and is never verified by a
    /// walk — positions are compared by running-index magnitude instead.
    pub(crate) fn same_family(&self, other: &Self) -> bool {
        match (self, other) {
            (Anchor::Empty, Anchor::Empty) | (Anchor::Chunk(_), Anchor::Chunk(_)) => true,
            (Anchor::Slice(a), Anchor::Slice(b))
            | (Anchor::Str(a), Anchor::Str(b))
            | (Anchor::Owner(a), Anchor::Owner(b)) => {
                a.as_ptr() == b.as_ptr() && a.len() == b.len()
            }
            _ => false,
        }
    }
}

impl<T> fmt::Debug for Anchor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Empty => f.write_str("Empty"),
            Anchor::Chunk(c) => write!(f, "Chunk({:p})", *c),
            Anchor::Slice(b) => write!(f, "Slice({:p})", b.as_ptr()),
            Anchor::Str(b) => write!(f, "Str({:p})", b.as_ptr()),
            Anchor::Owner(b) => write!(f, "Owner({:p})", b.as_ptr()),
        }
    }
}

/// An opaque, cheap location inside a [`Sequence`](crate::Sequence).
///
/// A position is an `(identity, offset)` pair: which storage it indexes into
/// and where. It is `Copy`, never allocates, and is created on every cursor
/// step, so it stays a couple of machine words. Positions are only meaningful
/// relative to the sequence that produced them; handing a position to an
/// unrelated sequence fails that sequence's validation.
pub struct Position<'a, T> {
    pub(crate) anchor: Anchor<'a, T>,
    pub(crate) index: usize,
}

impl<T> Clone for Position<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Position<'_, T> {}

impl<'a, T> Position<'a, T> {
    pub(crate) fn new(anchor: Anchor<'a, T>, index: usize) -> Self {
        Self { anchor, index }
    }

    /// Logical distance from the start of the underlying storage.
    ///
    /// For chunked positions this is `run_index + offset`, which is what makes
    /// cross-chunk comparisons O(1): no chain walking, ever.
    pub(crate) fn absolute(&self) -> usize {
        match self.anchor {
            Anchor::Empty => 0,
            Anchor::Chunk(chunk) => chunk.run_index() + self.index,
            Anchor::Slice(_) | Anchor::Str(_) | Anchor::Owner(_) => self.index,
        }
    }
}

impl<T> PartialEq for Position<'_, T> {
    /// Two positions are equal when they identify the same logical element of
    /// the same storage. A chunk-boundary location has two representations —
    /// end of one chunk, start of the next — and they compare equal.
    fn eq(&self, other: &Self) -> bool {
        self.anchor.same_family(&other.anchor) && self.absolute() == other.absolute()
    }
}

impl<T> Eq for Position<'_, T> {}

impl<T> fmt::Debug for Position<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("anchor", &self.anchor)
            .field("index", &self.index)
            .finish()
    }
}
