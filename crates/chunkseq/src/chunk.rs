/// One contiguous link in a chain of borrowed storage.
///
/// A chunk couples a contiguous run of elements with its *running index*: the
/// cumulative number of elements held by every chunk before it in the chain.
/// Running indices are what make cross-chunk length and distance computations
/// O(1) — two positions anywhere in a chain can be compared without walking
/// it.
///
/// Chunks are produced by an external provider and only ever borrowed here;
/// this crate never copies, mutates or frees them. The provider must supply
/// chains whose `next` links form a well-ordered chain with strictly
/// increasing running indices, and must keep every chunk alive for as long as
/// any [`Sequence`](crate::Sequence) or [`Cursor`](crate::Cursor) borrows it —
/// which the `'a` lifetime parameter enforces.
///
/// Chains are built back to front, so each earlier chunk can hold a plain
/// reference to its successor:
///
/// ```
/// use chunkseq::Chunk;
///
/// let tail = Chunk::new(b"c", 2, None);
/// let head = Chunk::new(b"ab", 0, Some(&tail));
/// assert_eq!(head.next().unwrap().run_index(), 2);
/// ```
#[derive(Debug)]
pub struct Chunk<'a, T> {
    data: &'a [T],
    run_index: usize,
    next: Option<&'a Chunk<'a, T>>,
}

impl<'a, T> Chunk<'a, T> {
    /// Creates a chain link over `data`.
    ///
    /// `run_index` is the total element count of all chunks preceding this one
    /// in its chain (`0` for the head).
    #[must_use]
    pub const fn new(data: &'a [T], run_index: usize, next: Option<&'a Chunk<'a, T>>) -> Self {
        Self {
            data,
            run_index,
            next,
        }
    }

    /// The elements stored in this link.
    #[must_use]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Cumulative element count of every chunk before this one.
    #[must_use]
    pub fn run_index(&self) -> usize {
        self.run_index
    }

    /// The next link in the chain, if any.
    #[must_use]
    pub fn next(&self) -> Option<&'a Chunk<'a, T>> {
        self.next
    }

    /// Number of elements in this link alone.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether this link holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
