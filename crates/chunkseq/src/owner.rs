use alloc::{boxed::Box, vec::Vec};

/// A contiguous buffer held by some external owner.
///
/// Lets a [`Sequence`](crate::Sequence) be built over storage that is not a
/// plain slice at the call site — a pooled buffer, a memory-mapped region, a
/// foreign allocation — as long as its owner can expose it as one contiguous
/// slice. The slice is resolved exactly once at sequence construction; the
/// owner must return the same storage for the lifetime of the borrow.
pub trait BufferOwner<T> {
    /// The owned storage, viewed as one contiguous slice.
    fn as_slice(&self) -> &[T];
}

impl<T> BufferOwner<T> for Vec<T> {
    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> BufferOwner<T> for Box<[T]> {
    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T, const N: usize> BufferOwner<T> for [T; N] {
    fn as_slice(&self) -> &[T] {
        self
    }
}
