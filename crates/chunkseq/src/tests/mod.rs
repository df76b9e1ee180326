//! Cross-cutting tests: quickcheck properties over arbitrary data and
//! arbitrary physical chunking.


use alloc::{boxed::Box, vec::Vec};

use crate::{Chunk, Sequence};

/// Builds a chained sequence over `parts`.
///
/// Chunks and their storage are leaked so the chain can borrow with a
/// `'static` lifetime; fine for tests.
pub(crate) fn chain(parts: &[&[u8]]) -> Sequence<'static, u8> {
    assert!(!parts.is_empty());
    let mut run_index: usize = parts.iter().map(|p| p.len()).sum();
    let mut next: Option<&'static Chunk<'static, u8>> = None;
    let mut head = None;
    for part in parts.iter().rev() {
        run_index -= part.len();
        let data: &'static [u8] = Box::leak(part.to_vec().into_boxed_slice());
        let chunk: &'static Chunk<'static, u8> =
            Box::leak(Box::new(Chunk::new(data, run_index, next)));
        next = Some(chunk);
        head = Some(chunk);
    }
    let head = head.unwrap();
    let mut tail = head;
    while let Some(n) = tail.next() {
        tail = n;
    }
    Sequence::from_chain(head, 0, tail, tail.len()).unwrap()
}

/// Builds a chained sequence over `data`, split at points derived from
/// `splits` (any values; they are reduced into the valid range).
pub(crate) fn chunked(data: &[u8], splits: &[usize]) -> Sequence<'static, u8> {
    let mut cuts: Vec<usize> = splits.iter().map(|s| s % (data.len() + 1)).collect();
    cuts.push(0);
    cuts.push(data.len());
    cuts.sort_unstable();
    cuts.dedup();
    let parts: Vec<&[u8]> = cuts.windows(2).map(|w| &data[w[0]..w[1]]).collect();
    if parts.is_empty() {
        chain(&[b""])
    } else {
        chain(&parts)
    }
}
