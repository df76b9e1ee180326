//! Zero-copy, possibly-discontiguous read-only element sequences with a
//! sequential scanning cursor.
//!
//! A [`Sequence`] is an immutable logical view over one of several physical
//! storage representations — a linked chain of borrowed [`Chunk`]s, a flat
//! slice, a string's UTF-8 storage, or a buffer exposed by an external
//! [`BufferOwner`] — identified by opaque, allocation-free [`Position`]s.
//! Construction and slicing are O(1) and never copy; materialization happens
//! only when the caller explicitly asks for it.
//!
//! A [`Cursor`] walks a sequence run by run: peek/read/advance/rewind,
//! fixed-width endian-aware numeric reads, and delimiter-bounded scans
//! (single delimiter, escape-aware, any-of-a-set, multi-element), all of
//! which handle delimiters straddling chunk boundaries and restore the
//! cursor exactly on a miss so a streaming caller can buffer more data and
//! retry.
//!
//! ```
//! use chunkseq::{Chunk, Cursor, Sequence};
//!
//! // Two physical runs, one logical view.
//! let tail = Chunk::new(b"lue", 6, None);
//! let head = Chunk::new(b"key=va", 0, Some(&tail));
//! let seq = Sequence::from_chain(&head, 0, &tail, 3).unwrap();
//!
//! let mut cursor = Cursor::new(seq);
//! let key = cursor.try_read_to(b'=', true).unwrap();
//! assert_eq!(key.as_contiguous().unwrap(), b"key");
//! assert!(cursor.try_read_to(b'!', true).is_none()); // miss: cursor unchanged
//! assert_eq!(cursor.remaining(), 5);
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod chunk;
mod cursor;
mod error;
mod numbers;
mod owner;
mod position;
mod scan;
mod sequence;

#[cfg(test)]
mod tests;

pub use chunk::Chunk;
pub use cursor::Cursor;
pub use error::SequenceError;
pub use owner::BufferOwner;
pub use position::Position;
pub use sequence::{Runs, Sequence};
