use core::cmp;

use crate::{
    error::SequenceError,
    position::Position,
    sequence::Sequence,
};

/// A forward-moving (and boundedly reversible) reader over a [`Sequence`].
///
/// The cursor walks the sequence one physical run at a time, tracking how
/// much has been consumed and how much remains. It is a small `Copy` value
/// borrowing the sequence's storage — the borrow checker ties its lifetime to
/// the chunk chain, so it can never outlive what it reads. It is
/// single-threaded by construction: drive one cursor from one logical thread
/// of control. Several independent cursors may read the same sequence
/// concurrently, since the sequence is immutable.
///
/// Failure discipline follows the streaming-retry model: contract violations
/// (advancing or rewinding past the window) are `Err`, while "not enough data
/// yet" conditions come back as `None`/`false` with the cursor left exactly
/// where it was, so the caller can buffer more input and reissue the same
/// call.
pub struct Cursor<'a, T> {
    sequence: Sequence<'a, T>,
    /// The current physical run.
    run: &'a [T],
    /// Consumed prefix of `run`. Strictly less than `run.len()` unless the
    /// cursor is at the end.
    index: usize,
    /// Where `run` begins inside the sequence.
    run_start: Position<'a, T>,
    /// Where the run after `run` begins, if one exists.
    next_run: Option<Position<'a, T>>,
    consumed: usize,
    length: usize,
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> core::fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("consumed", &self.consumed)
            .field("length", &self.length)
            .field("index", &self.index)
            .finish()
    }
}

impl<'a, T> Cursor<'a, T> {
    /// Starts a cursor at the beginning of `sequence`.
    #[must_use]
    pub fn new(sequence: Sequence<'a, T>) -> Self {
        let length = sequence.len();
        match sequence.run_at(sequence.start()) {
            Some(view) => Self {
                sequence,
                run: view.run,
                index: 0,
                run_start: view.start,
                next_run: view.next,
                consumed: 0,
                length,
            },
            None => Self {
                sequence,
                run: &[],
                index: 0,
                run_start: sequence.start(),
                next_run: None,
                consumed: 0,
                length,
            },
        }
    }

    /// The sequence being read.
    #[must_use]
    pub fn sequence(&self) -> Sequence<'a, T> {
        self.sequence
    }

    /// Elements yielded or skipped since construction.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Elements left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.length - self.consumed
    }

    /// Whether every element has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// The position of the next unread element (the sequence end when the
    /// cursor is exhausted).
    #[must_use]
    pub fn position(&self) -> Position<'a, T> {
        Position::new(self.run_start.anchor, self.run_start.index + self.index)
    }

    /// The unread remainder of the current physical run.
    #[must_use]
    pub fn unread_run(&self) -> &'a [T] {
        &self.run[self.index..]
    }

    /// Pulls the next run once the current one is exhausted.
    fn fetch_next_run(&mut self) {
        if self.index < self.run.len() {
            return;
        }
        if let Some(next) = self.next_run {
            match self.sequence.run_at(next) {
                Some(view) => {
                    self.run = view.run;
                    self.index = 0;
                    self.run_start = view.start;
                    self.next_run = view.next;
                }
                None => self.next_run = None,
            }
        }
    }

    /// Consumes `count` elements already known to remain.
    pub(crate) fn advance_unchecked(&mut self, count: usize) {
        debug_assert!(count <= self.remaining());
        self.consumed += count;
        let mut left = count;
        while left > 0 {
            let avail = self.run.len() - self.index;
            let step = cmp::min(left, avail);
            self.index += step;
            left -= step;
            self.fetch_next_run();
            if step == 0 {
                debug_assert_eq!(left, 0);
                break;
            }
        }
    }

    /// Consumes `count` elements, crossing run boundaries as needed.
    ///
    /// Atomic: on failure nothing moves, including the consumed count.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `count` exceeds the remaining length.
    pub fn advance(&mut self, count: usize) -> Result<(), SequenceError> {
        if count > self.remaining() {
            return Err(SequenceError::InvalidArgument(
                "advance count exceeds remaining length",
            ));
        }
        self.advance_unchecked(count);
        Ok(())
    }

    /// Moves the consumed count backward by `count`.
    ///
    /// Rewinding within the current run is O(1); rewinding across a run
    /// boundary resets to the sequence start and re-advances, the one
    /// operation allowed to be O(n) in the already-consumed distance. Data
    /// before the sequence start is never touched.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `count` exceeds the consumed count.
    pub fn rewind(&mut self, count: usize) -> Result<(), SequenceError> {
        if count > self.consumed {
            return Err(SequenceError::InvalidArgument(
                "rewind count exceeds consumed length",
            ));
        }
        if count <= self.index {
            self.index -= count;
            self.consumed -= count;
        } else {
            let target = self.consumed - count;
            *self = Self::new(self.sequence);
            self.advance_unchecked(target);
        }
        Ok(())
    }
}

impl<'a, T: Copy> Cursor<'a, T> {
    /// Returns the next element without consuming it. `None` only at the end.
    #[must_use]
    pub fn peek(&self) -> Option<T> {
        self.run.get(self.index).copied()
    }

    /// Returns and consumes the next element. `None` only at the end.
    pub fn read(&mut self) -> Option<T> {
        let element = self.run.get(self.index).copied()?;
        self.index += 1;
        self.consumed += 1;
        self.fetch_next_run();
        Some(element)
    }

    /// Copies `dest.len()` elements starting at the current position into
    /// `dest` without consuming them, assembling across as many runs as
    /// necessary.
    ///
    /// Returns `false` (writing nothing) when fewer elements remain.
    pub fn try_copy_to(&self, dest: &mut [T]) -> bool {
        if dest.len() > self.remaining() {
            return false;
        }
        let mut filled = 0;
        let mut run = self.unread_run();
        let mut next = self.next_run;
        loop {
            let take = cmp::min(run.len(), dest.len() - filled);
            dest[filled..filled + take].copy_from_slice(&run[..take]);
            filled += take;
            if filled == dest.len() {
                return true;
            }
            let Some(pos) = next else {
                debug_assert!(false, "remaining length disagrees with run chain");
                return false;
            };
            let Some(view) = self.sequence.run_at(pos) else {
                debug_assert!(false, "remaining length disagrees with run chain");
                return false;
            };
            run = view.run;
            next = view.next;
        }
    }
}

impl<'a, T: Copy + PartialEq> Cursor<'a, T> {
    /// Whether the next unread element equals `candidate`, consuming it when
    /// it does and `advance_past` is set.
    pub fn is_next(&mut self, candidate: T, advance_past: bool) -> bool {
        match self.peek() {
            Some(element) if element == candidate => {
                if advance_past {
                    self.advance_unchecked(1);
                }
                true
            }
            _ => false,
        }
    }

    /// Whether the unread data starts with `candidate`, comparing across run
    /// boundaries without consuming anything unless the full run matches and
    /// `advance_past` is set. An empty candidate matches trivially.
    pub fn is_next_run(&mut self, candidate: &[T], advance_past: bool) -> bool {
        if candidate.len() > self.remaining() {
            return false;
        }
        let mut matched = 0;
        let mut run = self.unread_run();
        let mut next = self.next_run;
        while matched < candidate.len() {
            let take = cmp::min(run.len(), candidate.len() - matched);
            if run[..take] != candidate[matched..matched + take] {
                return false;
            }
            matched += take;
            if matched == candidate.len() {
                break;
            }
            let Some(pos) = next else { return false };
            let Some(view) = self.sequence.run_at(pos) else {
                return false;
            };
            run = view.run;
            next = view.next;
        }
        if advance_past {
            self.advance_unchecked(candidate.len());
        }
        true
    }

    /// Consumes a maximal run of elements equal to `element`, crossing run
    /// boundaries. Returns the count consumed; zero is success, not failure.
    pub fn advance_past(&mut self, element: T) -> usize {
        self.advance_while(|x| x == element)
    }

    /// Consumes a maximal run of elements contained in `set` (at most 4),
    /// crossing run boundaries. Returns the count consumed; zero is success.
    pub fn advance_past_any(&mut self, set: &[T]) -> usize {
        debug_assert!(set.len() <= 4, "delimiter sets are limited to 4 elements");
        self.advance_while(|x| set.contains(&x))
    }

    fn advance_while(&mut self, pred: impl Fn(T) -> bool) -> usize {
        let mut total = 0;
        loop {
            let window = self.unread_run();
            if window.is_empty() {
                break;
            }
            let stop = window
                .iter()
                .position(|x| !pred(*x))
                .unwrap_or(window.len());
            self.advance_unchecked(stop);
            total += stop;
            if stop < window.len() {
                break;
            }
        }
        total
    }
}
