//! Delimiter-bounded scanning.
//!
//! All four variants share one contract: on success the returned sequence is
//! the unread data strictly before the delimiter (zero-copy; callers use
//! [`Sequence::as_contiguous`](crate::Sequence::as_contiguous) when it stayed
//! in one run and `to_vec`/`copy_to` to flatten a cross-run result), and the
//! cursor lands just after the delimiter — or just before it when
//! `advance_past` is false. On failure the cursor is bit-for-bit unchanged:
//! every variant probes on a copy of the cursor and commits the copy only on
//! a confirmed match, which is what makes the retry loop of a streaming
//! caller safe.

use crate::{cursor::Cursor, sequence::Sequence};

impl<'a, T: Copy + PartialEq> Cursor<'a, T> {
    /// Reads up to (and optionally past) the next occurrence of `delimiter`.
    ///
    /// Scans the current run, consuming whole runs as "still looking" and
    /// continuing into the next, so delimiters are found regardless of where
    /// run boundaries fall. `None` when the input is exhausted first.
    pub fn try_read_to(&mut self, delimiter: T, advance_past: bool) -> Option<Sequence<'a, T>> {
        let origin = self.position();
        let mut probe = *self;
        loop {
            let window = probe.unread_run();
            if window.is_empty() {
                return None;
            }
            match window.iter().position(|x| *x == delimiter) {
                Some(found) => {
                    probe.advance_unchecked(found);
                    let result = Sequence::sub(origin, probe.position());
                    if advance_past {
                        probe.advance_unchecked(1);
                    }
                    *self = probe;
                    return Some(result);
                }
                None => probe.advance_unchecked(window.len()),
            }
        }
    }

    /// Reads up to the next *unescaped* occurrence of `delimiter`.
    ///
    /// A candidate delimiter preceded by an odd-length run of `escape`
    /// elements is itself escaped and is skipped as literal data, escapes
    /// included; an even-length run (zero included) leaves it genuine. The
    /// parity of an escape run that touches a run boundary is carried across
    /// it, so splitting the input at any point changes nothing.
    pub fn try_read_to_escaped(
        &mut self,
        delimiter: T,
        escape: T,
        advance_past: bool,
    ) -> Option<Sequence<'a, T>> {
        let origin = self.position();
        let mut probe = *self;
        // Whether the previous run ended in an escape run of odd parity.
        let mut prior_escape = false;
        loop {
            let window = probe.unread_run();
            if window.is_empty() {
                return None;
            }
            let mut searched = 0;
            loop {
                let Some(found) = window[searched..].iter().position(|x| *x == delimiter) else {
                    // No candidate left; carry the tail's escape parity into
                    // the next run.
                    let run_start = escape_run_start(window, window.len(), escape);
                    let mut parity = window.len() - run_start;
                    if run_start == 0 && prior_escape {
                        parity += 1;
                    }
                    prior_escape = parity % 2 != 0;
                    probe.advance_unchecked(window.len());
                    break;
                };
                let candidate = searched + found;
                let run_start = escape_run_start(window, candidate, escape);
                let mut escapes = candidate - run_start;
                if run_start == 0 && prior_escape {
                    escapes += 1;
                }
                if escapes % 2 == 0 {
                    probe.advance_unchecked(candidate);
                    let result = Sequence::sub(origin, probe.position());
                    if advance_past {
                        probe.advance_unchecked(1);
                    }
                    *self = probe;
                    return Some(result);
                }
                // Escaped: the delimiter is literal data. Skip past it and
                // keep scanning this window.
                searched = candidate + 1;
                if searched == window.len() {
                    // The window ends on the delimiter itself, so no escape
                    // run crosses this boundary.
                    prior_escape = false;
                    probe.advance_unchecked(window.len());
                    break;
                }
            }
        }
    }

    /// Reads up to the first occurrence of any element of `delimiters`
    /// (at most 4). Same run-crossing contract as [`Cursor::try_read_to`].
    pub fn try_read_to_any(
        &mut self,
        delimiters: &[T],
        advance_past: bool,
    ) -> Option<Sequence<'a, T>> {
        debug_assert!(
            delimiters.len() <= 4,
            "delimiter sets are limited to 4 elements"
        );
        let origin = self.position();
        let mut probe = *self;
        loop {
            let window = probe.unread_run();
            if window.is_empty() {
                return None;
            }
            match index_of_any(window, delimiters) {
                Some(found) => {
                    probe.advance_unchecked(found);
                    let result = Sequence::sub(origin, probe.position());
                    if advance_past {
                        probe.advance_unchecked(1);
                    }
                    *self = probe;
                    return Some(result);
                }
                None => probe.advance_unchecked(window.len()),
            }
        }
    }

    /// Reads up to the next occurrence of the multi-element `delimiter`.
    ///
    /// Searches for the delimiter's first element as an anchor, confirms the
    /// full delimiter with a cross-run lookahead, and on a partial match
    /// resumes one element past the anchor — so an input where the anchor
    /// element recurs inside the delimiter is never mis-split. That fallback
    /// is quadratic in pathological inputs; the worst case is kept rather
    /// than switching to a precomputed-failure-function search.
    ///
    /// An empty delimiter succeeds immediately with an empty result and does
    /// not advance the cursor.
    pub fn try_read_to_seq(
        &mut self,
        delimiter: &[T],
        advance_past: bool,
    ) -> Option<Sequence<'a, T>> {
        let origin = self.position();
        if delimiter.is_empty() {
            return Some(Sequence::sub(origin, origin));
        }
        if delimiter.len() == 1 {
            return self.try_read_to(delimiter[0], advance_past);
        }
        let mut probe = *self;
        loop {
            probe.try_read_to(delimiter[0], false)?;
            if probe.is_next_run(delimiter, false) {
                let result = Sequence::sub(origin, probe.position());
                if advance_past {
                    probe.advance_unchecked(delimiter.len());
                }
                *self = probe;
                return Some(result);
            }
            probe.advance_unchecked(1);
        }
    }
}

/// Start of the maximal run of `escape` elements ending just before `index`.
fn escape_run_start<T: PartialEq>(window: &[T], index: usize, escape: T) -> usize {
    let mut start = index;
    while start > 0 && window[start - 1] == escape {
        start -= 1;
    }
    start
}

/// First index whose element is in `set`, with a dedicated arm for the
/// common two-element set.
fn index_of_any<T: PartialEq>(window: &[T], set: &[T]) -> Option<usize> {
    match set {
        [] => None,
        [a] => window.iter().position(|x| x == a),
        [a, b] => window.iter().position(|x| x == a || x == b),
        _ => window.iter().position(|x| set.contains(x)),
    }
}

#[cfg(test)]
mod tests {
    use crate::{chunk::Chunk, cursor::Cursor, sequence::Sequence};

    fn flat(data: &[u8]) -> Cursor<'_, u8> {
        Cursor::new(Sequence::from_slice(data, 0, data.len()).unwrap())
    }

    #[test]
    fn delimiter_in_second_run() {
        let tail = Chunk::new(b"c".as_slice(), 2, None);
        let head = Chunk::new(b"ab".as_slice(), 0, Some(&tail));
        let seq = Sequence::from_chain(&head, 0, &tail, 1).unwrap();
        let mut cursor = Cursor::new(seq);

        let result = cursor.try_read_to(b'c', true).unwrap();
        assert_eq!(result.to_vec(), b"ab");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn key_value_split() {
        let mut cursor = flat(b"key=value");
        let key = cursor.try_read_to(b'=', true).unwrap();
        assert_eq!(key.as_contiguous().unwrap(), b"key");
        let mut rest = [0u8; 5];
        assert!(cursor.try_copy_to(&mut rest));
        assert_eq!(&rest, b"value");
    }

    #[test]
    fn missing_delimiter_restores_the_cursor() {
        let mut cursor = flat(b"abc");
        cursor.advance(1).unwrap();
        let before = cursor.consumed();
        assert!(cursor.try_read_to(b'z', true).is_none());
        assert_eq!(cursor.consumed(), before);
        assert_eq!(cursor.peek(), Some(b'b'));
    }

    #[test]
    fn delimiter_at_start_yields_empty_prefix() {
        let mut cursor = flat(b";rest");
        let result = cursor.try_read_to(b';', true).unwrap();
        assert!(result.is_empty());
        assert_eq!(cursor.peek(), Some(b'r'));
    }

    #[test]
    fn advance_past_false_leaves_delimiter_unread() {
        let mut cursor = flat(b"ab;c");
        let result = cursor.try_read_to(b';', false).unwrap();
        assert_eq!(result.as_contiguous().unwrap(), b"ab");
        assert_eq!(cursor.peek(), Some(b';'));
        assert_eq!(cursor.read(), Some(b';'));
    }

    #[test]
    fn single_run_result_borrows_storage() {
        let data = *b"ab;c";
        let mut cursor = flat(&data);
        let result = cursor.try_read_to(b';', true).unwrap();
        let run = result.as_contiguous().unwrap();
        assert_eq!(run.as_ptr(), data.as_ptr());
    }

    #[test]
    fn escaped_delimiter_is_skipped() {
        // "a\;b;c": the first ';' is escaped, the second is genuine.
        let mut cursor = flat(b"a\\;b;c");
        let result = cursor.try_read_to_escaped(b';', b'\\', true).unwrap();
        assert_eq!(result.to_vec(), b"a\\;b");
        assert_eq!(cursor.peek(), Some(b'c'));
    }

    #[test]
    fn double_escape_keeps_delimiter_genuine() {
        let mut cursor = flat(b"a\\\\;c");
        let result = cursor.try_read_to_escaped(b';', b'\\', true).unwrap();
        assert_eq!(result.to_vec(), b"a\\\\");
        assert_eq!(cursor.peek(), Some(b'c'));
    }

    #[test]
    fn escape_parity_holds_at_every_split_point() {
        // A ++ escape*k ++ ';' for k in 0..6, split into two runs at every
        // possible point. The delimiter is genuine iff k is even.
        for k in 0..6usize {
            let mut data = b"ab".to_vec();
            data.extend(core::iter::repeat_n(b'\\', k));
            data.push(b';');
            for split in 0..=data.len() {
                let tail = Chunk::new(&data[split..], split, None);
                let head = Chunk::new(&data[..split], 0, Some(&tail));
                let seq = Sequence::from_chain(&head, 0, &tail, data.len() - split).unwrap();
                let mut cursor = Cursor::new(seq);
                let found = cursor.try_read_to_escaped(b';', b'\\', true);
                if k % 2 == 0 {
                    let result = found.unwrap();
                    assert_eq!(result.len(), 2 + k, "k={k} split={split}");
                    assert!(cursor.is_at_end());
                } else {
                    assert!(found.is_none(), "k={k} split={split}");
                    assert_eq!(cursor.consumed(), 0);
                }
            }
        }
    }

    #[test]
    fn escaped_scan_fails_without_unescaped_delimiter() {
        let mut cursor = flat(b"a\\;b");
        assert!(cursor.try_read_to_escaped(b';', b'\\', true).is_none());
        assert_eq!(cursor.consumed(), 0);
    }

    #[test]
    fn any_of_two_finds_the_earliest() {
        let mut cursor = flat(b"one\ntwo\rthree");
        let line = cursor.try_read_to_any(b"\r\n", true).unwrap();
        assert_eq!(line.as_contiguous().unwrap(), b"one");
        let line = cursor.try_read_to_any(b"\r\n", true).unwrap();
        assert_eq!(line.as_contiguous().unwrap(), b"two");
    }

    #[test]
    fn any_of_crosses_runs() {
        let tail = Chunk::new(b"x,y".as_slice(), 2, None);
        let head = Chunk::new(b"ab".as_slice(), 0, Some(&tail));
        let seq = Sequence::from_chain(&head, 0, &tail, 3).unwrap();
        let mut cursor = Cursor::new(seq);
        let result = cursor.try_read_to_any(b",;", true).unwrap();
        assert_eq!(result.to_vec(), b"abx");
        assert_eq!(cursor.peek(), Some(b'y'));
    }

    #[test]
    fn empty_multi_delimiter_succeeds_without_advancing() {
        let mut cursor = flat(b"abc");
        let result = cursor.try_read_to_seq(b"", true).unwrap();
        assert!(result.is_empty());
        assert_eq!(cursor.consumed(), 0);
        assert_eq!(cursor.peek(), Some(b'a'));
    }

    #[test]
    fn multi_delimiter_across_runs() {
        let tail = Chunk::new(b"\nrest".as_slice(), 4, None);
        let head = Chunk::new(b"one\r".as_slice(), 0, Some(&tail));
        let seq = Sequence::from_chain(&head, 0, &tail, 5).unwrap();
        let mut cursor = Cursor::new(seq);
        let line = cursor.try_read_to_seq(b"\r\n", true).unwrap();
        assert_eq!(line.to_vec(), b"one");
        assert_eq!(cursor.peek(), Some(b'r'));
    }

    #[test]
    fn recurring_anchor_inside_delimiter_is_not_mis_split() {
        // The anchor 'a' recurs inside the delimiter "aab"; the fallback must
        // resume one element past each failed anchor, not past the partial
        // match.
        let mut cursor = flat(b"aaab tail");
        let result = cursor.try_read_to_seq(b"aab", true).unwrap();
        assert_eq!(result.as_contiguous().unwrap(), b"a");
        assert_eq!(cursor.peek(), Some(b' '));
    }

    #[test]
    fn multi_delimiter_not_found_restores_the_cursor() {
        let mut cursor = flat(b"aaaa");
        assert!(cursor.try_read_to_seq(b"ab", true).is_none());
        assert_eq!(cursor.consumed(), 0);
    }

    #[test]
    fn multi_delimiter_advance_past_false_stops_before_it() {
        let mut cursor = flat(b"one\r\nrest");
        let line = cursor.try_read_to_seq(b"\r\n", false).unwrap();
        assert_eq!(line.as_contiguous().unwrap(), b"one");
        assert!(cursor.is_next_run(b"\r\n", false));
    }
}
