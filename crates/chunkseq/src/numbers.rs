//! Fixed-width endian-aware numeric reads for byte cursors.
//!
//! Each reader copies `size_of::<T>()` bytes through
//! [`Cursor::try_copy_to`](crate::Cursor::try_copy_to) into a stack buffer,
//! reinterprets them with the requested endianness (byte order is swapped
//! transparently whenever it differs from native order), and consumes the
//! bytes only on success. When fewer bytes remain the read returns `None`
//! and the cursor is unchanged, so a streaming caller can buffer more input
//! and retry the identical call.

use crate::cursor::Cursor;

macro_rules! fixed_width_reads {
    ($($le:ident, $be:ident => $ty:ty;)*) => {$(
        #[doc = concat!("Reads a little-endian `", stringify!($ty), "`.")]
        #[doc = ""]
        #[doc = "`None` (cursor unchanged) when fewer bytes remain."]
        pub fn $le(&mut self) -> Option<$ty> {
            let mut raw = [0u8; core::mem::size_of::<$ty>()];
            if !self.try_copy_to(&mut raw) {
                return None;
            }
            self.advance_unchecked(raw.len());
            Some(<$ty>::from_le_bytes(raw))
        }

        #[doc = concat!("Reads a big-endian `", stringify!($ty), "`.")]
        #[doc = ""]
        #[doc = "`None` (cursor unchanged) when fewer bytes remain."]
        pub fn $be(&mut self) -> Option<$ty> {
            let mut raw = [0u8; core::mem::size_of::<$ty>()];
            if !self.try_copy_to(&mut raw) {
                return None;
            }
            self.advance_unchecked(raw.len());
            Some(<$ty>::from_be_bytes(raw))
        }
    )*};
}

impl<'a> Cursor<'a, u8> {
    fixed_width_reads! {
        try_read_u16_le, try_read_u16_be => u16;
        try_read_i16_le, try_read_i16_be => i16;
        try_read_u32_le, try_read_u32_be => u32;
        try_read_i32_le, try_read_i32_be => i32;
        try_read_u64_le, try_read_u64_be => u64;
        try_read_i64_le, try_read_i64_be => i64;
        try_read_f32_le, try_read_f32_be => f32;
        try_read_f64_le, try_read_f64_be => f64;
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{Chunk, Cursor, Sequence};

    #[test]
    fn little_and_big_endian_disagree_on_the_same_bytes() {
        let data = [0x01u8, 0x02, 0x03, 0x04];
        let seq = Sequence::from_slice(&data, 0, 4).unwrap();

        let mut le = Cursor::new(seq);
        assert_eq!(le.try_read_u32_le(), Some(0x0403_0201));
        let mut be = Cursor::new(seq);
        assert_eq!(be.try_read_u32_be(), Some(0x0102_0304));
    }

    #[test]
    fn short_input_leaves_the_cursor_unchanged() {
        let data = [0xFFu8, 0xEE, 0xDD];
        let seq = Sequence::from_slice(&data, 0, 3).unwrap();
        let mut cursor = Cursor::new(seq);
        assert_eq!(cursor.try_read_u32_be(), None);
        assert_eq!(cursor.consumed(), 0);
        assert_eq!(cursor.try_read_u16_be(), Some(0xFFEE));
        assert_eq!(cursor.remaining(), 1);
        assert_eq!(cursor.try_read_u16_be(), None);
        assert_eq!(cursor.remaining(), 1);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn big_endian_u32_round_trips_across_a_run_boundary(#[case] split: usize) {
        let value = 0xDEAD_BEEFu32;
        let data = value.to_be_bytes();
        let tail = Chunk::new(&data[split..], split, None);
        let head = Chunk::new(&data[..split], 0, Some(&tail));
        let seq = Sequence::from_chain(&head, 0, &tail, 4 - split).unwrap();
        let mut cursor = Cursor::new(seq);
        assert_eq!(cursor.try_read_u32_be(), Some(value));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn signed_and_float_readers_reinterpret_bytes() {
        let data = (-5i64).to_le_bytes();
        let seq = Sequence::from_slice(&data, 0, 8).unwrap();
        assert_eq!(Cursor::new(seq).try_read_i64_le(), Some(-5));

        let data = 1.5f64.to_be_bytes();
        let seq = Sequence::from_slice(&data, 0, 8).unwrap();
        assert_eq!(Cursor::new(seq).try_read_f64_be(), Some(1.5));
    }
}
