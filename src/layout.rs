//! Endianness-aware packing of header and body words
//!
//! Every packed word in the format pairs a one-byte type code with a 24-bit
//! count or index; which byte carries the code depends on the configured byte
//! order. All reads and writes of these words go through this module so the
//! two engines stay byte-for-byte symmetric.

use crate::error::{FormatError, Result};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Largest count or index that fits the 24-bit field of a packed word
pub const FIELD_MAX: u32 = 0x00FF_FFFF;

/// Byte order of an encoded document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

macro_rules! ordered_rw {
    ($read:ident, $write:ident, $ty:ty) => {
        pub fn $read<R: Read>(self, src: &mut R) -> io::Result<$ty> {
            match self {
                ByteOrder::Big => src.$read::<BigEndian>(),
                ByteOrder::Little => src.$read::<LittleEndian>(),
            }
        }

        pub fn $write<W: Write>(self, dst: &mut W, v: $ty) -> io::Result<()> {
            match self {
                ByteOrder::Big => dst.$write::<BigEndian>(v),
                ByteOrder::Little => dst.$write::<LittleEndian>(v),
            }
        }
    };
}

impl ByteOrder {
    ordered_rw!(read_u16, write_u16, u16);
    ordered_rw!(read_u32, write_u32, u32);
    ordered_rw!(read_i32, write_i32, i32);
    ordered_rw!(read_u64, write_u64, u64);
    ordered_rw!(read_i64, write_i64, i64);
    ordered_rw!(read_f32, write_f32, f32);
    ordered_rw!(read_f64, write_f64, f64);
}

/// Pack a (type, count) word as it appears at the start of a container or
/// table body. The type code lands in the first byte on disk under both byte
/// orders; the remaining three bytes hold the count in the configured order.
pub fn pack_word(order: ByteOrder, code: u8, count: u32) -> [u8; 4] {
    debug_assert!(count <= FIELD_MAX);
    match order {
        ByteOrder::Big => (((code as u32) << 24) | (count & FIELD_MAX)).to_be_bytes(),
        ByteOrder::Little => (((count & FIELD_MAX) << 8) | code as u32).to_le_bytes(),
    }
}

/// Inverse of [`pack_word`].
pub fn unpack_word(order: ByteOrder, word: [u8; 4]) -> (u8, u32) {
    match order {
        ByteOrder::Big => {
            let w = u32::from_be_bytes(word);
            ((w >> 24) as u8, w & FIELD_MAX)
        }
        ByteOrder::Little => {
            let w = u32::from_le_bytes(word);
            ((w & 0xFF) as u8, w >> 8)
        }
    }
}

/// Pack a dictionary entry's (name-index, type) word. Mirrored relative to
/// [`pack_word`]: the type code lands in the last byte on disk under both
/// byte orders.
pub fn pack_entry(order: ByteOrder, index: u32, code: u8) -> [u8; 4] {
    debug_assert!(index <= FIELD_MAX);
    match order {
        ByteOrder::Big => (((index & FIELD_MAX) << 8) | code as u32).to_be_bytes(),
        ByteOrder::Little => (((code as u32) << 24) | (index & FIELD_MAX)).to_le_bytes(),
    }
}

/// Inverse of [`pack_entry`].
pub fn unpack_entry(order: ByteOrder, word: [u8; 4]) -> (u32, u8) {
    match order {
        ByteOrder::Big => {
            let w = u32::from_be_bytes(word);
            (w >> 8, (w & 0xFF) as u8)
        }
        ByteOrder::Little => {
            let w = u32::from_le_bytes(word);
            (w & FIELD_MAX, (w >> 24) as u8)
        }
    }
}

/// Round `pos` up to the next multiple of `align` (a power of two).
pub fn align_up(pos: u64, align: u64) -> u64 {
    (pos + align - 1) & !(align - 1)
}

/// Check a container count or table index against the 24-bit field limit.
pub fn checked_field(count: usize) -> Result<u32> {
    if count as u64 > FIELD_MAX as u64 {
        return Err(FormatError::CountOverflow(count));
    }
    Ok(count as u32)
}

/// Check a byte position against the 32-bit offset fields of the format.
/// Documents larger than 4 GiB cannot be addressed and must fail instead of
/// wrapping.
pub fn checked_offset(pos: u64) -> Result<u32> {
    u32::try_from(pos).map_err(|_| FormatError::OffsetOverflow(pos))
}
