//! Side-table body emission
//!
//! Table bodies have fully predictable layout, so the relative offset block
//! is computed up front instead of going through reserve/satisfy handles.

use crate::error::Result;
use crate::layout::{self, ByteOrder, checked_field, checked_offset};
use crate::types::NodeTag;
use std::io::{Seek, Write};

/// Emit a string-table body: packed word, `count + 1` offsets relative to
/// the body start, then null-terminated strings. Used for both the name
/// table and the string table.
pub(super) fn write_string_table<W: Write + Seek>(
    dst: &mut W,
    order: ByteOrder,
    entries: &[&str],
) -> Result<()> {
    let count = checked_field(entries.len())?;
    dst.write_all(&layout::pack_word(
        order,
        NodeTag::StringTable.code(),
        count,
    ))?;

    let mut rel = 4 + 4 * (count as u64 + 1);
    for s in entries {
        order.write_u32(dst, checked_offset(rel)?)?;
        rel += s.len() as u64 + 1;
    }
    order.write_u32(dst, checked_offset(rel)?)?;

    for s in entries {
        dst.write_all(s.as_bytes())?;
        dst.write_all(&[0])?;
    }
    super::pad4(dst)
}

/// Emit a blob-table body: same offset-table shape under the binary-table
/// code, payload stored verbatim. The trailing offset gives the last blob
/// its length.
pub(super) fn write_blob_table<W: Write + Seek>(
    dst: &mut W,
    order: ByteOrder,
    blobs: &[&[u8]],
) -> Result<()> {
    let count = checked_field(blobs.len())?;
    dst.write_all(&layout::pack_word(
        order,
        NodeTag::BinaryTable.code(),
        count,
    ))?;

    let mut rel = 4 + 4 * (count as u64 + 1);
    for b in blobs {
        order.write_u32(dst, checked_offset(rel)?)?;
        rel += b.len() as u64;
    }
    order.write_u32(dst, checked_offset(rel)?)?;

    for b in blobs {
        dst.write_all(b)?;
    }
    super::pad4(dst)
}
