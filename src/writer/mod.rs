//! Encode engine for the tagtree format
//!
//! Three passes: collect the side-table contents, normalize them (byte-wise
//! sort of names and strings), then emit the header, the tables, and the
//! root container with the reserve/satisfy offset protocol. Nothing is
//! written until the whole tree has been validated.

mod collect;
mod node;
mod table;

use crate::error::{FormatError, Result};
use crate::layout::align_up;
use crate::types::{MAGIC, MAX_VERSION, MIN_VERSION, Node, Settings};
use node::{Encoder, OffsetHandle};
use std::io::{Cursor, Seek, Write};

/// Encode a document into any seekable byte sink.
pub fn write<W: Write + Seek>(mut dst: W, root: &Node, settings: &Settings) -> Result<()> {
    let order = settings.byte_order;
    let version = settings.version.ok_or(FormatError::MissingVersion)?;
    if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
        return Err(FormatError::UnsupportedVersion(version));
    }
    if settings.blob_table && version != 1 {
        return Err(FormatError::BlobTableVersion(version));
    }
    if !root.is_container() {
        return Err(FormatError::InvalidRoot);
    }

    let plan = collect::collect(root, version)?;
    if !settings.blob_table && !plan.blobs.is_empty() {
        return Err(FormatError::BlobTableDisabled);
    }

    dst.write_all(&MAGIC)?;
    order.write_u16(&mut dst, version)?;
    let name_slot = OffsetHandle::reserve(&mut dst, order)?;
    let string_slot = OffsetHandle::reserve(&mut dst, order)?;
    let blob_slot = if settings.blob_table {
        Some(OffsetHandle::reserve(&mut dst, order)?)
    } else {
        None
    };
    let root_slot = OffsetHandle::reserve(&mut dst, order)?;

    // The name table is always emitted, even when empty
    name_slot.satisfy(&mut dst, order)?;
    table::write_string_table(&mut dst, order, &plan.names)?;

    // Absent tables keep the literal zero their reserved slot was born with
    if !plan.strings.is_empty() {
        string_slot.satisfy(&mut dst, order)?;
        table::write_string_table(&mut dst, order, &plan.strings)?;
    }
    if let Some(slot) = blob_slot {
        if !plan.blobs.is_empty() {
            slot.satisfy(&mut dst, order)?;
            table::write_blob_table(&mut dst, order, &plan.blobs)?;
        }
    }

    root_slot.satisfy(&mut dst, order)?;
    let mut enc = Encoder {
        dst: &mut dst,
        order,
        names: &plan.names,
        strings: &plan.strings,
        next_blob: 0,
    };
    enc.write_container(root)?;
    Ok(())
}

/// Encode a document to an in-memory buffer.
pub fn to_bytes(root: &Node, settings: &Settings) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    write(&mut buf, root, settings)?;
    Ok(buf.into_inner())
}

/// Zero-pad the sink forward to the next 4-byte boundary.
pub(crate) fn pad4<W: Write + Seek>(dst: &mut W) -> Result<()> {
    let pos = dst.stream_position()?;
    for _ in pos..align_up(pos, 4) {
        dst.write_all(&[0])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{self, ByteOrder};

    fn v(version: u16) -> Settings {
        Settings::new(ByteOrder::Little, version)
    }

    #[test]
    fn header_shape_without_blob_table() {
        let root = Node::Array(vec![Node::Int(7)]);
        let bytes = to_bytes(&root, &v(2)).unwrap();

        assert_eq!(&bytes[0..2], &MAGIC);
        assert_eq!(u16::from_le_bytes([bytes[2], bytes[3]]), 2);
        // Name table directly after the 16-byte header
        let name_off = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        assert_eq!(name_off, 16);
        // No strings anywhere: the string-table slot stays zero
        let string_off = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
        assert_eq!(string_off, 0);
        let root_off = u32::from_le_bytes(bytes[12..16].try_into().unwrap());
        let (code, count) = layout::unpack_word(
            ByteOrder::Little,
            bytes[root_off as usize..root_off as usize + 4]
                .try_into()
                .unwrap(),
        );
        assert_eq!(code, 0xC0);
        assert_eq!(count, 1);
    }

    #[test]
    fn header_shape_with_blob_table() {
        let settings = Settings::new(ByteOrder::Little, 1).with_blob_table();
        let root = Node::Array(vec![Node::Binary(vec![1, 2, 3])]);
        let bytes = to_bytes(&root, &settings).unwrap();

        // Four offset fields: name, string, blob, root
        let blob_off = u32::from_le_bytes(bytes[12..16].try_into().unwrap());
        let (code, count) = layout::unpack_word(
            ByteOrder::Little,
            bytes[blob_off as usize..blob_off as usize + 4]
                .try_into()
                .unwrap(),
        );
        assert_eq!(code, 0xC3);
        assert_eq!(count, 1);
    }

    #[test]
    fn missing_version_rejected() {
        let settings = Settings {
            version: None,
            ..Settings::default()
        };
        let root = Node::Array(vec![]);
        assert!(matches!(
            to_bytes(&root, &settings),
            Err(FormatError::MissingVersion)
        ));
    }

    #[test]
    fn scalar_root_rejected() {
        assert!(matches!(
            to_bytes(&Node::Int(1), &v(2)),
            Err(FormatError::InvalidRoot)
        ));
        assert!(matches!(
            to_bytes(&Node::Null, &v(2)),
            Err(FormatError::InvalidRoot)
        ));
    }

    #[test]
    fn blob_table_requires_version_one() {
        let settings = Settings::new(ByteOrder::Little, 2).with_blob_table();
        let root = Node::Array(vec![]);
        assert!(matches!(
            to_bytes(&root, &settings),
            Err(FormatError::BlobTableVersion(2))
        ));
    }

    #[test]
    fn blobs_without_blob_table_rejected() {
        let root = Node::Array(vec![Node::Binary(vec![1])]);
        assert!(matches!(
            to_bytes(&root, &v(1)),
            Err(FormatError::BlobTableDisabled)
        ));
    }

    #[test]
    fn gated_node_fails_before_any_output() {
        let root = Node::Array(vec![Node::Double(1.0)]);
        let mut buf = Cursor::new(Vec::new());
        assert!(matches!(
            write(&mut buf, &root, &v(2)),
            Err(FormatError::VersionGated { .. })
        ));
        assert!(buf.into_inner().is_empty());
    }

    #[test]
    fn unsupported_target_version_rejected() {
        let root = Node::Array(vec![]);
        assert!(matches!(
            to_bytes(&root, &v(0)),
            Err(FormatError::UnsupportedVersion(0))
        ));
        assert!(matches!(
            to_bytes(&root, &v(9)),
            Err(FormatError::UnsupportedVersion(9))
        ));
    }
}
