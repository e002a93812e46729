//! Decode engine for the tagtree format
//!
//! Reads the header, materializes the three side tables, then decodes the
//! tree from the root offset, resolving offset-indirected nodes with a
//! save/restore cursor discipline.

mod node;
mod table;

use crate::error::{FormatError, Result};
use crate::layout::{self, ByteOrder};
use crate::types::{MAGIC, MAX_VERSION, MIN_VERSION, Node, NodeTag, Settings};
use byteorder::ReadBytesExt;
use std::io::{Cursor, Read, Seek, SeekFrom};

/// Decode a document from any seekable byte source.
pub fn read<R: Read + Seek>(mut src: R, settings: &Settings) -> Result<Node> {
    let order = settings.byte_order;

    let mut magic = [0u8; 2];
    src.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(FormatError::BadMagic);
    }

    let version = order.read_u16(&mut src)?;
    if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
        return Err(FormatError::UnsupportedVersion(version));
    }
    if let Some(expected) = settings.version {
        if version != expected {
            return Err(FormatError::VersionMismatch {
                found: version,
                expected,
            });
        }
    }
    if settings.blob_table && version != 1 {
        return Err(FormatError::BlobTableVersion(version));
    }

    let name_offset = order.read_u32(&mut src)?;
    let string_offset = order.read_u32(&mut src)?;
    let blob_offset = if settings.blob_table {
        order.read_u32(&mut src)?
    } else {
        0
    };
    let root_offset = order.read_u32(&mut src)?;

    let mut dec = Decoder {
        src,
        order,
        version,
        depth: 0,
        names: Vec::new(),
        strings: Vec::new(),
        blobs: Vec::new(),
    };

    // The name table is always present, even when empty
    dec.names = dec.read_string_table(name_offset, "name")?;
    if string_offset != 0 {
        dec.strings = dec.read_string_table(string_offset, "string")?;
    }
    if settings.blob_table && blob_offset != 0 {
        dec.blobs = dec.read_blob_table(blob_offset)?;
    }

    dec.read_root(root_offset)
}

/// Decode a document from an in-memory buffer.
pub fn from_bytes(bytes: &[u8], settings: &Settings) -> Result<Node> {
    read(Cursor::new(bytes), settings)
}

/// Decode state: the byte source plus the side tables resolved so far.
///
/// Lives only for the duration of one [`read`] call; the returned tree has
/// every string and blob inlined as an owned value.
pub(crate) struct Decoder<R> {
    src: R,
    order: ByteOrder,
    version: u16,
    depth: u32,
    names: Vec<String>,
    strings: Vec<String>,
    blobs: Vec<Vec<u8>>,
}

impl<R: Read + Seek> Decoder<R> {
    fn pos(&mut self) -> Result<u64> {
        Ok(self.src.stream_position()?)
    }

    fn seek_to(&mut self, off: u64) -> Result<()> {
        self.src.seek(SeekFrom::Start(off))?;
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.src.read_u8()?)
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(self.order.read_u32(&mut self.src)?)
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(self.order.read_i32(&mut self.src)?)
    }

    fn read_f32(&mut self) -> Result<f32> {
        Ok(self.order.read_f32(&mut self.src)?)
    }

    fn read_i64(&mut self) -> Result<i64> {
        Ok(self.order.read_i64(&mut self.src)?)
    }

    fn read_u64(&mut self) -> Result<u64> {
        Ok(self.order.read_u64(&mut self.src)?)
    }

    fn read_f64(&mut self) -> Result<f64> {
        Ok(self.order.read_f64(&mut self.src)?)
    }

    /// Read a packed (type, count) word at the current position.
    fn read_word(&mut self) -> Result<(u8, u32)> {
        let mut word = [0u8; 4];
        self.src.read_exact(&mut word)?;
        Ok(layout::unpack_word(self.order, word))
    }

    /// Read a dictionary entry's packed (name-index, type) word.
    fn read_entry_word(&mut self) -> Result<(u32, u8)> {
        let mut word = [0u8; 4];
        self.src.read_exact(&mut word)?;
        Ok(layout::unpack_entry(self.order, word))
    }

    /// Resolve a raw type byte, rejecting unknown codes and kinds that are
    /// illegal under the declared format version.
    fn resolve_tag(&self, code: u8) -> Result<NodeTag> {
        let tag = NodeTag::from_code(code).ok_or(FormatError::UnknownTag(code))?;
        let required = tag.min_version();
        if self.version < required {
            return Err(FormatError::VersionGated {
                code,
                required,
                version: self.version,
            });
        }
        Ok(tag)
    }

    fn name(&self, index: u32) -> Result<&str> {
        self.names
            .get(index as usize)
            .map(String::as_str)
            .ok_or(FormatError::IndexOutOfRange {
                table: "name",
                index,
            })
    }

    fn string(&self, index: u32) -> Result<&str> {
        self.strings
            .get(index as usize)
            .map(String::as_str)
            .ok_or(FormatError::IndexOutOfRange {
                table: "string",
                index,
            })
    }

    fn blob(&self, index: u32) -> Result<&[u8]> {
        self.blobs
            .get(index as usize)
            .map(Vec::as_slice)
            .ok_or(FormatError::IndexOutOfRange {
                table: "blob",
                index,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer;

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn roundtrip_scalars_in_array() {
        let root = Node::Array(vec![
            Node::Null,
            Node::Bool(true),
            Node::Bool(false),
            Node::Int(-42),
            Node::UInt(42),
            Node::Float(1.5),
        ]);
        let bytes = writer::to_bytes(&root, &settings()).unwrap();
        assert_eq!(from_bytes(&bytes, &settings()).unwrap(), root);
    }

    #[test]
    fn roundtrip_wide_scalars() {
        let s = Settings::new(ByteOrder::Little, 3);
        let root = Node::Array(vec![
            Node::Int64(i64::MIN),
            Node::UInt64(u64::MAX),
            Node::Double(std::f64::consts::PI),
        ]);
        let bytes = writer::to_bytes(&root, &s).unwrap();
        assert_eq!(from_bytes(&bytes, &s).unwrap(), root);
    }

    #[test]
    fn roundtrip_dictionary() {
        let root = Node::Dictionary(vec![
            ("name".into(), Node::String("frost_cave".into())),
            ("depth".into(), Node::Int(12)),
            ("lit".into(), Node::Bool(false)),
        ]);
        let bytes = writer::to_bytes(&root, &settings()).unwrap();
        assert_eq!(from_bytes(&bytes, &settings()).unwrap(), root);
    }

    #[test]
    fn roundtrip_nested_containers() {
        let root = Node::Dictionary(vec![
            (
                "rooms".into(),
                Node::Array(vec![
                    Node::Dictionary(vec![("id".into(), Node::Int(1))]),
                    Node::Dictionary(vec![("id".into(), Node::Int(2))]),
                ]),
            ),
            ("count".into(), Node::Int(2)),
        ]);
        let bytes = writer::to_bytes(&root, &settings()).unwrap();
        assert_eq!(from_bytes(&bytes, &settings()).unwrap(), root);
    }

    #[test]
    fn bad_magic_rejected() {
        let root = Node::Array(vec![Node::Int(1)]);
        let mut bytes = writer::to_bytes(&root, &settings()).unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            from_bytes(&bytes, &settings()),
            Err(FormatError::BadMagic)
        ));
    }

    #[test]
    fn version_pin_mismatch_rejected() {
        let root = Node::Array(vec![Node::Int(1)]);
        let bytes = writer::to_bytes(&root, &Settings::new(ByteOrder::Little, 2)).unwrap();
        let pinned = Settings::new(ByteOrder::Little, 3);
        assert!(matches!(
            from_bytes(&bytes, &pinned),
            Err(FormatError::VersionMismatch {
                found: 2,
                expected: 3
            })
        ));
    }

    #[test]
    fn unpinned_decode_accepts_any_supported_version() {
        let root = Node::Array(vec![Node::Int(1)]);
        let bytes = writer::to_bytes(&root, &Settings::new(ByteOrder::Little, 3)).unwrap();
        let open = Settings {
            version: None,
            ..Settings::default()
        };
        assert_eq!(from_bytes(&bytes, &open).unwrap(), root);
    }

    #[test]
    fn truncated_input_rejected() {
        let root = Node::Array(vec![Node::Int(1), Node::Int(2)]);
        let bytes = writer::to_bytes(&root, &settings()).unwrap();
        let truncated = &bytes[..bytes.len() - 3];
        assert!(matches!(
            from_bytes(truncated, &settings()),
            Err(FormatError::Io(_))
        ));
    }

    #[test]
    fn gated_tag_under_old_version_rejected() {
        // Encode an Int64 under version 3, then rewrite the header to claim
        // version 2. The decoder must reject the gated node, not guess.
        let s = Settings::new(ByteOrder::Little, 3);
        let root = Node::Array(vec![Node::Int64(7)]);
        let mut bytes = writer::to_bytes(&root, &s).unwrap();
        bytes[2..4].copy_from_slice(&2u16.to_le_bytes());
        let open = Settings {
            version: None,
            ..Settings::default()
        };
        assert!(matches!(
            from_bytes(&bytes, &open),
            Err(FormatError::VersionGated {
                code: 0xD4,
                required: 3,
                version: 2
            })
        ));
    }
}
