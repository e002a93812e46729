//! Two-phase container emission
//!
//! A container writes its header word and one 4-byte slot per direct child
//! first; children that do not fit a slot (containers and 64-bit scalars)
//! get a reserved offset placeholder instead, and their bodies follow once
//! every sibling slot is down. Each body is emitted right after its
//! placeholder is satisfied, recursing for grandchildren.

use crate::error::{FormatError, Result};
use crate::layout::{self, ByteOrder, checked_field};
use crate::types::{Node, NodeTag};
use std::io::{Seek, SeekFrom, Write};

/// A reserved 4-byte offset slot.
///
/// Records its own position; [`satisfy`](OffsetHandle::satisfy) later writes
/// the current end of the buffer into that slot and restores the cursor.
/// Reserving writes a literal zero, which doubles as the "absent" marker for
/// table slots that are never satisfied.
pub(super) struct OffsetHandle {
    at: u64,
}

impl OffsetHandle {
    pub(super) fn reserve<W: Write + Seek>(dst: &mut W, order: ByteOrder) -> Result<Self> {
        let at = dst.stream_position()?;
        order.write_u32(dst, 0)?;
        Ok(OffsetHandle { at })
    }

    pub(super) fn satisfy<W: Write + Seek>(self, dst: &mut W, order: ByteOrder) -> Result<()> {
        let end = dst.stream_position()?;
        dst.seek(SeekFrom::Start(self.at))?;
        order.write_u32(dst, layout::checked_offset(end)?)?;
        dst.seek(SeekFrom::Start(end))?;
        Ok(())
    }
}

/// Emit state for the root value: the destination plus the normalized side
/// tables collected beforehand. Blob slots consume a running counter, which
/// matches the collection pass because both walk the tree in the same order.
pub(super) struct Encoder<'p, W> {
    pub(super) dst: W,
    pub(super) order: ByteOrder,
    pub(super) names: &'p [&'p str],
    pub(super) strings: &'p [&'p str],
    pub(super) next_blob: u32,
}

impl<'p, W: Write + Seek> Encoder<'p, W> {
    pub(super) fn write_container(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Array(items) => {
                self.write_word(NodeTag::Array, items.len())?;
                for item in items {
                    self.dst.write_all(&[item.tag().code()])?;
                }
                super::pad4(&mut self.dst)?;

                let mut deferred = Vec::new();
                for item in items {
                    self.write_slot(item, &mut deferred)?;
                }
                self.write_deferred(deferred)
            }
            Node::Dictionary(entries) => {
                // Sorted entry order is part of the wire format; consumers
                // may binary-search it
                let mut sorted: Vec<&(String, Node)> = entries.iter().collect();
                sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

                self.write_word(NodeTag::Dictionary, sorted.len())?;
                let mut deferred = Vec::new();
                for (key, value) in sorted {
                    let index = table_index(self.names, key, "name")?;
                    self.dst.write_all(&layout::pack_entry(
                        self.order,
                        index,
                        value.tag().code(),
                    ))?;
                    self.write_slot(value, &mut deferred)?;
                }
                self.write_deferred(deferred)
            }
            _ => Err(FormatError::InvalidRoot),
        }
    }

    /// Emit one 4-byte child slot: the inline value, a side-table index, or
    /// a reserved offset placeholder queued for the body phase.
    fn write_slot<'n>(
        &mut self,
        node: &'n Node,
        deferred: &mut Vec<(&'n Node, OffsetHandle)>,
    ) -> Result<()> {
        match node {
            Node::Null => Ok(self.order.write_u32(&mut self.dst, 0)?),
            Node::Bool(b) => Ok(self.order.write_u32(&mut self.dst, *b as u32)?),
            Node::Int(v) => Ok(self.order.write_i32(&mut self.dst, *v)?),
            Node::UInt(v) => Ok(self.order.write_u32(&mut self.dst, *v)?),
            Node::Float(v) => Ok(self.order.write_f32(&mut self.dst, *v)?),
            Node::String(s) => {
                let index = table_index(self.strings, s, "string")?;
                Ok(self.order.write_u32(&mut self.dst, index)?)
            }
            Node::Binary(_) => {
                let index = self.next_blob;
                self.next_blob += 1;
                Ok(self.order.write_u32(&mut self.dst, index)?)
            }
            Node::Int64(_)
            | Node::UInt64(_)
            | Node::Double(_)
            | Node::Array(_)
            | Node::Dictionary(_) => {
                let handle = OffsetHandle::reserve(&mut self.dst, self.order)?;
                deferred.push((node, handle));
                Ok(())
            }
        }
    }

    fn write_deferred(&mut self, deferred: Vec<(&Node, OffsetHandle)>) -> Result<()> {
        for (node, handle) in deferred {
            super::pad4(&mut self.dst)?;
            handle.satisfy(&mut self.dst, self.order)?;
            match node {
                Node::Int64(v) => self.order.write_i64(&mut self.dst, *v)?,
                Node::UInt64(v) => self.order.write_u64(&mut self.dst, *v)?,
                Node::Double(v) => self.order.write_f64(&mut self.dst, *v)?,
                n => self.write_container(n)?,
            }
        }
        Ok(())
    }

    fn write_word(&mut self, tag: NodeTag, count: usize) -> Result<()> {
        let count = checked_field(count)?;
        self.dst
            .write_all(&layout::pack_word(self.order, tag.code(), count))?;
        Ok(())
    }
}

/// Index of `value` in a sorted side table. The collection pass put every
/// referenced value in the table, so a miss means the table is inconsistent
/// with the tree.
fn table_index(entries: &[&str], value: &str, table: &'static str) -> Result<u32> {
    match entries.binary_search(&value) {
        Ok(i) => Ok(i as u32),
        Err(_) => Err(FormatError::MalformedTable(table)),
    }
}
