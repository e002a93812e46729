//! Node and container-body decoding

use super::Decoder;
use crate::error::{FormatError, Result};
use crate::layout::align_up;
use crate::types::{Node, NodeTag};
use std::io::{Read, Seek};

/// Nesting cap while decoding. Offsets are untrusted, so a crafted document
/// can point a container slot back into an enclosing body; the cap turns
/// that cycle into an error instead of unbounded recursion. Far beyond any
/// tree a valid encoder produces in practice.
const MAX_DEPTH: u32 = 256;

impl<R: Read + Seek> Decoder<R> {
    /// Decode the root value. Valid documents only ever have a container at
    /// the root, so anything else is rejected outright.
    pub(super) fn read_root(&mut self, offset: u32) -> Result<Node> {
        self.seek_to(offset as u64)?;
        let code = self.read_u8()?;
        let tag = self.resolve_tag(code)?;
        if !matches!(tag, NodeTag::Array | NodeTag::Dictionary) {
            return Err(FormatError::InvalidRoot);
        }
        // The type byte is part of the body's packed word; re-read from the
        // body start
        self.seek_to(offset as u64)?;
        self.read_container()
    }

    /// Decode a container body at the current position, which begins with a
    /// packed (type, count) word.
    fn read_container(&mut self) -> Result<Node> {
        if self.depth >= MAX_DEPTH {
            return Err(FormatError::NestingTooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let (code, count) = self.read_word()?;
        let tag = self.resolve_tag(code)?;
        let node = match tag {
            NodeTag::Array => self.read_array_body(count),
            NodeTag::Dictionary => self.read_dictionary_body(count),
            _ => Err(FormatError::UnknownTag(code)),
        }?;
        self.depth -= 1;
        Ok(node)
    }

    /// Array body: a block of raw per-element type bytes, padded to a 4-byte
    /// boundary, followed by one 4-byte slot per element.
    fn read_array_body(&mut self, count: u32) -> Result<Node> {
        let mut tags = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let code = self.read_u8()?;
            tags.push(self.resolve_tag(code)?);
        }
        let pos = self.pos()?;
        self.seek_to(align_up(pos, 4))?;

        let mut items = Vec::with_capacity(count as usize);
        for tag in tags {
            items.push(self.read_value(tag)?);
        }
        Ok(Node::Array(items))
    }

    /// Dictionary body: per entry a packed (name-index, type) word followed
    /// directly by the value slot. Entries land in the tree in read order.
    fn read_dictionary_body(&mut self, count: u32) -> Result<Node> {
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (index, code) = self.read_entry_word()?;
            let tag = self.resolve_tag(code)?;
            let key = self.name(index)?.to_string();
            let value = self.read_value(tag)?;
            entries.push((key, value));
        }
        Ok(Node::Dictionary(entries))
    }

    /// Decode one value whose type byte was supplied by the enclosing
    /// container. The 4-byte slot at the current position is either the value
    /// itself or an absolute offset to an out-of-line body; either way the
    /// cursor ends up just past the slot so sibling decoding continues.
    fn read_value(&mut self, tag: NodeTag) -> Result<Node> {
        match tag {
            NodeTag::Null => {
                self.read_u32()?;
                Ok(Node::Null)
            }
            NodeTag::Bool => Ok(Node::Bool(self.read_u32()? != 0)),
            NodeTag::Int => Ok(Node::Int(self.read_i32()?)),
            NodeTag::UInt => Ok(Node::UInt(self.read_u32()?)),
            NodeTag::Float => Ok(Node::Float(self.read_f32()?)),
            NodeTag::String => {
                let index = self.read_u32()?;
                Ok(Node::String(self.string(index)?.to_string()))
            }
            NodeTag::Binary => {
                let index = self.read_u32()?;
                Ok(Node::Binary(self.blob(index)?.to_vec()))
            }
            NodeTag::Int64
            | NodeTag::UInt64
            | NodeTag::Double
            | NodeTag::Array
            | NodeTag::Dictionary => self.read_indirect(tag),
            NodeTag::StringTable | NodeTag::BinaryTable => {
                // Table bodies are not tree values
                Err(FormatError::UnknownTag(tag.code()))
            }
        }
    }

    /// Follow a 4-byte offset slot to an out-of-line body, then restore the
    /// cursor to just after the slot.
    fn read_indirect(&mut self, tag: NodeTag) -> Result<Node> {
        let offset = self.read_u32()?;
        let here = self.pos()?;
        self.seek_to(offset as u64)?;
        let node = match tag {
            NodeTag::Int64 => Node::Int64(self.read_i64()?),
            NodeTag::UInt64 => Node::UInt64(self.read_u64()?),
            NodeTag::Double => Node::Double(self.read_f64()?),
            _ => self.read_container()?,
        };
        self.seek_to(here)?;
        Ok(node)
    }
}
