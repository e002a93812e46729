//! Side-table body decoding
//!
//! Both table kinds share one shape: a packed (type, count) word, `count + 1`
//! offsets relative to the body start, then the payload. Strings are
//! null-terminated; blob lengths come from consecutive offset differences,
//! which is why the trailing offset exists.

use super::Decoder;
use crate::error::{FormatError, Result};
use crate::types::NodeTag;
use std::io::{Read, Seek};

impl<R: Read + Seek> Decoder<R> {
    pub(super) fn read_string_table(
        &mut self,
        offset: u32,
        table: &'static str,
    ) -> Result<Vec<String>> {
        let count = self.read_table_header(offset, NodeTag::StringTable)?;
        let offsets = self.read_offset_block(count)?;

        let mut entries = Vec::with_capacity(count as usize);
        for rel in offsets.iter().take(count as usize) {
            self.seek_to(offset as u64 + *rel as u64)?;
            entries.push(self.read_cstring(table)?);
        }
        Ok(entries)
    }

    pub(super) fn read_blob_table(&mut self, offset: u32) -> Result<Vec<Vec<u8>>> {
        let count = self.read_table_header(offset, NodeTag::BinaryTable)?;
        let offsets = self.read_offset_block(count)?;

        let mut entries = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let start = offsets[i];
            let end = offsets[i + 1];
            if end < start {
                return Err(FormatError::MalformedTable("blob"));
            }
            self.seek_to(offset as u64 + start as u64)?;
            let mut blob = vec![0u8; (end - start) as usize];
            self.src.read_exact(&mut blob)?;
            entries.push(blob);
        }
        Ok(entries)
    }

    fn read_table_header(&mut self, offset: u32, expected: NodeTag) -> Result<u32> {
        self.seek_to(offset as u64)?;
        let (code, count) = self.read_word()?;
        if code != expected.code() {
            return Err(FormatError::UnknownTag(code));
        }
        Ok(count)
    }

    /// The `count + 1` offsets relative to the body start.
    fn read_offset_block(&mut self, count: u32) -> Result<Vec<u32>> {
        let mut offsets = Vec::with_capacity(count as usize + 1);
        for _ in 0..=count {
            offsets.push(self.read_u32()?);
        }
        Ok(offsets)
    }

    fn read_cstring(&mut self, table: &'static str) -> Result<String> {
        let mut bytes = Vec::new();
        loop {
            let b = self.read_u8()?;
            if b == 0 {
                break;
            }
            bytes.push(b);
        }
        String::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8(table))
    }
}
