//! Codec configuration

use crate::layout::ByteOrder;

/// Configuration for one encode or decode call.
///
/// Treated as opaque by the engines beyond the rules below; how a caller
/// arrives at a particular configuration is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Byte order of the encoded document
    pub byte_order: ByteOrder,
    /// Target version on encode (required); expected version on decode,
    /// where `None` accepts any supported version
    pub version: Option<u16>,
    /// Whether the header carries a blob-table offset. The blob side table
    /// is defined only for version 1 layouts.
    pub blob_table: bool,
}

impl Settings {
    pub fn new(byte_order: ByteOrder, version: u16) -> Self {
        Self {
            byte_order,
            version: Some(version),
            blob_table: false,
        }
    }

    /// Enable the blob side table (version 1 layouts only)
    pub fn with_blob_table(mut self) -> Self {
        self.blob_table = true;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            version: Some(2),
            blob_table: false,
        }
    }
}
