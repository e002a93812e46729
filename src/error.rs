//! Error types for tagtree

use std::io;
use thiserror::Error;

/// Errors produced while encoding or decoding a document.
///
/// Every failure aborts the whole call; no partial tree is ever returned and
/// nothing is retried internally.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Invalid magic bytes
    #[error("invalid magic bytes, not a tagtree document")]
    BadMagic,
    /// Version outside the range this codec understands
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u16),
    /// Header version disagrees with the version pinned in the settings
    #[error("version mismatch: document declares {found}, expected {expected}")]
    VersionMismatch { found: u16, expected: u16 },
    /// Node kind is illegal under the declared format version
    #[error("node type 0x{code:02X} requires version {required}, document version is {version}")]
    VersionGated { code: u8, required: u16, version: u16 },
    /// Type code not part of the format
    #[error("unknown node type code 0x{0:02X}")]
    UnknownTag(u8),
    /// Node references a side-table entry that does not exist
    #[error("index {index} out of range for the {table} table")]
    IndexOutOfRange { table: &'static str, index: u32 },
    /// Side-table string is not valid UTF-8
    #[error("invalid UTF-8 in {0} table entry")]
    InvalidUtf8(&'static str),
    /// Side-table layout is internally inconsistent
    #[error("malformed {0} table")]
    MalformedTable(&'static str),
    /// Document roots must be containers
    #[error("root node must be an array or a dictionary")]
    InvalidRoot,
    /// Caller supplied a dictionary with duplicate keys
    #[error("duplicate dictionary key {0:?}")]
    DuplicateKey(String),
    /// Encoding needs an explicit target version in the settings
    #[error("encoding requires an explicit target version")]
    MissingVersion,
    /// The blob side table exists only in version 1 layouts
    #[error("blob table is only defined for version 1 layouts, got version {0}")]
    BlobTableVersion(u16),
    /// Tree holds binary blobs but the settings carry no blob table
    #[error("tree contains binary blobs but the blob table is disabled")]
    BlobTableDisabled,
    /// Count or index does not fit the 24-bit field of a packed word
    #[error("count of {0} exceeds the 24-bit field of a packed word")]
    CountOverflow(usize),
    /// Byte position does not fit a 32-bit offset field
    #[error("byte offset {0} exceeds the 32-bit offset field")]
    OffsetOverflow(u64),
    /// Offset cycle or hostile nesting in a decoded document
    #[error("container nesting deeper than {0} levels")]
    NestingTooDeep(u32),
    /// Truncated or otherwise unreadable input
    #[error("truncated or unreadable input: {0}")]
    Io(#[from] io::Error),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, FormatError>;
