//! Header constants

/// Magic bytes identifying an encoded document, written verbatim under both
/// byte orders
pub const MAGIC: [u8; 2] = *b"BT";

/// Oldest format version this codec understands
pub const MIN_VERSION: u16 = 1;

/// Newest format version this codec understands
pub const MAX_VERSION: u16 = 4;
