//! Wire type codes

/// Node type codes as they appear on disk.
///
/// The codes fall into three ranges with distinct slot behavior: `0xA0`/`0xA1`
/// carry a side-table index, `0xC0`-`0xC3` are container kinds stored behind
/// an offset, and `0xD0`-`0xD6` are scalars. The classification lives here as
/// methods instead of being re-derived from the numeric ranges at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeTag {
    /// Slot holds an index into the string table
    String = 0xA0,
    /// Slot holds an index into the blob table
    Binary = 0xA1,
    Array = 0xC0,
    Dictionary = 0xC1,
    /// Table-body kind; never appears as a tree value
    StringTable = 0xC2,
    /// Table-body kind; never appears as a tree value
    BinaryTable = 0xC3,
    Bool = 0xD0,
    Int = 0xD1,
    Float = 0xD2,
    UInt = 0xD3,
    Int64 = 0xD4,
    UInt64 = 0xD5,
    Double = 0xD6,
    Null = 0xFF,
}

impl NodeTag {
    /// Try to convert from the on-disk code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0xA0 => Some(NodeTag::String),
            0xA1 => Some(NodeTag::Binary),
            0xC0 => Some(NodeTag::Array),
            0xC1 => Some(NodeTag::Dictionary),
            0xC2 => Some(NodeTag::StringTable),
            0xC3 => Some(NodeTag::BinaryTable),
            0xD0 => Some(NodeTag::Bool),
            0xD1 => Some(NodeTag::Int),
            0xD2 => Some(NodeTag::Float),
            0xD3 => Some(NodeTag::UInt),
            0xD4 => Some(NodeTag::Int64),
            0xD5 => Some(NodeTag::UInt64),
            0xD6 => Some(NodeTag::Double),
            0xFF => Some(NodeTag::Null),
            _ => None,
        }
    }

    /// On-disk code for this tag
    pub fn code(self) -> u8 {
        self as u8
    }

    /// First format version in which this node kind is legal
    pub fn min_version(self) -> u16 {
        match self {
            NodeTag::UInt => 2,
            NodeTag::Int64 | NodeTag::UInt64 | NodeTag::Double => 3,
            _ => 1,
        }
    }

    /// Array, dictionary, or either table-body kind
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeTag::Array | NodeTag::Dictionary | NodeTag::StringTable | NodeTag::BinaryTable
        )
    }

    /// Whether a nested value of this kind stores a 4-byte offset to an
    /// out-of-line body instead of an inline payload. Covers the containers
    /// and the three 64-bit scalars, which do not fit the 4-byte slot.
    pub fn needs_offset(self) -> bool {
        self.is_container()
            || matches!(self, NodeTag::Int64 | NodeTag::UInt64 | NodeTag::Double)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip() {
        for code in 0..=u8::MAX {
            if let Some(tag) = NodeTag::from_code(code) {
                assert_eq!(tag.code(), code);
            }
        }
    }

    #[test]
    fn unknown_codes_rejected() {
        assert_eq!(NodeTag::from_code(0x00), None);
        assert_eq!(NodeTag::from_code(0xA2), None);
        assert_eq!(NodeTag::from_code(0xC4), None);
        assert_eq!(NodeTag::from_code(0xD7), None);
    }

    #[test]
    fn offset_classification() {
        assert!(NodeTag::Array.needs_offset());
        assert!(NodeTag::Dictionary.needs_offset());
        assert!(NodeTag::Int64.needs_offset());
        assert!(NodeTag::Double.needs_offset());
        assert!(!NodeTag::Int.needs_offset());
        assert!(!NodeTag::Bool.needs_offset());
        assert!(!NodeTag::String.needs_offset());
        assert!(!NodeTag::Null.needs_offset());
    }

    #[test]
    fn version_gates() {
        assert_eq!(NodeTag::Int.min_version(), 1);
        assert_eq!(NodeTag::UInt.min_version(), 2);
        assert_eq!(NodeTag::Int64.min_version(), 3);
        assert_eq!(NodeTag::UInt64.min_version(), 3);
        assert_eq!(NodeTag::Double.min_version(), 3);
    }
}
