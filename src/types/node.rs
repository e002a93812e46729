//! The tagged-union node type

use super::NodeTag;

/// One value in a document tree.
///
/// A decoded tree owns all of its data; strings and blobs referenced through
/// side tables on disk come back inlined. Dictionaries keep their entries in
/// insertion order, but equality treats them as unordered maps since only the
/// on-disk encoding is sorted.
#[derive(Debug, Clone)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i32),
    /// Requires format version 2 or newer
    UInt(u32),
    Float(f32),
    /// Requires format version 3 or newer
    Int64(i64),
    /// Requires format version 3 or newer
    UInt64(u64),
    /// Requires format version 3 or newer
    Double(f64),
    String(String),
    Binary(Vec<u8>),
    Array(Vec<Node>),
    Dictionary(Vec<(String, Node)>),
}

impl Node {
    /// Wire type code for this node
    pub fn tag(&self) -> NodeTag {
        match self {
            Node::Null => NodeTag::Null,
            Node::Bool(_) => NodeTag::Bool,
            Node::Int(_) => NodeTag::Int,
            Node::UInt(_) => NodeTag::UInt,
            Node::Float(_) => NodeTag::Float,
            Node::Int64(_) => NodeTag::Int64,
            Node::UInt64(_) => NodeTag::UInt64,
            Node::Double(_) => NodeTag::Double,
            Node::String(_) => NodeTag::String,
            Node::Binary(_) => NodeTag::Binary,
            Node::Array(_) => NodeTag::Array,
            Node::Dictionary(_) => NodeTag::Dictionary,
        }
    }

    /// Whether this node may serve as a document root
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Array(_) | Node::Dictionary(_))
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i32
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Node::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32
    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Node::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f32
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Node::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Node::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64
    pub fn as_uint64(&self) -> Option<u64> {
        match self {
            Node::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Node::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as binary blob
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Node::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get as array
    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as dictionary entries
    pub fn as_dictionary(&self) -> Option<&[(String, Node)]> {
        match self {
            Node::Dictionary(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a dictionary entry by key
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Dictionary(entries) => {
                entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Null, Node::Null) => true,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Int(a), Node::Int(b)) => a == b,
            (Node::UInt(a), Node::UInt(b)) => a == b,
            (Node::Float(a), Node::Float(b)) => a == b,
            (Node::Int64(a), Node::Int64(b)) => a == b,
            (Node::UInt64(a), Node::UInt64(b)) => a == b,
            (Node::Double(a), Node::Double(b)) => a == b,
            (Node::String(a), Node::String(b)) => a == b,
            (Node::Binary(a), Node::Binary(b)) => a == b,
            (Node::Array(a), Node::Array(b)) => a == b,
            (Node::Dictionary(a), Node::Dictionary(b)) => {
                // Unordered comparison: only the encoded form is sorted
                if a.len() != b.len() {
                    return false;
                }
                let mut lhs: Vec<&(String, Node)> = a.iter().collect();
                let mut rhs: Vec<&(String, Node)> = b.iter().collect();
                lhs.sort_by(|x, y| x.0.as_bytes().cmp(y.0.as_bytes()));
                rhs.sort_by(|x, y| x.0.as_bytes().cmp(y.0.as_bytes()));
                lhs == rhs
            }
            _ => false,
        }
    }
}

// Convenience From impls for Node
impl From<bool> for Node {
    fn from(v: bool) -> Self {
        Node::Bool(v)
    }
}

impl From<i32> for Node {
    fn from(v: i32) -> Self {
        Node::Int(v)
    }
}

impl From<u32> for Node {
    fn from(v: u32) -> Self {
        Node::UInt(v)
    }
}

impl From<f32> for Node {
    fn from(v: f32) -> Self {
        Node::Float(v)
    }
}

impl From<i64> for Node {
    fn from(v: i64) -> Self {
        Node::Int64(v)
    }
}

impl From<u64> for Node {
    fn from(v: u64) -> Self {
        Node::UInt64(v)
    }
}

impl From<f64> for Node {
    fn from(v: f64) -> Self {
        Node::Double(v)
    }
}

impl From<String> for Node {
    fn from(v: String) -> Self {
        Node::String(v)
    }
}

impl From<&str> for Node {
    fn from(v: &str) -> Self {
        Node::String(v.to_string())
    }
}

impl From<Vec<u8>> for Node {
    fn from(v: Vec<u8>) -> Self {
        Node::Binary(v)
    }
}

impl From<Vec<Node>> for Node {
    fn from(v: Vec<Node>) -> Self {
        Node::Array(v)
    }
}
