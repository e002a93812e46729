//! tagtree - Versioned binary tree codec for hierarchical game data
//!
//! A self-describing binary format for persisting trees of scalars, strings,
//! binary blobs, arrays, and string-keyed dictionaries in a single flat
//! buffer. Nested containers and 64-bit scalars live behind absolute byte
//! offsets instead of pointers; dictionary keys and string values are
//! deduplicated into sorted side tables referenced by index.
//!
//! # Features
//!
//! - Big- and little-endian documents from one code path
//! - Format versions 1-4, with newer scalar kinds gated by version
//! - Deterministic output: sorted side tables, sorted dictionary bodies
//! - Optional binary-blob side table for version 1 layouts
//!
//! # Example
//!
//! ```rust
//! use tagtree::{Node, Settings, reader, writer};
//!
//! let root = Node::Dictionary(vec![
//!     ("spawn_count".into(), Node::Int(4)),
//!     (
//!         "actors".into(),
//!         Node::Array(vec![
//!             Node::String("npc_guard".into()),
//!             Node::String("npc_merchant".into()),
//!         ]),
//!     ),
//! ]);
//!
//! let settings = Settings::default();
//! let bytes = writer::to_bytes(&root, &settings).unwrap();
//! let decoded = reader::from_bytes(&bytes, &settings).unwrap();
//! assert_eq!(decoded, root);
//! ```

pub mod error;
pub mod layout;
pub mod reader;
pub mod types;
pub mod writer;

// Re-export common types at crate root
pub use error::{FormatError, Result};
pub use layout::ByteOrder;
pub use reader::from_bytes;
pub use types::{MAGIC, MAX_VERSION, MIN_VERSION, Node, NodeTag, Settings};
pub use writer::to_bytes;
