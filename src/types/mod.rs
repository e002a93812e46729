//! Core types for the tagtree format

mod header;
mod node;
mod settings;
mod tag;

pub use header::{MAGIC, MAX_VERSION, MIN_VERSION};
pub use node::Node;
pub use settings::Settings;
pub use tag::NodeTag;
