//! Collection and normalization passes
//!
//! One canonical traversal of the tree gathers the side-table contents before
//! any bytes are written: distinct dictionary keys, distinct string values,
//! and the blob list. Names and strings are sets and come out byte-wise
//! sorted; blobs keep traversal order and are never deduplicated.
//!
//! The traversal visits a container's inline children in slot order and its
//! offset-indirected children afterwards, dictionary entries sorted by key —
//! the exact order the emit pass walks the tree — so blob indices can be
//! handed out by a running counter during emission.

use crate::error::{FormatError, Result};
use crate::types::Node;
use std::collections::{BTreeSet, HashSet};

/// Side-table contents for one encode call.
pub(super) struct Plan<'a> {
    /// Distinct dictionary keys, byte-wise ascending
    pub names: Vec<&'a str>,
    /// Distinct string values, byte-wise ascending
    pub strings: Vec<&'a str>,
    /// Blobs in traversal order, duplicates preserved
    pub blobs: Vec<&'a [u8]>,
}

pub(super) fn collect(root: &Node, version: u16) -> Result<Plan<'_>> {
    let mut names = BTreeSet::new();
    let mut strings = BTreeSet::new();
    let mut blobs = Vec::new();
    visit_container(root, version, &mut names, &mut strings, &mut blobs)?;
    Ok(Plan {
        names: names.into_iter().collect(),
        strings: strings.into_iter().collect(),
        blobs,
    })
}

fn visit_container<'a>(
    node: &'a Node,
    version: u16,
    names: &mut BTreeSet<&'a str>,
    strings: &mut BTreeSet<&'a str>,
    blobs: &mut Vec<&'a [u8]>,
) -> Result<()> {
    let mut nested: Vec<&'a Node> = Vec::new();
    match node {
        Node::Array(items) => {
            for item in items {
                visit_slot(item, version, strings, blobs, &mut nested)?;
            }
        }
        Node::Dictionary(entries) => {
            let mut seen: HashSet<&str> = HashSet::with_capacity(entries.len());
            for (key, _) in entries {
                if !seen.insert(key.as_str()) {
                    return Err(FormatError::DuplicateKey(key.clone()));
                }
            }
            let mut sorted: Vec<&'a (String, Node)> = entries.iter().collect();
            sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
            for (key, value) in sorted {
                names.insert(key.as_str());
                visit_slot(value, version, strings, blobs, &mut nested)?;
            }
        }
        _ => {}
    }
    for child in nested {
        visit_container(child, version, names, strings, blobs)?;
    }
    Ok(())
}

fn visit_slot<'a>(
    node: &'a Node,
    version: u16,
    strings: &mut BTreeSet<&'a str>,
    blobs: &mut Vec<&'a [u8]>,
    nested: &mut Vec<&'a Node>,
) -> Result<()> {
    let tag = node.tag();
    let required = tag.min_version();
    if version < required {
        return Err(FormatError::VersionGated {
            code: tag.code(),
            required,
            version,
        });
    }
    match node {
        Node::String(s) => {
            strings.insert(s.as_str());
        }
        Node::Binary(b) => blobs.push(b.as_slice()),
        Node::Array(_) | Node::Dictionary(_) => nested.push(node),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_and_names_are_deduplicated_and_sorted() {
        let root = Node::Dictionary(vec![
            ("b".into(), Node::String("x".into())),
            ("a".into(), Node::String("x".into())),
            (
                "c".into(),
                Node::Array(vec![Node::String("x".into()), Node::String("w".into())]),
            ),
        ]);
        let plan = collect(&root, 1).unwrap();
        assert_eq!(plan.names, ["a", "b", "c"]);
        assert_eq!(plan.strings, ["w", "x"]);
    }

    #[test]
    fn blobs_keep_duplicates_and_traversal_order() {
        let root = Node::Array(vec![
            Node::Binary(vec![1]),
            Node::Binary(vec![1]),
            Node::Binary(vec![2]),
        ]);
        let plan = collect(&root, 1).unwrap();
        assert_eq!(plan.blobs, [&[1][..], &[1][..], &[2][..]]);
    }

    #[test]
    fn blob_order_defers_nested_containers() {
        // Inline siblings come before the bodies of nested containers, so a
        // blob behind an array is collected after its later siblings.
        let root = Node::Dictionary(vec![
            ("a".into(), Node::Binary(vec![0xA])),
            ("b".into(), Node::Array(vec![Node::Binary(vec![0xB])])),
            ("c".into(), Node::Binary(vec![0xC])),
        ]);
        let plan = collect(&root, 1).unwrap();
        assert_eq!(plan.blobs, [&[0xA][..], &[0xC][..], &[0xB][..]]);
    }

    #[test]
    fn duplicate_keys_fail_fast() {
        let root = Node::Dictionary(vec![
            ("hp".into(), Node::Int(1)),
            ("hp".into(), Node::Int(2)),
        ]);
        assert!(matches!(
            collect(&root, 1),
            Err(FormatError::DuplicateKey(k)) if k == "hp"
        ));
    }

    #[test]
    fn gated_nodes_fail_under_old_target_version() {
        let root = Node::Array(vec![Node::UInt(1)]);
        assert!(matches!(
            collect(&root, 1),
            Err(FormatError::VersionGated {
                code: 0xD3,
                required: 2,
                version: 1
            })
        ));
        assert!(collect(&root, 2).is_ok());

        let root = Node::Array(vec![Node::Double(0.5)]);
        assert!(matches!(
            collect(&root, 2),
            Err(FormatError::VersionGated { required: 3, .. })
        ));
    }
}
