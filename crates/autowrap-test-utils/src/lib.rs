//! Testing utilities for AutoWrapper workspace
//!
//! Shared test helpers, schema fixtures, and DOM builders.

#![allow(missing_docs)]

pub mod fixtures;

use autowrap_dom::{Document, NodeId};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber honoring `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `<name/>` as a fresh document
pub fn create_document(root: &str) -> (Document, NodeId) {
    let doc = Document::with_root(root, None);
    let node = doc.root().unwrap();
    (doc, node)
}

/// `<Single Key="..."/>`
pub fn create_single(key: &str) -> (Document, NodeId) {
    let (doc, root) = create_document("Single");
    doc.set_attribute(root, "Key", key).unwrap();
    (doc, root)
}

/// Append `<name Key="..."/>` under `parent` for every key
pub fn append_keyed(doc: &Document, parent: NodeId, name: &str, keys: &[&str]) -> Vec<NodeId> {
    keys.iter()
        .map(|key| {
            let child = doc.append_element(parent, name, None).unwrap();
            doc.set_attribute(child, "Key", key).unwrap();
            child
        })
        .collect()
}

/// `<Single><Child Key=".."/>...</Single>`
pub fn create_with_children(keys: &[&str]) -> (Document, NodeId) {
    let (doc, root) = create_document("Single");
    append_keyed(&doc, root, "Child", keys);
    (doc, root)
}

/// `<Single><Children><Child Key=".."/>...</Children></Single>`
pub fn create_with_contained_children(keys: &[&str]) -> (Document, NodeId) {
    let (doc, root) = create_document("Single");
    let container = doc.append_element(root, "Children", None).unwrap();
    append_keyed(&doc, container, "Child", keys);
    (doc, root)
}

/// `<root><name>text</name></root>`
pub fn create_with_element_text(root_name: &str, name: &str, text: &str) -> (Document, NodeId) {
    let (doc, root) = create_document(root_name);
    let child = doc.append_element(root, name, None).unwrap();
    doc.set_text(child, text).unwrap();
    (doc, root)
}
