//! AutoWrapper DOM
//!
//! A small, thread-safe element tree that wrappers read and write through.
//!
//! # Core Concepts
//!
//! - [`Document`]: Cheap clonable handle to an arena of nodes
//! - [`NodeId`]: Stable index of a node inside its document
//! - [`QName`]: Local name plus namespace, with the legacy namespace rule
//!
//! The tree only offers the primitive operations the wrapper runtime needs:
//! element creation, child append/remove, lookup by name and namespace,
//! attribute get/set and text content. Serialization via
//! [`Document::to_xml`] is provided for persistence collaborators.
//!
//! # Example
//!
//! ```rust
//! use autowrap_dom::Document;
//!
//! let doc = Document::with_root("Single", None);
//! let root = doc.root().unwrap();
//! doc.set_attribute(root, "Key", "Blah").unwrap();
//!
//! assert_eq!(doc.attribute(root, "Key").unwrap().as_deref(), Some("Blah"));
//! assert_eq!(doc.to_xml(), r#"<Single Key="Blah"/>"#);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod document;
mod error;
mod name;
mod serialize;

// Re-exports
pub use document::{Document, NodeId};
pub use error::{DomError, DomResult};
pub use name::{namespace_matches, QName};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
