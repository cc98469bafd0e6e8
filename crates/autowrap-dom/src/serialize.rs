//! Text serialization of the tree

use crate::document::{Document, NodeId, NodeKind, Tree};
use crate::error::DomResult;

impl Document {
    /// Serialize the whole document, or an empty string without a root
    #[must_use]
    pub fn to_xml(&self) -> String {
        let tree = self.tree.read();
        let mut out = String::new();
        if let Some(root) = tree.root {
            // The root always exists in its own arena
            let _ = write_node(&tree, root, "", &mut out);
        }
        out
    }

    /// Serialize a single subtree
    ///
    /// # Errors
    /// Fails for unknown nodes
    pub fn node_to_xml(&self, node: NodeId) -> DomResult<String> {
        let tree = self.tree.read();
        let mut out = String::new();
        write_node(&tree, node, "", &mut out)?;
        Ok(out)
    }
}

fn write_node(tree: &Tree, id: NodeId, parent_ns: &str, out: &mut String) -> DomResult<()> {
    match &tree.node(id)?.kind {
        NodeKind::Text(text) => escape_into(text, false, out),
        NodeKind::Element(el) => {
            out.push('<');
            out.push_str(el.name.local());
            if el.name.namespace() != parent_ns {
                out.push_str(" xmlns=\"");
                escape_into(el.name.namespace(), true, out);
                out.push('"');
            }
            for (name, value) in &el.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            if el.children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in &el.children {
                    write_node(tree, *child, el.name.namespace(), out)?;
                }
                out.push_str("</");
                out.push_str(el.name.local());
                out.push('>');
            }
        }
    }
    Ok(())
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
