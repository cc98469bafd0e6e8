//! Arena-backed element tree
//!
//! Nodes are never freed; removing a node detaches it from its parent so any
//! [`NodeId`] held elsewhere stays valid (it simply no longer belongs to the
//! visible tree). The arena therefore only grows, and [`Document::node_count`]
//! keeps counting removed nodes. A long-lived document that keeps adding and
//! removing items should be written out with [`Document::to_xml`] and rebuilt
//! into a fresh document.

use crate::error::{DomError, DomResult};
use crate::name::QName;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Index of a node within its [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) fn from_raw(index: usize) -> Self {
        Self(index)
    }

    /// Arena index
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub(crate) name: QName,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

#[derive(Debug, Default)]
pub(crate) struct Tree {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) root: Option<NodeId>,
}

impl Tree {
    pub(crate) fn node(&self, id: NodeId) -> DomResult<&NodeData> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut NodeData> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }

    pub(crate) fn element(&self, id: NodeId) -> DomResult<&ElementData> {
        match &self.node(id)?.kind {
            NodeKind::Element(el) => Ok(el),
            NodeKind::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(el) => Ok(el),
            NodeKind::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData { parent: None, kind });
        id
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut node: NodeId) -> DomResult<bool> {
        loop {
            if node == candidate {
                return Ok(true);
            }
            match self.node(node)?.parent {
                Some(parent) => node = parent,
                None => return Ok(false),
            }
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.element(parent)?;
        if self.node(child)?.parent.is_some() || self.root == Some(child) {
            return Err(DomError::AlreadyAttached(child));
        }
        if self.is_ancestor_or_self(child, parent)? {
            return Err(DomError::Cycle { parent, child });
        }
        self.element_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn text_into(&self, id: NodeId, out: &mut String) -> DomResult<()> {
        match &self.node(id)?.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(el) => {
                for child in &el.children {
                    self.text_into(*child, out)?;
                }
            }
        }
        Ok(())
    }
}

/// Shared handle to an element tree
///
/// Cloning the handle shares the tree. The internal lock only protects the
/// arena itself; logical read/write exclusion across several operations is
/// the job of the session layer above.
#[derive(Clone, Default)]
pub struct Document {
    pub(crate) tree: Arc<RwLock<Tree>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree.read();
        f.debug_struct("Document")
            .field("nodes", &tree.nodes.len())
            .field("root", &tree.root)
            .finish()
    }
}

impl Document {
    /// Create empty document with no root
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create document with a root element
    #[must_use]
    pub fn with_root(name: &str, namespace: Option<&str>) -> Self {
        let doc = Self::new();
        {
            let mut tree = doc.tree.write();
            let root = tree.push(NodeKind::Element(ElementData {
                name: QName::new(name, namespace),
                attributes: Vec::new(),
                children: Vec::new(),
            }));
            tree.root = Some(root);
        }
        doc
    }

    /// Document element, if any
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.tree.read().root
    }

    /// Make a detached element the document element
    ///
    /// # Errors
    /// Fails if the node is not an element or already has a parent
    pub fn set_root(&self, node: NodeId) -> DomResult<()> {
        let mut tree = self.tree.write();
        tree.element(node)?;
        if tree.node(node)?.parent.is_some() {
            return Err(DomError::AlreadyAttached(node));
        }
        tree.root = Some(node);
        Ok(())
    }

    /// Whether two handles share the same tree
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree)
    }

    /// Number of nodes in the arena, detached ones included
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.read().nodes.len()
    }

    /// Create a detached element
    #[must_use]
    pub fn create_element(&self, name: &str, namespace: Option<&str>) -> NodeId {
        self.tree.write().push(NodeKind::Element(ElementData {
            name: QName::new(name, namespace),
            attributes: Vec::new(),
            children: Vec::new(),
        }))
    }

    /// Append a detached node as last child of `parent`
    ///
    /// # Errors
    /// Fails if `parent` is not an element, `child` is attached, or the
    /// append would create a cycle
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.tree.write().attach(parent, child)
    }

    /// Create an element and append it under `parent` in one step
    ///
    /// # Errors
    /// Fails if `parent` is not an element
    pub fn append_element(
        &self,
        parent: NodeId,
        name: &str,
        namespace: Option<&str>,
    ) -> DomResult<NodeId> {
        let mut tree = self.tree.write();
        tree.element(parent)?;
        let child = tree.push(NodeKind::Element(ElementData {
            name: QName::new(name, namespace),
            attributes: Vec::new(),
            children: Vec::new(),
        }));
        tree.attach(parent, child)?;
        Ok(child)
    }

    /// Detach `child` from `parent`
    ///
    /// The detached node keeps its arena slot.
    ///
    /// # Errors
    /// Fails if `child` is not a child of `parent`
    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let mut tree = self.tree.write();
        let children = &mut tree.element_mut(parent)?.children;
        let Some(pos) = children.iter().position(|c| *c == child) else {
            return Err(DomError::NotAChild { parent, child });
        };
        children.remove(pos);
        tree.node_mut(child)?.parent = None;
        Ok(())
    }

    /// Detach a node from whatever parent it has
    ///
    /// Returns `false` if the node was already detached. As with
    /// [`remove_child`](Self::remove_child), the arena slot is not reclaimed.
    ///
    /// # Errors
    /// Fails for unknown nodes
    pub fn detach(&self, node: NodeId) -> DomResult<bool> {
        let parent = self.parent(node)?;
        match parent {
            Some(parent) => self.remove_child(parent, node).map(|()| true),
            None => Ok(false),
        }
    }

    /// Parent of a node
    ///
    /// # Errors
    /// Fails for unknown nodes
    pub fn parent(&self, node: NodeId) -> DomResult<Option<NodeId>> {
        Ok(self.tree.read().node(node)?.parent)
    }

    /// Name of an element
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn name(&self, node: NodeId) -> DomResult<QName> {
        Ok(self.tree.read().element(node)?.name.clone())
    }

    /// Element children in document order
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn child_elements(&self, node: NodeId) -> DomResult<Vec<NodeId>> {
        let tree = self.tree.read();
        let el = tree.element(node)?;
        Ok(el
            .children
            .iter()
            .copied()
            .filter(|c| matches!(tree.nodes[c.0].kind, NodeKind::Element(_)))
            .collect())
    }

    /// Element children with the given local name and namespace
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn children_named(
        &self,
        node: NodeId,
        local: &str,
        namespace: Option<&str>,
    ) -> DomResult<Vec<NodeId>> {
        let tree = self.tree.read();
        let el = tree.element(node)?;
        Ok(el
            .children
            .iter()
            .copied()
            .filter(|c| match &tree.nodes[c.0].kind {
                NodeKind::Element(child) => child.name.matches(local, namespace),
                NodeKind::Text(_) => false,
            })
            .collect())
    }

    /// First element child with the given local name and namespace
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn find_child(
        &self,
        node: NodeId,
        local: &str,
        namespace: Option<&str>,
    ) -> DomResult<Option<NodeId>> {
        let tree = self.tree.read();
        let el = tree.element(node)?;
        Ok(el.children.iter().copied().find(|c| match &tree.nodes[c.0].kind {
            NodeKind::Element(child) => child.name.matches(local, namespace),
            NodeKind::Text(_) => false,
        }))
    }

    /// Attribute value as text
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn attribute(&self, node: NodeId, name: &str) -> DomResult<Option<String>> {
        let tree = self.tree.read();
        Ok(tree
            .element(node)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone()))
    }

    /// Set or create an attribute
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let mut tree = self.tree.write();
        let attrs = &mut tree.element_mut(node)?.attributes;
        match attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => attrs.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Remove an attribute, returning whether it existed
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn remove_attribute(&self, node: NodeId, name: &str) -> DomResult<bool> {
        let mut tree = self.tree.write();
        let attrs = &mut tree.element_mut(node)?.attributes;
        let before = attrs.len();
        attrs.retain(|(n, _)| n != name);
        Ok(attrs.len() != before)
    }

    /// Concatenated text content of a node and its descendants
    ///
    /// # Errors
    /// Fails for unknown nodes
    pub fn text(&self, node: NodeId) -> DomResult<String> {
        let tree = self.tree.read();
        let mut out = String::new();
        tree.text_into(node, &mut out)?;
        Ok(out)
    }

    /// Replace all children of an element with a single text node
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn set_text(&self, node: NodeId, text: &str) -> DomResult<()> {
        let mut tree = self.tree.write();
        let old = std::mem::take(&mut tree.element_mut(node)?.children);
        for child in old {
            tree.node_mut(child)?.parent = None;
        }
        if !text.is_empty() {
            let text_node = tree.push(NodeKind::Text(text.to_string()));
            tree.attach(node, text_node)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_root_creates_document_element() {
        let doc = Document::with_root("Single", None);
        let root = doc.root().unwrap();
        assert_eq!(doc.name(root).unwrap().local(), "Single");
        assert_eq!(doc.parent(root).unwrap(), None);
    }

    #[test]
    fn append_and_find_child() {
        let doc = Document::with_root("Single", None);
        let root = doc.root().unwrap();
        let child = doc.append_element(root, "Child", None).unwrap();

        assert_eq!(doc.find_child(root, "Child", None).unwrap(), Some(child));
        assert_eq!(doc.find_child(root, "Child", Some("urn:x")).unwrap(), None);
        assert_eq!(doc.parent(child).unwrap(), Some(root));
    }

    #[test]
    fn append_attached_node_rejected() {
        let doc = Document::with_root("Single", None);
        let root = doc.root().unwrap();
        let child = doc.append_element(root, "Child", None).unwrap();
        let other = doc.append_element(root, "Other", None).unwrap();

        assert_eq!(doc.append_child(other, child), Err(DomError::AlreadyAttached(child)));
    }

    #[test]
    fn append_ancestor_rejected() {
        let doc = Document::new();
        let a = doc.create_element("A", None);
        let b = doc.create_element("B", None);
        doc.append_child(a, b).unwrap();

        assert!(matches!(doc.append_child(b, a), Err(DomError::Cycle { .. })));
    }

    #[test]
    fn remove_child_detaches() {
        let doc = Document::with_root("Single", None);
        let root = doc.root().unwrap();
        let child = doc.append_element(root, "Child", None).unwrap();

        doc.remove_child(root, child).unwrap();
        assert!(doc.child_elements(root).unwrap().is_empty());
        assert_eq!(doc.parent(child).unwrap(), None);
        assert!(matches!(
            doc.remove_child(root, child),
            Err(DomError::NotAChild { .. })
        ));
    }

    #[test]
    fn detach_reports_previous_attachment() {
        let doc = Document::with_root("Single", None);
        let root = doc.root().unwrap();
        let child = doc.append_element(root, "Child", None).unwrap();

        assert!(doc.detach(child).unwrap());
        assert!(!doc.detach(child).unwrap());
    }

    #[test]
    fn detached_node_stays_addressable() {
        let doc = Document::with_root("Single", None);
        let root = doc.root().unwrap();
        let child = doc.append_element(root, "Child", None).unwrap();
        doc.set_attribute(child, "key", "kept").unwrap();
        assert_eq!(doc.node_count(), 2);

        doc.remove_child(root, child).unwrap();
        assert_eq!(doc.node_count(), 2);
        assert_eq!(doc.name(child).unwrap().local(), "Child");
        assert_eq!(doc.attribute(child, "key").unwrap().as_deref(), Some("kept"));
        assert_eq!(doc.to_xml(), "<Single/>");
    }

    #[test]
    fn attributes_round_trip() {
        let doc = Document::with_root("Single", None);
        let root = doc.root().unwrap();

        assert_eq!(doc.attribute(root, "Key").unwrap(), None);
        doc.set_attribute(root, "Key", "a").unwrap();
        doc.set_attribute(root, "Key", "b").unwrap();
        assert_eq!(doc.attribute(root, "Key").unwrap().as_deref(), Some("b"));

        assert!(doc.remove_attribute(root, "Key").unwrap());
        assert!(!doc.remove_attribute(root, "Key").unwrap());
    }

    #[test]
    fn set_text_replaces_children() {
        let doc = Document::with_root("Single", None);
        let root = doc.root().unwrap();
        let content = doc.append_element(root, "Content", None).unwrap();

        doc.set_text(content, "Blah").unwrap();
        assert_eq!(doc.text(content).unwrap(), "Blah");
        doc.set_text(content, "hello").unwrap();
        assert_eq!(doc.text(root).unwrap(), "hello");
    }

    #[test]
    fn children_named_filters_by_namespace() {
        let doc = Document::with_root("Single", None);
        let root = doc.root().unwrap();
        let a = doc.append_element(root, "Child", None).unwrap();
        doc.append_element(root, "Child", Some("urn:other")).unwrap();
        let b = doc.append_element(root, "Child", None).unwrap();

        assert_eq!(doc.children_named(root, "Child", None).unwrap(), vec![a, b]);
    }

    #[test]
    fn text_node_is_not_an_element() {
        let doc = Document::with_root("Single", None);
        let root = doc.root().unwrap();
        doc.set_text(root, "x").unwrap();
        let text = doc.tree.read().element(root).unwrap().children[0];

        assert_eq!(doc.set_attribute(text, "a", "b"), Err(DomError::NotAnElement(text)));
    }
}
