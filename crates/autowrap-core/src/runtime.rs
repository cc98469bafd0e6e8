//! DOM primitives shared by every generated wrapper
//!
//! Elements are located by local name plus namespace; an unqualified node
//! matches an absent expected namespace. Sessions are the caller's job.

use crate::error::WrapperResult;
use autowrap_dom::{Document, NodeId};
use autowrap_schema::{ScalarType, Value, WireName};
use autowrap_strategy::Conversion;

/// Primitive reads and writes relative to one element
#[derive(Debug, Clone, Copy)]
pub struct NodeAccess<'a> {
    doc: &'a Document,
    node: NodeId,
}

impl<'a> NodeAccess<'a> {
    /// Access relative to `node`
    #[inline]
    #[must_use]
    pub fn new(doc: &'a Document, node: NodeId) -> Self {
        Self { doc, node }
    }

    /// Element this access is relative to
    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Attribute value, or `default` when the attribute is missing
    ///
    /// # Errors
    /// Fails when the attribute text does not convert
    pub fn get_attribute_or_default(
        &self,
        name: &str,
        conversion: &Conversion,
        default: Option<&Value>,
    ) -> WrapperResult<Option<Value>> {
        match self.doc.attribute(self.node, name)? {
            Some(raw) => Ok(Some(conversion.decode(&raw)?)),
            None => Ok(default.cloned()),
        }
    }

    /// Write an attribute, creating it when missing
    ///
    /// # Errors
    /// Fails when the value does not convert
    pub fn set_attribute(
        &self,
        name: &str,
        conversion: &Conversion,
        value: &Value,
    ) -> WrapperResult<()> {
        let text = conversion.encode(value)?;
        self.doc.set_attribute(self.node, name, &text)?;
        Ok(())
    }

    /// Remove an attribute; returns whether it existed
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn clear_attribute(&self, name: &str) -> WrapperResult<bool> {
        Ok(self.doc.remove_attribute(self.node, name)?)
    }

    /// Text of a child element, or `default` when the element is missing
    ///
    /// An empty element counts as missing unless the field is textual.
    ///
    /// # Errors
    /// Fails when the element text does not convert
    pub fn get_element_or_default(
        &self,
        name: &WireName,
        conversion: &Conversion,
        default: Option<&Value>,
    ) -> WrapperResult<Option<Value>> {
        let Some(element) = self.find_element(name, false)? else {
            return Ok(default.cloned());
        };
        let raw = self.doc.text(element)?;
        if raw.is_empty() && conversion.value_type() != ScalarType::String {
            return Ok(default.cloned());
        }
        Ok(Some(conversion.decode(&raw)?))
    }

    /// Write the text of a child element, creating it when missing
    ///
    /// # Errors
    /// Fails when the value does not convert
    pub fn set_element(
        &self,
        name: &WireName,
        conversion: &Conversion,
        value: &Value,
    ) -> WrapperResult<()> {
        let text = conversion.encode(value)?;
        let element = self.init_element(name)?;
        self.doc.set_text(element, &text)?;
        Ok(())
    }

    /// First child element named `name`
    ///
    /// With `can_create` the element is appended when missing, so the
    /// result is always `Some`.
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn find_element(&self, name: &WireName, can_create: bool) -> WrapperResult<Option<NodeId>> {
        if can_create {
            return self.init_element(name).map(Some);
        }
        Ok(self.doc.find_child(self.node, &name.local, name.ns())?)
    }

    /// Ensure a child element exists and return it
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn init_element(&self, name: &WireName) -> WrapperResult<NodeId> {
        if let Some(found) = self.doc.find_child(self.node, &name.local, name.ns())? {
            return Ok(found);
        }
        tracing::trace!("Creating element {} under {}", name, self.node);
        Ok(self.doc.append_element(self.node, &name.local, name.ns())?)
    }

    /// Append a new item element, inside `container` when given
    ///
    /// The container is created on demand.
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn add_element(&self, container: Option<&WireName>, name: &WireName) -> WrapperResult<NodeId> {
        let parent = match container {
            Some(container) => self.init_element(container)?,
            None => self.node,
        };
        Ok(self.doc.append_element(parent, &name.local, name.ns())?)
    }

    /// All item elements in document order
    ///
    /// Empty when the container is missing.
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn get_all_elements(
        &self,
        container: Option<&WireName>,
        name: &WireName,
    ) -> WrapperResult<Vec<NodeId>> {
        let parent = match container {
            Some(container) => match self.find_element(container, false)? {
                Some(found) => found,
                None => return Ok(Vec::new()),
            },
            None => self.node,
        };
        Ok(self.doc.children_named(parent, &name.local, name.ns())?)
    }

    /// Remove the first child element named `name`; returns whether one existed
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn clear_element(&self, name: &WireName) -> WrapperResult<bool> {
        match self.find_element(name, false)? {
            Some(element) => {
                self.doc.remove_child(self.node, element)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every item element of a self-delimited sequence; returns the count
    ///
    /// # Errors
    /// Fails if the node is not an element
    pub fn clear_all_elements(&self, name: &WireName) -> WrapperResult<usize> {
        let items = self.doc.children_named(self.node, &name.local, name.ns())?;
        for item in &items {
            self.doc.remove_child(self.node, *item)?;
        }
        Ok(items.len())
    }

    /// Detach an item from wherever it lives
    ///
    /// # Errors
    /// Fails for unknown nodes
    pub fn remove_node(&self, node: NodeId) -> WrapperResult<bool> {
        Ok(self.doc.detach(node)?)
    }
}
