//! Document plus its session lock

use crate::error::WrapperResult;
use autowrap_dom::{Document, NodeId};
use autowrap_session::{LockHelper, LockScope, ReadSession, WriteCompleted, WriteSession};
use crossbeam::channel::Receiver;
use std::sync::Arc;

/// A DOM tree shared by wrappers, guarded by one [`LockHelper`]
///
/// Clones share the tree and the lock.
#[derive(Debug, Clone)]
pub struct SharedDocument {
    dom: Document,
    lock: Arc<LockHelper>,
}

impl SharedDocument {
    /// Document with a single root element
    #[must_use]
    pub fn new(root: &str, namespace: Option<&str>) -> Self {
        Self::from_document(Document::with_root(root, namespace))
    }

    /// Guard an existing tree
    #[must_use]
    pub fn from_document(dom: Document) -> Self {
        Self {
            dom,
            lock: Arc::new(LockHelper::new()),
        }
    }

    /// Underlying tree
    #[inline]
    #[must_use]
    pub fn dom(&self) -> &Document {
        &self.dom
    }

    /// Session lock of this tree
    #[inline]
    #[must_use]
    pub fn lock(&self) -> &LockHelper {
        &self.lock
    }

    /// Open a read session
    #[inline]
    pub fn read(&self) -> ReadSession<'_> {
        self.lock.open_read_session()
    }

    /// Open a write session
    ///
    /// # Errors
    /// Fails with a possible-deadlock error inside a read-only session
    #[inline]
    pub fn write(&self) -> WrapperResult<WriteSession<'_>> {
        Ok(self.lock.open_write_session()?)
    }

    /// Lock held by the calling thread
    #[inline]
    #[must_use]
    pub fn scope(&self) -> LockScope {
        self.lock.current_scope()
    }

    /// Receive a signal after every completed outermost write session
    #[must_use]
    pub fn subscribe(&self) -> Receiver<WriteCompleted> {
        self.lock.subscribe()
    }

    /// Root element
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.dom.root()
    }

    /// Serialize the tree under a read session
    #[must_use]
    pub fn to_xml(&self) -> String {
        let _read = self.read();
        self.dom.to_xml()
    }
}

impl From<Document> for SharedDocument {
    fn from(dom: Document) -> Self {
        Self::from_document(dom)
    }
}
