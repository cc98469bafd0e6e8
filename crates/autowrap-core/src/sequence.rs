//! Materialized sequence collections
//!
//! Arrays are immutable snapshots. Lists, dictionaries and grouped
//! dictionaries are shared views: every holder of the view sees items added,
//! removed or re-keyed through the owning wrapper.
//!
//! Writers open the document's write session first and lock a view second.
//! A thread holding a view guard must therefore not call wrapper methods on
//! the same document until the guard is dropped: a writer on another thread
//! can hold the session while waiting for the view, and the guard holder
//! would then wait for the session. Iterate a copy from
//! [`SequenceValue::items`] or [`Wrapper::items`] when entries are read or
//! written while walking the collection.

use crate::wrapper::Wrapper;
use autowrap_dom::NodeId;
use autowrap_strategy::SequenceShape;
use indexmap::map::Entry;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared list view
pub type SharedList = Arc<RwLock<Vec<Wrapper>>>;

/// Shared dictionary view, in document order of first occurrence
pub type SharedDict = Arc<RwLock<IndexMap<String, Wrapper>>>;

/// Shared dictionary-of-lists view
pub type SharedGroups = Arc<RwLock<IndexMap<String, Vec<Wrapper>>>>;

/// A materialized sequence field
///
/// Writers take the document's write session before a view's lock, so do
/// not call wrapper methods on the same document while holding a view
/// guard. Use [`items`](Self::items) for a lock-free copy.
#[derive(Debug, Clone)]
pub enum SequenceValue {
    /// Snapshot; re-fetch after adding
    Array(Arc<[Wrapper]>),
    /// Updated in place
    List(SharedList),
    /// Updated in place; first entry wins on duplicate keys
    Dict(SharedDict),
    /// Updated in place; entries grouped by key
    DictOfLists(SharedGroups),
}

impl SequenceValue {
    /// Build a collection of `shape` from `(key, item)` pairs
    ///
    /// Keys are ignored by unkeyed shapes.
    #[must_use]
    pub fn build(shape: SequenceShape, items: Vec<(String, Wrapper)>) -> Self {
        match shape {
            SequenceShape::Array => {
                Self::Array(items.into_iter().map(|(_, item)| item).collect())
            }
            SequenceShape::List => Self::List(Arc::new(RwLock::new(
                items.into_iter().map(|(_, item)| item).collect(),
            ))),
            SequenceShape::Dict => {
                let mut map = IndexMap::with_capacity(items.len());
                for (key, item) in items {
                    insert_first_wins(&mut map, key, item);
                }
                Self::Dict(Arc::new(RwLock::new(map)))
            }
            SequenceShape::DictOfLists => {
                let mut groups: IndexMap<String, Vec<Wrapper>> = IndexMap::new();
                for (key, item) in items {
                    groups.entry(key).or_default().push(item);
                }
                Self::DictOfLists(Arc::new(RwLock::new(groups)))
            }
        }
    }

    /// Collection shape
    #[must_use]
    pub fn shape(&self) -> SequenceShape {
        match self {
            Self::Array(_) => SequenceShape::Array,
            Self::List(_) => SequenceShape::List,
            Self::Dict(_) => SequenceShape::Dict,
            Self::DictOfLists(_) => SequenceShape::DictOfLists,
        }
    }

    /// Number of items; grouped dictionaries count every grouped item
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::List(list) => list.read().len(),
            Self::Dict(map) => map.read().len(),
            Self::DictOfLists(groups) => groups.read().values().map(Vec::len).sum(),
        }
    }

    /// Whether the collection holds no items
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current items, flattened
    #[must_use]
    pub fn items(&self) -> Vec<Wrapper> {
        match self {
            Self::Array(items) => items.to_vec(),
            Self::List(list) => list.read().clone(),
            Self::Dict(map) => map.read().values().cloned().collect(),
            Self::DictOfLists(groups) => groups.read().values().flatten().cloned().collect(),
        }
    }

    /// Add an item in place; arrays are left untouched
    pub(crate) fn insert(&self, key: String, item: Wrapper) {
        match self {
            Self::Array(_) => {}
            Self::List(list) => list.write().push(item),
            Self::Dict(map) => insert_first_wins(&mut map.write(), key, item),
            Self::DictOfLists(groups) => groups.write().entry(key).or_default().push(item),
        }
    }

    /// Drop the item backed by `node`; returns whether it was present
    pub(crate) fn remove_node(&self, node: NodeId) -> bool {
        match self {
            Self::Array(_) => false,
            Self::List(list) => {
                let mut list = list.write();
                let before = list.len();
                list.retain(|item| item.node() != node);
                list.len() != before
            }
            Self::Dict(map) => {
                let mut map = map.write();
                let before = map.len();
                map.retain(|_, item| item.node() != node);
                map.len() != before
            }
            Self::DictOfLists(groups) => {
                let mut groups = groups.write();
                let mut removed = false;
                for items in groups.values_mut() {
                    let before = items.len();
                    items.retain(|item| item.node() != node);
                    removed |= items.len() != before;
                }
                groups.retain(|_, items| !items.is_empty());
                removed
            }
        }
    }

    /// Empty the collection in place
    pub(crate) fn clear(&self) {
        match self {
            Self::Array(_) => {}
            Self::List(list) => list.write().clear(),
            Self::Dict(map) => map.write().clear(),
            Self::DictOfLists(groups) => groups.write().clear(),
        }
    }

    /// Move the entry backed by `node` under `new_key`
    pub(crate) fn rekey(&self, node: NodeId, new_key: String) {
        match self {
            Self::Array(_) | Self::List(_) => {}
            Self::Dict(map) => {
                let mut map = map.write();
                let Some(index) = map.values().position(|item| item.node() == node) else {
                    return;
                };
                if map.get_index(index).is_some_and(|(key, _)| *key == new_key) {
                    return;
                }
                if let Some((old, item)) = map.shift_remove_index(index) {
                    tracing::trace!("Re-keying {} to {}", old, new_key);
                    insert_first_wins(&mut map, new_key, item);
                }
            }
            Self::DictOfLists(groups) => {
                let mut groups = groups.write();
                let mut moved = None;
                for items in groups.values_mut() {
                    if let Some(pos) = items.iter().position(|item| item.node() == node) {
                        moved = Some(items.remove(pos));
                        break;
                    }
                }
                if let Some(item) = moved {
                    groups.retain(|_, items| !items.is_empty());
                    groups.entry(new_key).or_default().push(item);
                }
            }
        }
    }
}

fn insert_first_wins(map: &mut IndexMap<String, Wrapper>, key: String, item: Wrapper) {
    match map.entry(key) {
        Entry::Occupied(existing) => {
            tracing::warn!(
                "Duplicate dictionary key {:?}; keeping the first entry",
                existing.key()
            );
        }
        Entry::Vacant(slot) => {
            slot.insert(item);
        }
    }
}
