//! Per-field cache slots

use crate::sequence::SequenceValue;
use crate::wrapper::Wrapper;
use autowrap_schema::Value;
use parking_lot::Mutex;

/// Materialized value of one field
///
/// `Scalar(None)` and `Child(None)` record a read that found nothing, which
/// is distinct from an empty slot.
#[derive(Debug, Clone)]
pub(crate) enum CachedValue {
    Scalar(Option<Value>),
    Child(Option<Wrapper>),
    Sequence(SequenceValue),
}

/// One lazily filled slot
///
/// The mutex lets concurrent readers fill the slot under a shared read
/// session.
#[derive(Debug, Default)]
pub(crate) struct FieldCache {
    slot: Mutex<Option<CachedValue>>,
}

impl FieldCache {
    pub(crate) fn get(&self) -> Option<CachedValue> {
        self.slot.lock().clone()
    }

    pub(crate) fn is_filled(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Fill an empty slot; a value stored first by another reader wins
    pub(crate) fn get_or_insert(&self, value: CachedValue) -> CachedValue {
        self.slot.lock().get_or_insert(value).clone()
    }

    pub(crate) fn store(&self, value: CachedValue) {
        *self.slot.lock() = Some(value);
    }

    pub(crate) fn invalidate(&self) {
        *self.slot.lock() = None;
    }

    /// Materialized sequence, if any
    pub(crate) fn sequence(&self) -> Option<SequenceValue> {
        match &*self.slot.lock() {
            Some(CachedValue::Sequence(seq)) => Some(seq.clone()),
            _ => None,
        }
    }
}
