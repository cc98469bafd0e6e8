//! Reentrant reader/writer lock with per-thread scopes

use crate::error::SessionError;
use crate::signal::{Subscribers, WriteCompleted};
use crossbeam::channel::Receiver;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::thread::{self, ThreadId};

/// Lock held by the calling thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockScope {
    /// Nothing held
    Unlocked,
    /// Read session held
    ReadHeld,
    /// Write session held
    WriteHeld,
}

#[derive(Debug, Default)]
struct LockState {
    writer: Option<ThreadId>,
    readers: HashMap<ThreadId, usize>,
    completed: u64,
}

/// Guards one document tree against conflicting access
///
/// - A read session blocks while another thread writes; nested reads and
///   reads inside the thread's own write session never block.
/// - A write session blocks while any other thread reads or writes. A write
///   nested in the thread's own write session is a no-op.
/// - A write requested while the thread only reads fails with
///   [`SessionError::PossibleDeadlock`] instead of upgrading.
///
/// Releasing the outermost write session publishes one [`WriteCompleted`].
#[derive(Default)]
pub struct LockHelper {
    state: Mutex<LockState>,
    changed: Condvar,
    subscribers: Subscribers,
}

impl fmt::Debug for LockHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("LockHelper")
            .field("writer", &state.writer)
            .field("readers", &state.readers.len())
            .field("completed", &state.completed)
            .finish_non_exhaustive()
    }
}

impl LockHelper {
    /// Create unlocked helper
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a read session, blocking while another thread writes
    pub fn open_read_session(&self) -> ReadSession<'_> {
        let me = thread::current().id();
        let mut state = self.state.lock();

        if state.writer == Some(me) {
            tracing::trace!("Read session inside write session: no-op");
            return ReadSession::noop();
        }
        if let Some(depth) = state.readers.get_mut(&me) {
            *depth += 1;
            return ReadSession::held(self);
        }
        while state.writer.is_some() {
            self.changed.wait(&mut state);
        }
        state.readers.insert(me, 1);
        tracing::trace!("Read session opened");
        ReadSession::held(self)
    }

    /// Open a write session, blocking while any other thread holds the lock
    ///
    /// # Errors
    /// Returns [`SessionError::PossibleDeadlock`] if the calling thread
    /// holds only a read session
    pub fn open_write_session(&self) -> Result<WriteSession<'_>, SessionError> {
        let me = thread::current().id();
        let mut state = self.state.lock();

        if state.writer == Some(me) {
            tracing::trace!("Nested write session: no-op");
            return Ok(WriteSession::noop());
        }
        if state.readers.contains_key(&me) {
            tracing::warn!("Refused write session inside read session on {:?}", me);
            return Err(SessionError::PossibleDeadlock);
        }
        while state.writer.is_some() || !state.readers.is_empty() {
            self.changed.wait(&mut state);
        }
        state.writer = Some(me);
        tracing::trace!("Write session opened");
        Ok(WriteSession::held(self))
    }

    /// Lock held by the calling thread
    #[must_use]
    pub fn current_scope(&self) -> LockScope {
        let me = thread::current().id();
        let state = self.state.lock();
        if state.writer == Some(me) {
            LockScope::WriteHeld
        } else if state.readers.contains_key(&me) {
            LockScope::ReadHeld
        } else {
            LockScope::Unlocked
        }
    }

    /// Number of completed outermost write sessions
    #[must_use]
    pub fn completed_writes(&self) -> u64 {
        self.state.lock().completed
    }

    /// Receive one [`WriteCompleted`] per completed outermost write session
    #[must_use]
    pub fn subscribe(&self) -> Receiver<WriteCompleted> {
        self.subscribers.subscribe()
    }

    fn release_read(&self) {
        let me = thread::current().id();
        let mut state = self.state.lock();
        let last = match state.readers.get_mut(&me) {
            Some(depth) => {
                *depth -= 1;
                *depth == 0
            }
            None => false,
        };
        if last {
            state.readers.remove(&me);
            tracing::trace!("Read session released");
            self.changed.notify_all();
        }
    }

    fn release_write(&self) {
        let sequence = {
            let mut state = self.state.lock();
            state.writer = None;
            state.completed += 1;
            state.completed
        };
        self.changed.notify_all();
        tracing::trace!("Write session {} released", sequence);
        self.subscribers.publish(WriteCompleted { sequence });
    }
}

/// Scoped read access; released on drop
///
/// Sessions are tied to the thread that opened them.
#[must_use = "the session is released when dropped"]
pub struct ReadSession<'a> {
    helper: Option<&'a LockHelper>,
    _thread_bound: PhantomData<*const ()>,
}

impl<'a> ReadSession<'a> {
    fn held(helper: &'a LockHelper) -> Self {
        Self {
            helper: Some(helper),
            _thread_bound: PhantomData,
        }
    }

    fn noop() -> Self {
        Self {
            helper: None,
            _thread_bound: PhantomData,
        }
    }

    /// Whether this session is covered by an enclosing write session
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.helper.is_none()
    }
}

impl Drop for ReadSession<'_> {
    fn drop(&mut self) {
        if let Some(helper) = self.helper {
            helper.release_read();
        }
    }
}

impl fmt::Debug for ReadSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadSession")
            .field("noop", &self.is_noop())
            .finish()
    }
}

/// Scoped write access; released on drop
///
/// Sessions are tied to the thread that opened them.
#[must_use = "the session is released when dropped"]
pub struct WriteSession<'a> {
    helper: Option<&'a LockHelper>,
    _thread_bound: PhantomData<*const ()>,
}

impl<'a> WriteSession<'a> {
    fn held(helper: &'a LockHelper) -> Self {
        Self {
            helper: Some(helper),
            _thread_bound: PhantomData,
        }
    }

    fn noop() -> Self {
        Self {
            helper: None,
            _thread_bound: PhantomData,
        }
    }

    /// Whether this session is nested in an enclosing write session
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.helper.is_none()
    }
}

impl Drop for WriteSession<'_> {
    fn drop(&mut self) {
        if let Some(helper) = self.helper {
            helper.release_write();
        }
    }
}

impl fmt::Debug for WriteSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteSession")
            .field("noop", &self.is_noop())
            .finish()
    }
}
