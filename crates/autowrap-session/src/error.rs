//! Session errors

/// Locking failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Write session requested while the same thread holds only a read session
    #[error("write session requested inside a read session: possible deadlock")]
    PossibleDeadlock,
}
