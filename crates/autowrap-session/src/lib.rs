//! AutoWrapper Sessions
//!
//! Reentrant read/write sessions over one document tree.
//!
//! # Core Concepts
//!
//! - [`LockHelper`]: Per-document lock tracking which thread reads or writes
//! - [`ReadSession`] / [`WriteSession`]: Scoped acquisitions released on drop,
//!   on every exit path
//! - [`LockScope`]: What the calling thread currently holds
//! - [`WriteCompleted`]: Signal published once per outermost write session
//!
//! Upgrading a read session to a write session is refused with
//! [`SessionError::PossibleDeadlock`]: two readers upgrading at once would
//! wait on each other forever.
//!
//! # Example
//!
//! ```rust
//! use autowrap_session::{LockHelper, LockScope};
//!
//! let helper = LockHelper::new();
//! let completed = helper.subscribe();
//!
//! {
//!     let _outer = helper.open_write_session().unwrap();
//!     let _inner = helper.open_write_session().unwrap();
//!     assert_eq!(helper.current_scope(), LockScope::WriteHeld);
//! }
//!
//! assert_eq!(completed.try_iter().count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod lock;
mod signal;

// Re-exports
pub use error::SessionError;
pub use lock::{LockHelper, LockScope, ReadSession, WriteSession};
pub use signal::WriteCompleted;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
