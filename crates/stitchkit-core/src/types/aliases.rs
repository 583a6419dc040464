//! Type aliases for the shared-ownership types used across the editor core.

use parking_lot::RwLock;
use std::sync::Arc;

/// A thread-safe reader-writer lock wrapper for read-heavy state.
///
/// The engine capability slot is read on every gesture callback and replaced
/// only when engines attach or detach.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// Creates a new `ThreadSafeRw<T>` from a value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}
