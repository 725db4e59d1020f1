//! Type aliases for shared state.
//!
//! Surfaces are mutated by input handling and read by the render loop, which
//! may run on another thread, so the session lives behind a mutex.

use parking_lot::Mutex;
use std::sync::Arc;

/// A thread-safe, reference-counted mutex wrapper for cross-thread sharing.
///
/// # Example
/// ```rust,ignore
/// let session: ThreadSafe<Session> = thread_safe(Session::new(options)?);
/// session.lock().undo();
/// ```
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// Wraps a value in `Arc<Mutex<_>>`.
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}
