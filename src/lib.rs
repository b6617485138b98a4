/*!
 * posix-sync
 * Scope-bound ownership of native POSIX threading primitives
 *
 * Each wrapper owns exactly one native handle: construction initializes it
 * (optionally from a typed attribute object) and drop destroys it. This is
 * the middle ground between raw libc calls and a fully abstracted
 * concurrency library: the OS object's full configurability stays exposed,
 * while its lifetime is bound to a Rust value.
 *
 * # Components
 *
 * - [`ManagedThread`]: starts OS execution at construction, joins on drop
 * - [`Mutex`] / [`RwLock`] / [`Spinlock`]: blocking and non-blocking acquire
 * - [`Condvar`]: wait and timed wait against a caller-supplied [`Mutex`]
 *
 * # Error Contract
 *
 * Busy and timed-out are ordinary return values (`Ok(false)` from the
 * non-blocking acquires, [`WaitStatus::TimedOut`] from timed waits). Every
 * other non-zero OS result surfaces as a [`SyncError`] in all build
 * configurations. Operations whose misuse the OS leaves undefined (release
 * without holding, waiting on an unheld mutex) are `unsafe fn`s with their
 * contract documented.
 */

#[cfg(not(unix))]
compile_error!("posix-sync wraps POSIX threading primitives and requires a unix target");

pub mod attrs;
pub mod clock;
pub mod condvar;
pub mod error;
pub mod mutex;
pub mod rwlock;
#[cfg(target_os = "linux")]
pub mod spinlock;
mod sys;
pub mod thread;
pub mod tracer;

// Re-exports
pub use attrs::{
    CondvarAttributes, DetachState, MutexAttributes, MutexKind, RwLockAttributes, ShareScope,
    ThreadAttributes,
};
#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub use attrs::MutexProtocol;
pub use clock::ClockSource;
pub use condvar::{Condvar, WaitStatus};
pub use error::{SyncError, SyncResult};
pub use mutex::Mutex;
pub use rwlock::RwLock;
#[cfg(target_os = "linux")]
pub use spinlock::Spinlock;
pub use thread::ManagedThread;
pub use tracer::init_tracing;
