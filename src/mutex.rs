/*!
 * Mutex
 * Owning wrapper over the native mutual-exclusion lock
 */

use crate::attrs::MutexAttributes;
use crate::error::{check, check_busy, SyncResult};
use std::cell::UnsafeCell;
use std::mem;
use std::ptr;
use tracing::error;

/// Owning wrapper over `pthread_mutex_t`.
///
/// The native handle is initialized at construction and destroyed on drop.
/// It lives behind a heap allocation so the wrapper itself can move while
/// the primitive keeps a stable address for its whole lifetime.
///
/// Handles are never duplicated: the type is neither `Clone` nor `Copy`.
pub struct Mutex {
    inner: Box<UnsafeCell<libc::pthread_mutex_t>>,
}

// SAFETY: the native mutex exists to be acquired and released from multiple
// threads; all state transitions go through OS calls on a stable heap address.
unsafe impl Send for Mutex {}
unsafe impl Sync for Mutex {}

impl Mutex {
    /// Create a mutex with default OS attributes
    pub fn new() -> SyncResult<Self> {
        Self::init(ptr::null())
    }

    /// Create a mutex from a caller-prepared attribute object
    pub fn with_attributes(attrs: &MutexAttributes) -> SyncResult<Self> {
        Self::init(attrs.as_ptr())
    }

    fn init(attrs: *const libc::pthread_mutexattr_t) -> SyncResult<Self> {
        let inner: Box<UnsafeCell<libc::pthread_mutex_t>> =
            Box::new(UnsafeCell::new(unsafe { mem::zeroed() }));
        check("pthread_mutex_init", unsafe {
            libc::pthread_mutex_init(inner.get(), attrs)
        })?;
        Ok(Self { inner })
    }

    /// Block until the mutex is acquired
    #[inline]
    pub fn lock(&self) -> SyncResult<()> {
        check("pthread_mutex_lock", unsafe {
            libc::pthread_mutex_lock(self.inner.get())
        })
    }

    /// Attempt a non-blocking acquire. `Ok(false)` means the mutex was
    /// already held; this never blocks.
    #[inline]
    pub fn try_lock(&self) -> SyncResult<bool> {
        check_busy("pthread_mutex_trylock", unsafe {
            libc::pthread_mutex_trylock(self.inner.get())
        })
    }

    /// Release the mutex.
    ///
    /// # Safety
    ///
    /// The calling thread must currently hold the mutex. Releasing an
    /// unheld default-kind mutex is undefined behavior at the OS level;
    /// build with [`MutexKind::ErrorCheck`](crate::MutexKind::ErrorCheck)
    /// to turn that misuse into a reported error.
    #[inline]
    pub unsafe fn unlock(&self) -> SyncResult<()> {
        check("pthread_mutex_unlock", unsafe {
            libc::pthread_mutex_unlock(self.inner.get())
        })
    }

    /// Raw handle, for pairing with a condition variable or direct OS calls
    #[must_use]
    pub fn native_handle(&self) -> *mut libc::pthread_mutex_t {
        self.inner.get()
    }
}

impl Drop for Mutex {
    fn drop(&mut self) {
        // Destroying a held mutex is a caller contract violation; Drop
        // cannot surface a Result, only report.
        let ret = unsafe { libc::pthread_mutex_destroy(self.inner.get()) };
        if ret != 0 {
            error!(errno = ret, "pthread_mutex_destroy failed");
        }
    }
}
