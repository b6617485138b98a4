/*!
 * Spinlock
 *
 * Owning wrapper over the native spinlock. Acquisition busy-waits in user
 * space instead of blocking in the scheduler, so holds must be short.
 */

use crate::attrs::ShareScope;
use crate::error::{check, check_busy, SyncResult};
use std::cell::UnsafeCell;
use tracing::error;

/// Owning wrapper over `pthread_spinlock_t`.
///
/// The sharing scope is required at construction: the OS primitive has no
/// safe universal default for whether the lock lives in process-private or
/// cross-process shared memory.
pub struct Spinlock {
    inner: Box<UnsafeCell<libc::pthread_spinlock_t>>,
    scope: ShareScope,
}

// SAFETY: the native spinlock is built for cross-thread acquire/release;
// all state transitions go through OS calls on a stable heap address.
unsafe impl Send for Spinlock {}
unsafe impl Sync for Spinlock {}

impl Spinlock {
    pub fn new(scope: ShareScope) -> SyncResult<Self> {
        let inner: Box<UnsafeCell<libc::pthread_spinlock_t>> = Box::new(UnsafeCell::new(0));
        check("pthread_spin_init", unsafe {
            libc::pthread_spin_init(inner.get(), scope.as_pshared())
        })?;
        Ok(Self { inner, scope })
    }

    /// Busy-wait until the lock is acquired, consuming CPU rather than
    /// yielding to the scheduler
    #[inline]
    pub fn lock(&self) -> SyncResult<()> {
        check("pthread_spin_lock", unsafe {
            libc::pthread_spin_lock(self.inner.get())
        })
    }

    /// Attempt a non-blocking acquire; `Ok(false)` means already held
    #[inline]
    pub fn try_lock(&self) -> SyncResult<bool> {
        check_busy("pthread_spin_trylock", unsafe {
            libc::pthread_spin_trylock(self.inner.get())
        })
    }

    /// Release the lock.
    ///
    /// # Safety
    ///
    /// The calling thread must currently hold the lock; releasing an unheld
    /// spinlock is undefined behavior at the OS level.
    #[inline]
    pub unsafe fn unlock(&self) -> SyncResult<()> {
        check("pthread_spin_unlock", unsafe {
            libc::pthread_spin_unlock(self.inner.get())
        })
    }

    /// The sharing scope fixed at construction
    #[must_use]
    pub fn share_scope(&self) -> ShareScope {
        self.scope
    }

    /// Raw handle for direct OS calls
    #[must_use]
    pub fn native_handle(&self) -> *mut libc::pthread_spinlock_t {
        self.inner.get()
    }
}

impl Drop for Spinlock {
    fn drop(&mut self) {
        let ret = unsafe { libc::pthread_spin_destroy(self.inner.get()) };
        if ret != 0 {
            error!(errno = ret, "pthread_spin_destroy failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_wait_round_trip() {
        let lock = Spinlock::new(ShareScope::Private).unwrap();
        assert_eq!(lock.share_scope(), ShareScope::Private);

        lock.lock().unwrap();
        assert!(!lock.try_lock().unwrap());
        unsafe { lock.unlock().unwrap() };

        assert!(lock.try_lock().unwrap());
        unsafe { lock.unlock().unwrap() };
    }
}
