/*!
 * Read/Write Lock
 *
 * Owning wrapper over the native read/write lock: unlimited concurrent
 * readers, one exclusive writer. The no-attribute constructor deliberately
 * layers a writer-preferring, non-recursive policy over the OS default,
 * which prefers readers and lets a steady read stream starve writers.
 */

use crate::attrs::RwLockAttributes;
use crate::error::{check, check_busy, SyncResult};
use std::cell::UnsafeCell;
use std::mem;
use tracing::error;

/// Owning wrapper over `pthread_rwlock_t`.
///
/// Same ownership shape as [`Mutex`](crate::Mutex): the handle is
/// heap-pinned, initialized at construction, destroyed on drop, and never
/// duplicated.
pub struct RwLock {
    inner: Box<UnsafeCell<libc::pthread_rwlock_t>>,
}

// SAFETY: the native rwlock is built for concurrent acquisition from many
// threads; all state transitions go through OS calls on a stable heap address.
unsafe impl Send for RwLock {}
unsafe impl Sync for RwLock {}

impl RwLock {
    /// Create a read/write lock with the writer-preferring, non-recursive
    /// policy. Falls back to the platform default where that policy is not
    /// selectable.
    pub fn new() -> SyncResult<Self> {
        #[cfg(all(target_os = "linux", target_env = "gnu"))]
        {
            let mut attrs = RwLockAttributes::new()?;
            attrs.set_writer_preference()?;
            Self::init(attrs.as_ptr())
        }
        #[cfg(not(all(target_os = "linux", target_env = "gnu")))]
        {
            Self::init(std::ptr::null())
        }
    }

    /// Create a read/write lock from a caller-prepared attribute object
    pub fn with_attributes(attrs: &RwLockAttributes) -> SyncResult<Self> {
        Self::init(attrs.as_ptr())
    }

    fn init(attrs: *const libc::pthread_rwlockattr_t) -> SyncResult<Self> {
        let inner: Box<UnsafeCell<libc::pthread_rwlock_t>> =
            Box::new(UnsafeCell::new(unsafe { mem::zeroed() }));
        check("pthread_rwlock_init", unsafe {
            libc::pthread_rwlock_init(inner.get(), attrs)
        })?;
        Ok(Self { inner })
    }

    /// Block until shared read access is granted
    #[inline]
    pub fn read_lock(&self) -> SyncResult<()> {
        check("pthread_rwlock_rdlock", unsafe {
            libc::pthread_rwlock_rdlock(self.inner.get())
        })
    }

    /// Attempt non-blocking shared read access; `Ok(false)` means a writer
    /// holds or is preferred right now
    #[inline]
    pub fn try_read_lock(&self) -> SyncResult<bool> {
        check_busy("pthread_rwlock_tryrdlock", unsafe {
            libc::pthread_rwlock_tryrdlock(self.inner.get())
        })
    }

    /// Block until exclusive write access is granted
    #[inline]
    pub fn write_lock(&self) -> SyncResult<()> {
        check("pthread_rwlock_wrlock", unsafe {
            libc::pthread_rwlock_wrlock(self.inner.get())
        })
    }

    /// Attempt non-blocking exclusive write access; `Ok(false)` means the
    /// lock is held in any mode
    #[inline]
    pub fn try_write_lock(&self) -> SyncResult<bool> {
        check_busy("pthread_rwlock_trywrlock", unsafe {
            libc::pthread_rwlock_trywrlock(self.inner.get())
        })
    }

    /// Release one read hold or the write hold.
    ///
    /// # Safety
    ///
    /// The calling thread must currently hold the lock in some mode.
    /// Releasing an unheld lock is undefined behavior at the OS level.
    #[inline]
    pub unsafe fn unlock(&self) -> SyncResult<()> {
        check("pthread_rwlock_unlock", unsafe {
            libc::pthread_rwlock_unlock(self.inner.get())
        })
    }

    /// Raw handle for direct OS calls
    #[must_use]
    pub fn native_handle(&self) -> *mut libc::pthread_rwlock_t {
        self.inner.get()
    }
}

impl Drop for RwLock {
    fn drop(&mut self) {
        let ret = unsafe { libc::pthread_rwlock_destroy(self.inner.get()) };
        if ret != 0 {
            error!(errno = ret, "pthread_rwlock_destroy failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_acquire_round_trip() {
        let lock = RwLock::new().unwrap();
        lock.read_lock().unwrap();
        unsafe { lock.unlock().unwrap() };
        lock.write_lock().unwrap();
        unsafe { lock.unlock().unwrap() };
    }

    #[test]
    fn readers_share_writers_exclude() {
        let lock = RwLock::new().unwrap();

        assert!(lock.try_read_lock().unwrap());
        assert!(lock.try_read_lock().unwrap());
        assert!(!lock.try_write_lock().unwrap());
        unsafe {
            lock.unlock().unwrap();
            lock.unlock().unwrap();
        }

        assert!(lock.try_write_lock().unwrap());
        assert!(!lock.try_read_lock().unwrap());
        unsafe { lock.unlock().unwrap() };
    }
}
