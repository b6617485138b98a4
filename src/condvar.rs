/*!
 * Condition Variable
 *
 * Owning wrapper over the native condition variable. A condvar never owns a
 * mutex: every wait call receives one by reference, mirroring the OS
 * contract that the mutex must be held by the caller before waiting and is
 * re-acquired before the wait returns.
 */

use crate::attrs::CondvarAttributes;
use crate::clock::{self, ClockSource};
use crate::error::{check, SyncResult};
use crate::mutex::Mutex;
use std::cell::UnsafeCell;
use std::mem;
use std::ptr;
use std::time::Duration;
use tracing::error;

/// Outcome of a timed wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    /// A signal or broadcast arrived before the deadline
    Signaled,
    /// The deadline elapsed with no signal
    TimedOut,
}

impl WaitStatus {
    /// Check whether the deadline elapsed unsignaled
    #[inline]
    #[must_use]
    pub fn timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// Owning wrapper over `pthread_cond_t`.
///
/// Records which clock its deadlines are computed against, so a condvar
/// configured for the monotonic clock through
/// [`CondvarAttributes`](crate::CondvarAttributes) reads that same clock
/// when turning a relative timeout into an absolute deadline.
pub struct Condvar {
    inner: Box<UnsafeCell<libc::pthread_cond_t>>,
    clock: ClockSource,
}

// SAFETY: the native condvar is built for cross-thread wait/signal; all
// state transitions go through OS calls on a stable heap address.
unsafe impl Send for Condvar {}
unsafe impl Sync for Condvar {}

impl Condvar {
    /// Create a condition variable with default OS attributes, waiting on
    /// the wall clock
    pub fn new() -> SyncResult<Self> {
        Self::init(ptr::null(), ClockSource::default())
    }

    /// Create a condition variable from a caller-prepared attribute object
    pub fn with_attributes(attrs: &CondvarAttributes) -> SyncResult<Self> {
        Self::init(attrs.as_ptr(), attrs.wait_clock())
    }

    fn init(attrs: *const libc::pthread_condattr_t, clock: ClockSource) -> SyncResult<Self> {
        let inner: Box<UnsafeCell<libc::pthread_cond_t>> =
            Box::new(UnsafeCell::new(unsafe { mem::zeroed() }));
        check("pthread_cond_init", unsafe {
            libc::pthread_cond_init(inner.get(), attrs)
        })?;
        Ok(Self { inner, clock })
    }

    /// Atomically release `mutex` and suspend until signaled; `mutex` is
    /// re-acquired before this returns. Wakeups may be spurious, so callers
    /// re-check their predicate in a loop.
    ///
    /// # Safety
    ///
    /// The calling thread must hold `mutex`. Waiting on an unheld mutex is
    /// undefined behavior at the OS level.
    pub unsafe fn wait(&self, mutex: &Mutex) -> SyncResult<()> {
        check("pthread_cond_wait", unsafe {
            libc::pthread_cond_wait(self.inner.get(), mutex.native_handle())
        })
    }

    /// Timed variant of [`wait`](Self::wait): gives up once `rel` has
    /// elapsed on the configured clock.
    ///
    /// # Safety
    ///
    /// Same contract as [`wait`](Self::wait).
    pub unsafe fn wait_timeout(&self, mutex: &Mutex, rel: Duration) -> SyncResult<WaitStatus> {
        let deadline = clock::deadline_after(self.clock.now()?, rel);
        let ret = unsafe {
            libc::pthread_cond_timedwait(self.inner.get(), mutex.native_handle(), &deadline)
        };
        if ret == libc::ETIMEDOUT {
            return Ok(WaitStatus::TimedOut);
        }
        check("pthread_cond_timedwait", ret)?;
        Ok(WaitStatus::Signaled)
    }

    /// Wake at least one waiter, if any
    pub fn signal(&self) -> SyncResult<()> {
        check("pthread_cond_signal", unsafe {
            libc::pthread_cond_signal(self.inner.get())
        })
    }

    /// Wake all current waiters
    pub fn broadcast(&self) -> SyncResult<()> {
        check("pthread_cond_broadcast", unsafe {
            libc::pthread_cond_broadcast(self.inner.get())
        })
    }

    /// The clock timed waits measure their deadline against
    #[must_use]
    pub fn wait_clock(&self) -> ClockSource {
        self.clock
    }

    /// Raw handle for direct OS calls
    #[must_use]
    pub fn native_handle(&self) -> *mut libc::pthread_cond_t {
        self.inner.get()
    }
}

impl Drop for Condvar {
    fn drop(&mut self) {
        let ret = unsafe { libc::pthread_cond_destroy(self.inner.get()) };
        if ret != 0 {
            error!(errno = ret, "pthread_cond_destroy failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_times_out_without_signal() {
        let mutex = Mutex::new().unwrap();
        let cond = Condvar::new().unwrap();

        mutex.lock().unwrap();
        let status = unsafe { cond.wait_timeout(&mutex, Duration::ZERO).unwrap() };
        unsafe { mutex.unlock().unwrap() };

        assert!(status.timed_out());
    }

    #[test]
    fn signal_and_broadcast_without_waiters_are_harmless() {
        let cond = Condvar::new().unwrap();
        cond.signal().unwrap();
        cond.broadcast().unwrap();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn monotonic_deadlines_time_out_too() {
        let mut attrs = CondvarAttributes::new().unwrap();
        attrs.set_clock(ClockSource::Monotonic).unwrap();
        let cond = Condvar::with_attributes(&attrs).unwrap();
        assert_eq!(cond.wait_clock(), ClockSource::Monotonic);

        let mutex = Mutex::new().unwrap();
        mutex.lock().unwrap();
        let status = unsafe { cond.wait_timeout(&mutex, Duration::from_millis(10)).unwrap() };
        unsafe { mutex.unlock().unwrap() };

        assert!(status.timed_out());
    }
}
