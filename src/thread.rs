/*!
 * Managed Thread
 *
 * Move-only ownership of one kernel-scheduled thread. Construction starts
 * OS execution immediately (there is no create-then-start split) and drop
 * joins a still-joinable thread, so no accidental thread outlives its
 * owner. Callers wanting fire-and-forget behavior detach first.
 */

use crate::attrs::{DetachState, ThreadAttributes};
use crate::error::{check, SyncError, SyncResult};
use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use tracing::error;

type BoxedRoutine = Box<dyn FnOnce() + Send + 'static>;

extern "C" fn closure_trampoline(arg: *mut c_void) -> *mut c_void {
    // SAFETY: arg is the routine leaked by spawn_inner, reclaimed exactly once.
    let routine = unsafe { Box::from_raw(arg.cast::<BoxedRoutine>()) };
    // Unwinding out of an extern "C" frame would abort the whole process.
    if panic::catch_unwind(AssertUnwindSafe(|| routine())).is_err() {
        error!("thread routine panicked");
    }
    ptr::null_mut()
}

/// Owning handle for one kernel-scheduled thread.
///
/// Ownership is move-only: there is no `Clone`, moves transfer the handle
/// and join responsibility, and assigning over a still-joinable instance
/// drops it, which blocks on an implicit join first.
pub struct ManagedThread {
    handle: libc::pthread_t,
    joinable: bool,
}

impl ManagedThread {
    /// Start a thread with default OS attributes.
    ///
    /// The OS standard makes default-attribute threads joinable, so
    /// [`joinable`](Self::joinable) is true on return.
    pub fn spawn<F>(routine: F) -> SyncResult<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        Self::spawn_inner(ptr::null(), Box::new(routine), true)
    }

    /// Start a thread configured by a caller-prepared attribute object.
    ///
    /// The attribute object's detach-state field decides whether the new
    /// thread is joinable; it is queried here, at creation time.
    pub fn spawn_with<F>(attrs: &ThreadAttributes, routine: F) -> SyncResult<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let joinable = attrs.detach_state()? == DetachState::Joinable;
        Self::spawn_inner(attrs.as_ptr(), Box::new(routine), joinable)
    }

    /// Start a thread on a raw OS-signature routine, for callers that need
    /// the thread's native return value through
    /// [`join_value`](Self::join_value).
    ///
    /// # Safety
    ///
    /// `arg` must remain valid for as long as the routine can read it, and
    /// the routine must be sound to run on a fresh OS thread.
    pub unsafe fn spawn_raw(
        routine: extern "C" fn(*mut c_void) -> *mut c_void,
        arg: *mut c_void,
    ) -> SyncResult<Self> {
        let mut handle: libc::pthread_t = 0;
        check("pthread_create", unsafe {
            libc::pthread_create(&mut handle, ptr::null(), routine, arg)
        })?;
        Ok(Self {
            handle,
            joinable: true,
        })
    }

    fn spawn_inner(
        attrs: *const libc::pthread_attr_t,
        routine: BoxedRoutine,
        joinable: bool,
    ) -> SyncResult<Self> {
        let arg = Box::into_raw(Box::new(routine));
        let mut handle: libc::pthread_t = 0;
        let ret =
            unsafe { libc::pthread_create(&mut handle, attrs, closure_trampoline, arg.cast()) };
        if ret != 0 {
            // The routine never ran; take it back so it is not leaked.
            drop(unsafe { Box::from_raw(arg) });
            return Err(SyncError::from_errno("pthread_create", ret));
        }
        Ok(Self { handle, joinable })
    }

    /// True while this instance owns a thread that has been neither joined
    /// nor detached
    #[must_use]
    pub fn joinable(&self) -> bool {
        self.joinable
    }

    /// Block until the owned thread terminates. A silent no-op when not
    /// joinable.
    pub fn join(&mut self) -> SyncResult<()> {
        self.join_value().map(|_| ())
    }

    /// Like [`join`](Self::join), surfacing the thread's native return
    /// value. Null for threads started from a closure, or when there was
    /// nothing to join.
    pub fn join_value(&mut self) -> SyncResult<*mut c_void> {
        if !self.joinable {
            return Ok(ptr::null_mut());
        }
        let mut value: *mut c_void = ptr::null_mut();
        check("pthread_join", unsafe {
            libc::pthread_join(self.handle, &mut value)
        })?;
        self.joinable = false;
        Ok(value)
    }

    /// Hand join responsibility to the OS: the thread is reclaimed
    /// automatically on termination, this instance stops reporting itself
    /// joinable, and drop will not block on it. A no-op when not joinable.
    pub fn detach(&mut self) -> SyncResult<()> {
        if !self.joinable {
            return Ok(());
        }
        check("pthread_detach", unsafe {
            libc::pthread_detach(self.handle)
        })?;
        self.joinable = false;
        Ok(())
    }

    /// Raw OS thread handle
    #[must_use]
    pub fn native_handle(&self) -> libc::pthread_t {
        self.handle
    }
}

/// The "no thread" state: sentinel handle, not joinable. Exists so a slot
/// can be rebound by assignment later.
impl Default for ManagedThread {
    fn default() -> Self {
        Self {
            handle: 0,
            joinable: false,
        }
    }
}

impl Drop for ManagedThread {
    fn drop(&mut self) {
        // Going out of scope with a running thread blocks here until it
        // finishes.
        if let Err(err) = self.join() {
            error!(error = %err, "implicit join on drop failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn spawn_is_joinable_until_joined() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let mut worker = ManagedThread::spawn(move || flag.store(true, Ordering::SeqCst)).unwrap();

        assert!(worker.joinable());
        worker.join().unwrap();
        assert!(!worker.joinable());
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn join_on_a_non_joinable_instance_is_a_no_op() {
        let mut none = ManagedThread::default();
        assert!(!none.joinable());
        none.join().unwrap();

        let mut worker = ManagedThread::spawn(|| {}).unwrap();
        worker.join().unwrap();
        worker.join().unwrap();
    }

    #[test]
    fn detach_clears_join_responsibility() {
        let mut worker = ManagedThread::spawn(|| {}).unwrap();
        worker.detach().unwrap();
        assert!(!worker.joinable());
        worker.detach().unwrap();
        worker.join().unwrap();
    }

    #[test]
    fn a_panicking_routine_does_not_take_the_process_down() {
        let mut worker = ManagedThread::spawn(|| panic!("worker failure")).unwrap();
        worker.join().unwrap();
    }
}
