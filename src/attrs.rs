/*!
 * Native Attribute Objects
 *
 * Typed owners of the pthread attribute objects used to customize primitive
 * construction: detach state and stack size for threads, kind and protocol
 * for mutexes, scheduling preference for read/write locks, wait clock for
 * condition variables, and process-sharing scope for all of them.
 *
 * Each wrapper initializes its native attribute object at construction and
 * destroys it on drop. Setters return `&mut Self` so calls chain with `?`.
 */

use crate::clock::ClockSource;
use crate::error::{check, SyncResult};
use crate::sys;
use std::mem;
use tracing::error;

/// Whether a primitive synchronizes within one process or across process
/// boundaries through shared memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareScope {
    /// Visible to the owning process only
    Private,
    /// Usable across processes via shared memory
    Shared,
}

impl ShareScope {
    pub(crate) fn as_pshared(self) -> libc::c_int {
        match self {
            Self::Private => libc::PTHREAD_PROCESS_PRIVATE,
            Self::Shared => libc::PTHREAD_PROCESS_SHARED,
        }
    }
}

/// Whether a new thread can be joined or starts out detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachState {
    /// Another thread may block on termination and collect the result
    Joinable,
    /// The OS reclaims the thread on termination; joining is impossible
    Detached,
}

impl DetachState {
    pub(crate) fn as_raw(self) -> libc::c_int {
        match self {
            Self::Joinable => libc::PTHREAD_CREATE_JOINABLE,
            Self::Detached => libc::PTHREAD_CREATE_DETACHED,
        }
    }

    pub(crate) fn from_raw(raw: libc::c_int) -> Self {
        if raw == libc::PTHREAD_CREATE_DETACHED {
            Self::Detached
        } else {
            Self::Joinable
        }
    }
}

/// Locking discipline of a mutex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutexKind {
    /// Relocking from the owning thread deadlocks, releasing unheld is undefined
    Normal,
    /// The owning thread may relock; release count must match acquire count
    Recursive,
    /// Relock and foreign release are reported as errors instead of undefined behavior
    ErrorCheck,
}

impl MutexKind {
    pub(crate) fn as_raw(self) -> libc::c_int {
        match self {
            Self::Normal => libc::PTHREAD_MUTEX_NORMAL,
            Self::Recursive => libc::PTHREAD_MUTEX_RECURSIVE,
            Self::ErrorCheck => libc::PTHREAD_MUTEX_ERRORCHECK,
        }
    }
}

/// Priority protocol of a mutex.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutexProtocol {
    /// Holding the mutex does not affect the owner's priority
    None,
    /// The owner inherits the highest priority among blocked waiters
    Inherit,
    /// The owner runs at the mutex's priority ceiling
    Protect,
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
impl MutexProtocol {
    pub(crate) fn as_raw(self) -> libc::c_int {
        match self {
            Self::None => sys::PTHREAD_PRIO_NONE,
            Self::Inherit => sys::PTHREAD_PRIO_INHERIT,
            Self::Protect => sys::PTHREAD_PRIO_PROTECT,
        }
    }
}

/// Owning wrapper over `pthread_attr_t`.
pub struct ThreadAttributes {
    inner: Box<libc::pthread_attr_t>,
}

impl ThreadAttributes {
    pub fn new() -> SyncResult<Self> {
        let mut inner: Box<libc::pthread_attr_t> = Box::new(unsafe { mem::zeroed() });
        check("pthread_attr_init", unsafe {
            libc::pthread_attr_init(&mut *inner)
        })?;
        Ok(Self { inner })
    }

    pub fn set_detach_state(&mut self, state: DetachState) -> SyncResult<&mut Self> {
        check("pthread_attr_setdetachstate", unsafe {
            libc::pthread_attr_setdetachstate(&mut *self.inner, state.as_raw())
        })?;
        Ok(self)
    }

    /// The detach-state field the OS will apply at thread creation.
    ///
    /// The OS standard makes newly initialized attribute objects joinable.
    pub fn detach_state(&self) -> SyncResult<DetachState> {
        let mut raw = 0;
        check("pthread_attr_getdetachstate", unsafe {
            sys::pthread_attr_getdetachstate(&*self.inner, &mut raw)
        })?;
        Ok(DetachState::from_raw(raw))
    }

    pub fn set_stack_size(&mut self, bytes: usize) -> SyncResult<&mut Self> {
        check("pthread_attr_setstacksize", unsafe {
            libc::pthread_attr_setstacksize(&mut *self.inner, bytes)
        })?;
        Ok(self)
    }

    pub(crate) fn as_ptr(&self) -> *const libc::pthread_attr_t {
        &*self.inner
    }
}

impl Drop for ThreadAttributes {
    fn drop(&mut self) {
        let ret = unsafe { libc::pthread_attr_destroy(&mut *self.inner) };
        if ret != 0 {
            error!(errno = ret, "pthread_attr_destroy failed");
        }
    }
}

/// Owning wrapper over `pthread_mutexattr_t`.
pub struct MutexAttributes {
    inner: Box<libc::pthread_mutexattr_t>,
}

impl MutexAttributes {
    pub fn new() -> SyncResult<Self> {
        let mut inner: Box<libc::pthread_mutexattr_t> = Box::new(unsafe { mem::zeroed() });
        check("pthread_mutexattr_init", unsafe {
            libc::pthread_mutexattr_init(&mut *inner)
        })?;
        Ok(Self { inner })
    }

    pub fn set_kind(&mut self, kind: MutexKind) -> SyncResult<&mut Self> {
        check("pthread_mutexattr_settype", unsafe {
            libc::pthread_mutexattr_settype(&mut *self.inner, kind.as_raw())
        })?;
        Ok(self)
    }

    pub fn set_share_scope(&mut self, scope: ShareScope) -> SyncResult<&mut Self> {
        check("pthread_mutexattr_setpshared", unsafe {
            sys::pthread_mutexattr_setpshared(&mut *self.inner, scope.as_pshared())
        })?;
        Ok(self)
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    pub fn set_protocol(&mut self, protocol: MutexProtocol) -> SyncResult<&mut Self> {
        check("pthread_mutexattr_setprotocol", unsafe {
            sys::pthread_mutexattr_setprotocol(&mut *self.inner, protocol.as_raw())
        })?;
        Ok(self)
    }

    /// Priority a `Protect`-protocol mutex raises its owner to.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    pub fn set_priority_ceiling(&mut self, ceiling: i32) -> SyncResult<&mut Self> {
        check("pthread_mutexattr_setprioceiling", unsafe {
            sys::pthread_mutexattr_setprioceiling(&mut *self.inner, ceiling)
        })?;
        Ok(self)
    }

    pub(crate) fn as_ptr(&self) -> *const libc::pthread_mutexattr_t {
        &*self.inner
    }
}

impl Drop for MutexAttributes {
    fn drop(&mut self) {
        let ret = unsafe { libc::pthread_mutexattr_destroy(&mut *self.inner) };
        if ret != 0 {
            error!(errno = ret, "pthread_mutexattr_destroy failed");
        }
    }
}

/// Owning wrapper over `pthread_rwlockattr_t`.
pub struct RwLockAttributes {
    inner: Box<libc::pthread_rwlockattr_t>,
}

impl RwLockAttributes {
    pub fn new() -> SyncResult<Self> {
        let mut inner: Box<libc::pthread_rwlockattr_t> = Box::new(unsafe { mem::zeroed() });
        check("pthread_rwlockattr_init", unsafe {
            libc::pthread_rwlockattr_init(&mut *inner)
        })?;
        Ok(Self { inner })
    }

    pub fn set_share_scope(&mut self, scope: ShareScope) -> SyncResult<&mut Self> {
        check("pthread_rwlockattr_setpshared", unsafe {
            sys::pthread_rwlockattr_setpshared(&mut *self.inner, scope.as_pshared())
        })?;
        Ok(self)
    }

    /// Prefer waiting writers over new readers, without recursive read
    /// acquisition, to bound writer starvation under read-heavy contention.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    pub fn set_writer_preference(&mut self) -> SyncResult<&mut Self> {
        check("pthread_rwlockattr_setkind_np", unsafe {
            sys::pthread_rwlockattr_setkind_np(
                &mut *self.inner,
                sys::PTHREAD_RWLOCK_PREFER_WRITER_NONRECURSIVE_NP,
            )
        })?;
        Ok(self)
    }

    pub(crate) fn as_ptr(&self) -> *const libc::pthread_rwlockattr_t {
        &*self.inner
    }
}

impl Drop for RwLockAttributes {
    fn drop(&mut self) {
        let ret = unsafe { libc::pthread_rwlockattr_destroy(&mut *self.inner) };
        if ret != 0 {
            error!(errno = ret, "pthread_rwlockattr_destroy failed");
        }
    }
}

/// Owning wrapper over `pthread_condattr_t`.
///
/// Tracks the selected wait clock so the condition variable built from
/// these attributes computes its deadlines against the same clock the OS
/// waits on.
pub struct CondvarAttributes {
    inner: Box<libc::pthread_condattr_t>,
    clock: ClockSource,
}

impl CondvarAttributes {
    pub fn new() -> SyncResult<Self> {
        let mut inner: Box<libc::pthread_condattr_t> = Box::new(unsafe { mem::zeroed() });
        check("pthread_condattr_init", unsafe {
            libc::pthread_condattr_init(&mut *inner)
        })?;
        Ok(Self {
            inner,
            clock: ClockSource::Realtime,
        })
    }

    /// Select the clock timed waits measure their deadline against.
    ///
    /// `Monotonic` makes timed waits immune to wall-clock adjustments.
    #[cfg(target_os = "linux")]
    pub fn set_clock(&mut self, clock: ClockSource) -> SyncResult<&mut Self> {
        check("pthread_condattr_setclock", unsafe {
            libc::pthread_condattr_setclock(&mut *self.inner, clock.as_clockid())
        })?;
        self.clock = clock;
        Ok(self)
    }

    pub fn set_share_scope(&mut self, scope: ShareScope) -> SyncResult<&mut Self> {
        check("pthread_condattr_setpshared", unsafe {
            sys::pthread_condattr_setpshared(&mut *self.inner, scope.as_pshared())
        })?;
        Ok(self)
    }

    /// The clock a condvar built from these attributes will wait on
    #[must_use]
    pub fn wait_clock(&self) -> ClockSource {
        self.clock
    }

    pub(crate) fn as_ptr(&self) -> *const libc::pthread_condattr_t {
        &*self.inner
    }
}

impl Drop for CondvarAttributes {
    fn drop(&mut self) {
        let ret = unsafe { libc::pthread_condattr_destroy(&mut *self.inner) };
        if ret != 0 {
            error!(errno = ret, "pthread_condattr_destroy failed");
        }
    }
}
