/*!
 * Supplemental POSIX Declarations
 * Bindings the portable libc surface does not reliably cover, mirroring <pthread.h>
 */

use libc::c_int;

#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub const PTHREAD_RWLOCK_PREFER_WRITER_NONRECURSIVE_NP: c_int = 2;

#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub const PTHREAD_PRIO_NONE: c_int = 0;
#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub const PTHREAD_PRIO_INHERIT: c_int = 1;
#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub const PTHREAD_PRIO_PROTECT: c_int = 2;

extern "C" {
    pub fn pthread_attr_getdetachstate(
        attr: *const libc::pthread_attr_t,
        detachstate: *mut c_int,
    ) -> c_int;

    pub fn pthread_mutexattr_setpshared(
        attr: *mut libc::pthread_mutexattr_t,
        pshared: c_int,
    ) -> c_int;

    pub fn pthread_rwlockattr_setpshared(
        attr: *mut libc::pthread_rwlockattr_t,
        pshared: c_int,
    ) -> c_int;

    pub fn pthread_condattr_setpshared(
        attr: *mut libc::pthread_condattr_t,
        pshared: c_int,
    ) -> c_int;

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    pub fn pthread_rwlockattr_setkind_np(
        attr: *mut libc::pthread_rwlockattr_t,
        pref: c_int,
    ) -> c_int;

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    pub fn pthread_mutexattr_setprotocol(
        attr: *mut libc::pthread_mutexattr_t,
        protocol: c_int,
    ) -> c_int;

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    pub fn pthread_mutexattr_setprioceiling(
        attr: *mut libc::pthread_mutexattr_t,
        prioceiling: c_int,
    ) -> c_int;
}
