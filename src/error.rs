/*!
 * Error Types
 * Centralized classification of native primitive failures with thiserror and miette support
 */

use miette::Diagnostic;
use thiserror::Error;

/// Result type for native primitive operations
pub type SyncResult<T> = Result<T, SyncError>;

/// A failure reported by an underlying POSIX primitive call.
///
/// Busy and timed-out outcomes are not errors: the non-blocking acquire
/// family reports busy as `Ok(false)` and timed waits report the elapsed
/// deadline through [`WaitStatus`](crate::WaitStatus). Everything here is a
/// genuine contract violation or resource failure, and it is reported in
/// every build configuration rather than asserted away in debug builds.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SyncError {
    #[error("{call} failed: insufficient resources (errno {errno})")]
    #[diagnostic(
        code(sync::resource_exhausted),
        help("The system is out of memory or hit a thread/lock limit. Free resources or raise the relevant rlimit.")
    )]
    ResourceExhausted { call: &'static str, errno: i32 },

    #[error("{call} rejected its arguments (errno {errno})")]
    #[diagnostic(
        code(sync::invalid_argument),
        help("A handle or attribute object is invalid or was never initialized. This indicates a bug in the calling code.")
    )]
    InvalidArgument { call: &'static str, errno: i32 },

    #[error("{call} would deadlock the calling thread")]
    #[diagnostic(
        code(sync::would_deadlock),
        help("The calling thread already owns the primitive it is about to wait on.")
    )]
    WouldDeadlock { call: &'static str },

    #[error("{call} requires ownership the calling thread does not hold")]
    #[diagnostic(
        code(sync::not_owner),
        help("Release operations must come from the thread that acquired the primitive.")
    )]
    NotOwner { call: &'static str },

    #[error("{call} found the primitive still in use")]
    #[diagnostic(
        code(sync::still_in_use),
        help("The primitive is still held or has waiters. Release all holders before destroying it.")
    )]
    StillInUse { call: &'static str },

    #[error("{call} failed with unexpected errno {errno}")]
    #[diagnostic(
        code(sync::unexpected),
        help("The OS primitive reported an error outside its documented contract.")
    )]
    Unexpected { call: &'static str, errno: i32 },
}

impl SyncError {
    /// Classify a non-zero return code from a pthread-family call.
    pub fn from_errno(call: &'static str, errno: i32) -> Self {
        match errno {
            libc::EAGAIN | libc::ENOMEM => Self::ResourceExhausted { call, errno },
            libc::EINVAL => Self::InvalidArgument { call, errno },
            libc::EDEADLK => Self::WouldDeadlock { call },
            libc::EPERM => Self::NotOwner { call },
            libc::EBUSY => Self::StillInUse { call },
            _ => Self::Unexpected { call, errno },
        }
    }

    /// The native call that reported the failure
    #[must_use]
    pub fn call(&self) -> &'static str {
        match self {
            Self::ResourceExhausted { call, .. }
            | Self::InvalidArgument { call, .. }
            | Self::WouldDeadlock { call }
            | Self::NotOwner { call }
            | Self::StillInUse { call }
            | Self::Unexpected { call, .. } => call,
        }
    }
}

/// Funnel for calls whose only success value is 0.
pub(crate) fn check(call: &'static str, ret: libc::c_int) -> SyncResult<()> {
    if ret == 0 {
        Ok(())
    } else {
        Err(SyncError::from_errno(call, ret))
    }
}

/// Funnel for the non-blocking acquire family. EBUSY is the expected
/// "held in a conflicting mode" outcome, not an error.
pub(crate) fn check_busy(call: &'static str, ret: libc::c_int) -> SyncResult<bool> {
    match ret {
        0 => Ok(true),
        libc::EBUSY => Ok(false),
        errno => Err(SyncError::from_errno(call, errno)),
    }
}
