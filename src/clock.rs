/*!
 * Deadline Clock
 *
 * Clock selection and absolute-deadline arithmetic for timed waits.
 *
 * Timed waits take a relative duration, but the OS wants an absolute
 * `timespec` split into whole seconds and a sub-second remainder strictly
 * below one second. The deadline is the configured clock's current reading
 * plus the relative duration, with the nanosecond carry folded into the
 * seconds field.
 */

use crate::error::{SyncError, SyncResult};
use std::mem;
use std::time::Duration;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Which OS clock timed waits measure their deadline against.
///
/// `Realtime` mirrors the OS default but is sensitive to wall-clock
/// adjustments (manual changes, leap seconds). `Monotonic` is the robust
/// choice for elapsed-time semantics and can be selected per condition
/// variable through [`CondvarAttributes`](crate::CondvarAttributes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockSource {
    /// Wall-clock time (CLOCK_REALTIME)
    #[default]
    Realtime,
    /// Adjustment-free elapsed time (CLOCK_MONOTONIC)
    Monotonic,
}

impl ClockSource {
    pub(crate) fn as_clockid(self) -> libc::clockid_t {
        match self {
            Self::Realtime => libc::CLOCK_REALTIME,
            Self::Monotonic => libc::CLOCK_MONOTONIC,
        }
    }

    /// Read the clock's current value.
    ///
    /// Unlike the pthread family, `clock_gettime` reports failure through
    /// `errno` rather than its return value.
    pub(crate) fn now(self) -> SyncResult<libc::timespec> {
        let mut now: libc::timespec = unsafe { mem::zeroed() };
        if unsafe { libc::clock_gettime(self.as_clockid(), &mut now) } != 0 {
            let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
            return Err(SyncError::from_errno("clock_gettime", errno));
        }
        Ok(now)
    }
}

/// Absolute deadline `rel` after `now`, with `tv_nsec` normalized to stay
/// strictly below one second.
pub(crate) fn deadline_after(now: libc::timespec, rel: Duration) -> libc::timespec {
    let mut sec = now.tv_sec as i64 + rel.as_secs() as i64;
    let mut nsec = now.tv_nsec as i64 + i64::from(rel.subsec_nanos());
    if nsec >= NANOS_PER_SEC {
        sec += nsec / NANOS_PER_SEC;
        nsec %= NANOS_PER_SEC;
    }
    let mut deadline: libc::timespec = unsafe { mem::zeroed() };
    deadline.tv_sec = sec as libc::time_t;
    deadline.tv_nsec = nsec as libc::c_long;
    deadline
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ts(sec: i64, nsec: i64) -> libc::timespec {
        let mut out: libc::timespec = unsafe { mem::zeroed() };
        out.tv_sec = sec as libc::time_t;
        out.tv_nsec = nsec as libc::c_long;
        out
    }

    #[test]
    fn sub_second_overflow_carries_into_seconds() {
        let deadline = deadline_after(ts(7, 999_999_999), Duration::new(0, 2));
        assert_eq!(deadline.tv_sec, 8);
        assert_eq!(deadline.tv_nsec, 1);
    }

    #[test]
    fn exact_second_boundary_leaves_no_remainder() {
        let deadline = deadline_after(ts(3, 500_000_000), Duration::new(1, 500_000_000));
        assert_eq!(deadline.tv_sec, 5);
        assert_eq!(deadline.tv_nsec, 0);
    }

    #[test]
    fn both_clocks_are_readable() {
        for clock in [ClockSource::Realtime, ClockSource::Monotonic] {
            let now = clock.now().unwrap();
            assert!((0..NANOS_PER_SEC).contains(&(now.tv_nsec as i64)));
        }
    }

    proptest! {
        #[test]
        fn deadline_is_always_normalized(
            sec in 0i64..=4_000_000_000,
            nsec in 0i64..1_000_000_000,
            rel_secs in 0u64..=4_000_000_000,
            rel_nanos in 0u32..1_000_000_000,
        ) {
            let deadline = deadline_after(ts(sec, nsec), Duration::new(rel_secs, rel_nanos));
            prop_assert!((0..NANOS_PER_SEC).contains(&(deadline.tv_nsec as i64)));

            let total = deadline.tv_sec as i128 * 1_000_000_000 + deadline.tv_nsec as i128;
            let expected = (sec as i128 + rel_secs as i128) * 1_000_000_000
                + nsec as i128
                + rel_nanos as i128;
            prop_assert_eq!(total, expected);
        }
    }
}
