/*!
 * Lock Benchmarks
 *
 * Uncontended acquire/release cost across the lock wrappers
 */

use criterion::{criterion_group, criterion_main, Criterion};
use posix_sync::{Mutex, RwLock};

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended_acquire_release");

    let mutex = Mutex::new().unwrap();
    group.bench_function("mutex", |b| {
        b.iter(|| {
            mutex.lock().unwrap();
            // SAFETY: acquired on the line above by this thread.
            unsafe { mutex.unlock().unwrap() };
        })
    });

    #[cfg(target_os = "linux")]
    {
        use posix_sync::{ShareScope, Spinlock};

        let spinlock = Spinlock::new(ShareScope::Private).unwrap();
        group.bench_function("spinlock", |b| {
            b.iter(|| {
                spinlock.lock().unwrap();
                // SAFETY: acquired on the line above by this thread.
                unsafe { spinlock.unlock().unwrap() };
            })
        });
    }

    let rwlock = RwLock::new().unwrap();
    group.bench_function("rwlock_read", |b| {
        b.iter(|| {
            rwlock.read_lock().unwrap();
            // SAFETY: acquired on the line above by this thread.
            unsafe { rwlock.unlock().unwrap() };
        })
    });
    group.bench_function("rwlock_write", |b| {
        b.iter(|| {
            rwlock.write_lock().unwrap();
            // SAFETY: acquired on the line above by this thread.
            unsafe { rwlock.unlock().unwrap() };
        })
    });

    group.finish();
}

criterion_group!(benches, bench_uncontended);
criterion_main!(benches);
