/*!
 * Timestamp Demo - Main Entry Point
 *
 * Launches a fixed number of worker threads; each stamps the current time
 * and prints it under mutual exclusion, then all workers are joined. The
 * console lock is handed to each worker explicitly instead of living in a
 * process-wide global.
 */

use posix_sync::{init_tracing, DetachState, ManagedThread, Mutex, ThreadAttributes};
use std::error::Error;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

const NUM_WORKERS: usize = 50;

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    info!("launching {NUM_WORKERS} timestamp workers");

    let console_lock = Arc::new(Mutex::new()?);

    let mut attrs = ThreadAttributes::new()?;
    attrs.set_detach_state(DetachState::Joinable)?;

    let mut workers = Vec::with_capacity(NUM_WORKERS);
    for _ in 0..NUM_WORKERS {
        let lock = Arc::clone(&console_lock);
        workers.push(ManagedThread::spawn_with(&attrs, move || stamp(&lock))?);
    }

    for mut worker in workers {
        worker.join()?;
    }

    info!("all workers joined");
    Ok(())
}

fn stamp(console_lock: &Mutex) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since| since.as_nanos())
        .unwrap_or_default();
    let thread_id = unsafe { libc::pthread_self() };

    console_lock.lock().expect("console lock");
    println!("thread id : {thread_id}  |  timestamp (ns since epoch) : {nanos}");
    // SAFETY: acquired two lines up by this thread.
    unsafe { console_lock.unlock().expect("console unlock") };
}
