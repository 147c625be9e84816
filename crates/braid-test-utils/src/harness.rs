//! Run one closure per simulated rank over a shared [`LocalBus`].

use std::sync::Arc;
use std::thread;

use braid_transport::{split_by_app, LocalBus, Partition};

/// Spawn one thread per entry of `apps` and run `body` on each.
///
/// `apps[r]` names the application of rank `r`. Results come back in
/// rank order.
///
/// # Panics
///
/// Panics if `apps` cannot be partitioned, or re-raises the first panic
/// from a rank thread.
pub fn run_ranks<T, F>(apps: &[&str], body: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(Partition, Arc<LocalBus>) -> T + Send + Sync + 'static,
{
    let partitions = split_by_app(apps).unwrap_or_else(|e| panic!("bad world: {e}"));
    let bus = Arc::new(LocalBus::new(partitions.len()));
    let body = Arc::new(body);

    let handles: Vec<_> = partitions
        .into_iter()
        .map(|part| {
            let bus = Arc::clone(&bus);
            let body = Arc::clone(&body);
            thread::Builder::new()
                .name(format!("rank-{}", part.rank()))
                .spawn(move || body(part, bus))
                .unwrap_or_else(|e| panic!("failed to spawn rank thread: {e}"))
        })
        .collect();

    handles
        .into_iter()
        .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
        .collect()
}
