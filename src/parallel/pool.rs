use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::queue::WorkQueue;

/// Outcome counts for one pool run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSummary {
    pub workers: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl PoolSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Fixed-size pool of scoped worker threads draining a shared [`WorkQueue`]
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    max_workers: usize,
}

/// Context for worker threads to avoid too many function parameters
struct WorkerContext<'a, T, F, P> {
    worker_id: usize,
    queue: &'a WorkQueue<T>,
    processor: &'a F,
    reporter: &'a P,
    succeeded: &'a AtomicUsize,
    failed: &'a AtomicUsize,
}

impl WorkerPool {
    /// Create a pool of at most `max_workers` threads (0 = one per CPU core)
    pub fn new(max_workers: usize) -> Self {
        let max_workers = if max_workers == 0 {
            num_cpus::get().max(1)
        } else {
            max_workers
        };
        Self { max_workers }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Threads actually spawned for `work_count` items
    pub fn worker_count(&self, work_count: usize) -> usize {
        std::cmp::min(self.max_workers, work_count)
    }

    /// Process every item exactly once
    ///
    /// The queue is seeded with all items before any worker starts. Each
    /// worker repeatedly dequeues an item, runs `processor(item, worker_id)`,
    /// passes the outcome to `reporter`, and acknowledges the item. A failed
    /// item is logged and counted; it never stops the pool. Returns after
    /// every item has been acknowledged and all workers have exited.
    pub fn run<T, R, F, P>(&self, items: Vec<T>, processor: F, reporter: P) -> Result<PoolSummary>
    where
        T: Send,
        F: Fn(&T, usize) -> Result<R> + Sync,
        P: Fn(&T, &Result<R>, usize) + Sync,
    {
        if items.is_empty() {
            return Ok(PoolSummary::default());
        }

        let workers = self.worker_count(items.len());
        let queue = WorkQueue::seeded(items);
        let succeeded = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        tracing::debug!("starting {} workers for {} items", workers, queue.len());

        crossbeam::thread::scope(|s| {
            for worker_id in 0..workers {
                let ctx = WorkerContext {
                    worker_id,
                    queue: &queue,
                    processor: &processor,
                    reporter: &reporter,
                    succeeded: &succeeded,
                    failed: &failed,
                };
                s.spawn(move |_| worker_thread(ctx));
            }

            // Drain-and-acknowledge barrier; the scope then joins the threads
            queue.join();
        })
        .map_err(|_| anyhow::anyhow!("Thread panic occurred during parallel processing"))?;

        Ok(PoolSummary {
            workers,
            succeeded: succeeded.into_inner(),
            failed: failed.into_inner(),
        })
    }
}

/// Releases the barrier when a worker unwinds, abandoning the items it left
struct DrainOnPanic<'a, T>(&'a WorkQueue<T>);

impl<T> Drop for DrainOnPanic<'_, T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            // The run already fails; surviving workers may all be gone
            while self.0.dequeue_guarded().is_some() {}
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(4)
    }
}

fn worker_thread<T, R, F, P>(ctx: WorkerContext<'_, T, F, P>)
where
    F: Fn(&T, usize) -> Result<R>,
    P: Fn(&T, &Result<R>, usize),
{
    let _drain = DrainOnPanic(ctx.queue);

    while let Some(pending) = ctx.queue.dequeue_guarded() {
        let outcome = (ctx.processor)(pending.item(), ctx.worker_id);

        match &outcome {
            Ok(_) => {
                ctx.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                ctx.failed.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("worker-{}: item failed: {:#}", ctx.worker_id, e);
            }
        }

        (ctx.reporter)(pending.item(), &outcome, ctx.worker_id);
        // `pending` drops here and acknowledges the item
    }
    tracing::trace!("worker-{} found the queue drained", ctx.worker_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn ignore<T, R>(_: &T, _: &Result<R>, _: usize) {}

    #[test]
    fn test_worker_count_bounded_by_items() {
        let pool = WorkerPool::new(4);
        assert_eq!(pool.worker_count(2), 2);
        assert_eq!(pool.worker_count(10), 4);
        assert_eq!(pool.worker_count(0), 0);
        assert!(WorkerPool::new(0).max_workers() >= 1);
    }

    #[test]
    fn test_empty_input() {
        let summary = WorkerPool::new(4)
            .run(Vec::<u32>::new(), |x, _| Ok(*x), ignore)
            .unwrap();
        assert_eq!(summary, PoolSummary::default());
    }

    #[test]
    fn test_every_item_processed_once() {
        let seen = Mutex::new(Vec::new());
        let summary = WorkerPool::new(8)
            .run(
                (0..500).collect(),
                |x: &u32, _| {
                    seen.lock().unwrap().push(*x);
                    Ok(())
                },
                ignore,
            )
            .unwrap();

        assert_eq!(summary.workers, 8);
        assert_eq!(summary.succeeded, 500);
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 500);
        assert_eq!(seen.into_iter().collect::<HashSet<_>>().len(), 500);
    }

    #[test]
    fn test_failures_do_not_stop_pool() {
        let reported = Mutex::new(Vec::new());
        let summary = WorkerPool::new(3)
            .run(
                (1..=10).collect(),
                |x: &u32, _| {
                    if x % 3 == 0 {
                        anyhow::bail!("cannot process {}", x)
                    }
                    Ok(x * 2)
                },
                |x, outcome, _| reported.lock().unwrap().push((*x, outcome.is_ok())),
            )
            .unwrap();

        assert_eq!(summary.succeeded, 7);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.total(), 10);

        let mut reported = reported.into_inner().unwrap();
        reported.sort();
        assert_eq!(reported.len(), 10);
        assert!(reported.iter().filter(|(x, _)| x % 3 == 0).all(|(_, ok)| !ok));
    }

    #[test]
    fn test_single_worker_preserves_order() {
        let order = Mutex::new(Vec::new());
        WorkerPool::new(1)
            .run(
                vec!["a", "b", "c", "d"],
                |x: &&str, worker_id| {
                    assert_eq!(worker_id, 0);
                    order.lock().unwrap().push(*x);
                    Ok(())
                },
                ignore,
            )
            .unwrap();
        assert_eq!(order.into_inner().unwrap(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_panicking_worker_surfaces_error() {
        let result = WorkerPool::new(2).run(
            vec![1, 2, 3, 4],
            |x: &i32, _| {
                if *x == 2 {
                    panic!("processor bug");
                }
                Ok(())
            },
            ignore,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_lone_worker_panic_does_not_hang() {
        let result = WorkerPool::new(1).run(
            vec![1, 2, 3],
            |_: &i32, _| -> Result<()> { panic!("first item explodes") },
            ignore,
        );
        assert!(result.is_err());
    }
}
