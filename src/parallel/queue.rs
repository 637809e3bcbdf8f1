use crossbeam::channel::{Receiver, Sender, unbounded};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Thread-safe FIFO with an acknowledge/join barrier
///
/// Items are enqueued before workers start. Workers `dequeue` until it
/// returns `None`, and acknowledge every item they took, whether processing
/// succeeded or not. [`WorkQueue::join`] returns once every enqueued item has
/// been acknowledged.
pub struct WorkQueue<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    outstanding: Mutex<usize>,
    settled: Condvar,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            outstanding: Mutex::new(0),
            settled: Condvar::new(),
        }
    }

    /// Create a queue already holding `items` in order
    pub fn seeded(items: impl IntoIterator<Item = T>) -> Self {
        let queue = Self::new();
        for item in items {
            queue.enqueue(item);
        }
        queue
    }

    pub fn enqueue(&self, item: T) {
        *self.lock_outstanding() += 1;
        // The queue owns the receiver, so the channel is never disconnected
        let _ = self.sender.send(item);
    }

    /// Take the next item, or `None` once the queue is drained
    pub fn dequeue(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Like [`dequeue`](Self::dequeue), acknowledging the item when the guard drops
    pub fn dequeue_guarded(&self) -> Option<Pending<'_, T>> {
        self.dequeue().map(|item| Pending { queue: self, item })
    }

    /// Mark one dequeued item as fully processed
    pub fn acknowledge(&self) {
        let mut outstanding = self.lock_outstanding();
        *outstanding = outstanding.saturating_sub(1);
        if *outstanding == 0 {
            self.settled.notify_all();
        }
    }

    /// Block until every enqueued item has been acknowledged
    pub fn join(&self) {
        let mut outstanding = self.lock_outstanding();
        while *outstanding > 0 {
            outstanding = self
                .settled
                .wait(outstanding)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Items waiting to be dequeued
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Items enqueued but not yet acknowledged
    pub fn outstanding(&self) -> usize {
        *self.lock_outstanding()
    }

    fn lock_outstanding(&self) -> MutexGuard<'_, usize> {
        // A panicking worker cannot leave the counter half-updated
        self.outstanding
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A dequeued item that acknowledges itself when dropped, including on unwind
pub struct Pending<'q, T> {
    queue: &'q WorkQueue<T>,
    item: T,
}

impl<T> Pending<'_, T> {
    pub fn item(&self) -> &T {
        &self.item
    }
}

impl<T> Drop for Pending<'_, T> {
    fn drop(&mut self) {
        self.queue.acknowledge();
    }
}
