//! Generic parallel execution framework
//!
//! This module knows nothing about documents or categories. It provides the
//! two building blocks the organizer runs on:
//!
//! - [`WorkQueue`]: a thread-safe FIFO with an acknowledge/join barrier
//! - [`WorkerPool`]: a fixed set of scoped worker threads draining that queue
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   Driver        │    │   WorkQueue      │    │   Workers       │
//! │                 │───▶│                  │───▶│                 │
//! │ • seeds items   │    │ • FIFO           │    │ • dequeue       │
//! │ • joins barrier │◀───│ • outstanding    │◀───│ • process       │
//! │                 │    │   counter        │    │ • acknowledge   │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! Workers are spawned with `crossbeam::thread::scope`, so processors may
//! borrow shared state (taxonomy, accumulator) without `Arc` or `'static`.
//!
//! # Example
//!
//! ```rust
//! use docsorter::parallel::WorkerPool;
//!
//! let pool = WorkerPool::new(4);
//! let summary = pool
//!     .run(
//!         vec![1u32, 2, 3],
//!         |n, _worker_id| Ok(n * 2),
//!         |_n, _outcome, _worker_id| {},
//!     )
//!     .unwrap();
//! assert_eq!(summary.succeeded, 3);
//! assert_eq!(summary.workers, 3);
//! ```

pub mod pool;
pub mod queue;

// Re-export main types for easier access
pub use pool::{PoolSummary, WorkerPool};
pub use queue::{Pending, WorkQueue};
