//! Generic parallel execution framework
//!
//! This module provides a bounded worker pool that the scanner uses to score
//! log lines, but it knows nothing about logs or scoring.
//!
//! # Architecture Responsibilities
//!
//! The parallel module focuses exclusively on **system resource management** and **execution strategy**:
//!
//! - **Resource Discovery**: Detects available CPU cores using `num_cpus::get()`
//! - **Resource Calculation**: Applies user configuration (thread percentage, max threads)
//! - **Execution Strategy**: Sequential vs Parallel execution with a fixed set of workers
//! - **Fault Isolation**: A panic while processing one item fails that item only
//!
//! Work flows through two bounded crossbeam channels, so memory stays flat no
//! matter how many items are queued:
//!
//! ```text
//! ┌──────────┐  (index, item)  ┌──────────────┐  WorkResult  ┌───────────┐
//! │ producer │ ──────────────▶ │ N workers    │ ───────────▶ │ collector │
//! └──────────┘   bounded(buf)  └──────────────┘  bounded(buf)└───────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use logscan::parallel::ExecutionStrategy;
//!
//! let workers = ExecutionStrategy::calculate_optimal_workers(0, 75);
//! let strategy = ExecutionStrategy::auto(1_000, 256, workers, 2);
//! let results = strategy
//!     .execute(vec![1, 2, 3], |x, _worker_id| x * 2, None::<fn(usize, usize, usize)>)
//!     .unwrap();
//! assert_eq!(results.len(), 3);
//! ```

pub mod core;

// Re-export main types for easier access
pub use self::core::{ExecutionStrategy, ParallelExecutor, SequentialExecutor, WorkResult};
