use anyhow::Result;
use crossbeam::channel::{Receiver, Sender, bounded};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Outcome of one work item, tagged with its input position
#[derive(Debug)]
pub struct WorkResult<R> {
    pub index: usize,
    /// `Err` holds the panic message when the processor panicked on this item
    pub outcome: Result<R, String>,
}

/// Fixed-size pool of scoped worker threads fed through bounded channels
pub struct ParallelExecutor {
    max_workers: usize,
    buffer_size: usize,
}

/// Context for worker threads to avoid too many function parameters
struct WorkerContext<'a, T, R, F, P> {
    worker_id: usize,
    work_rx: Receiver<(usize, T)>,
    result_tx: Sender<WorkResult<R>>,
    progress_counter: &'a AtomicUsize,
    total_items: usize,
    processor: &'a F,
    progress_reporter: Option<&'a P>,
}

impl ParallelExecutor {
    pub fn new(max_workers: usize) -> Self {
        Self::with_buffer_multiplier(max_workers, 2)
    }

    /// Channel capacity is `max_workers * multiplier`
    pub fn with_buffer_multiplier(max_workers: usize, multiplier: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            max_workers,
            buffer_size: max_workers.saturating_mul(multiplier.max(1)),
        }
    }

    /// Execute work items in parallel using a producer-consumer pattern
    ///
    /// Results come back in input order regardless of which worker finished
    /// first.
    pub fn execute<T, R, F, P>(
        &self,
        work_items: Vec<T>,
        processor: F,
        progress_reporter: Option<P>,
    ) -> Result<Vec<WorkResult<R>>>
    where
        T: Send,
        R: Send,
        F: Fn(&T, usize) -> R + Sync,
        P: Fn(usize, usize, usize) + Sync,
    {
        if work_items.is_empty() {
            return Ok(Vec::new());
        }

        let total_items = work_items.len();
        let actual_workers = std::cmp::min(self.max_workers, total_items);
        let (work_tx, work_rx) = bounded::<(usize, T)>(self.buffer_size);
        let (result_tx, result_rx) = bounded::<WorkResult<R>>(self.buffer_size);

        let progress_counter = AtomicUsize::new(0);
        let processor = &processor;
        let progress_reporter = progress_reporter.as_ref();
        let progress_counter = &progress_counter;

        let mut results = crossbeam::thread::scope(|s| {
            for worker_id in 0..actual_workers {
                let ctx = WorkerContext {
                    worker_id,
                    work_rx: work_rx.clone(),
                    result_tx: result_tx.clone(),
                    progress_counter,
                    total_items,
                    processor,
                    progress_reporter,
                };
                s.spawn(move |_| worker_thread(ctx));
            }

            // Producer thread: send work to workers
            s.spawn(move |_| {
                for item in work_items.into_iter().enumerate() {
                    if work_tx.send(item).is_err() {
                        break; // Workers dropped
                    }
                }
            });

            // Drop our copies so the collector sees the channel close
            drop(work_rx);
            drop(result_tx);

            collect_results(result_rx, total_items)
        })
        .map_err(|_| anyhow::anyhow!("Thread panic occurred during parallel execution"))?;

        results.sort_by_key(|r| r.index);
        Ok(results)
    }
}

fn worker_thread<T, R, F, P>(ctx: WorkerContext<'_, T, R, F, P>)
where
    F: Fn(&T, usize) -> R,
    P: Fn(usize, usize, usize),
{
    while let Ok((index, work_item)) = ctx.work_rx.recv() {
        let outcome = run_guarded(ctx.processor, &work_item, ctx.worker_id);

        if ctx.result_tx.send(WorkResult { index, outcome }).is_err() {
            break; // Receiver dropped
        }

        let current = ctx.progress_counter.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(reporter) = ctx.progress_reporter
            && (current % PROGRESS_EVERY == 0 || current == ctx.total_items)
        {
            reporter(current, ctx.total_items, ctx.worker_id);
        }
    }
}

fn collect_results<R>(result_rx: Receiver<WorkResult<R>>, total_items: usize) -> Vec<WorkResult<R>> {
    let mut results = Vec::with_capacity(total_items);
    while let Ok(result) = result_rx.recv() {
        results.push(result);
    }
    results
}

/// Report progress every N items to reduce contention
const PROGRESS_EVERY: usize = 1024;

/// Run the processor, turning a panic into an error for this item only
fn run_guarded<T, R, F>(processor: &F, item: &T, worker_id: usize) -> Result<R, String>
where
    F: Fn(&T, usize) -> R,
{
    panic::catch_unwind(AssertUnwindSafe(|| processor(item, worker_id))).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Sequential execution strategy for small inputs
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn execute<T, R, F, P>(
        work_items: Vec<T>,
        processor: F,
        progress_reporter: Option<P>,
    ) -> Vec<WorkResult<R>>
    where
        F: Fn(&T, usize) -> R,
        P: Fn(usize, usize, usize),
    {
        let total_items = work_items.len();
        let mut results = Vec::with_capacity(total_items);

        for (index, work_item) in work_items.iter().enumerate() {
            let outcome = run_guarded(&processor, work_item, 0);
            results.push(WorkResult { index, outcome });

            let current = index + 1;
            if let Some(reporter) = &progress_reporter
                && (current % PROGRESS_EVERY == 0 || current == total_items)
            {
                reporter(current, total_items, 0);
            }
        }

        results
    }
}

/// Execution strategy enum for choosing between parallel and sequential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel { workers: usize, buffer_multiplier: usize },
}

impl ExecutionStrategy {
    pub fn execute<T, R, F, P>(
        &self,
        work_items: Vec<T>,
        processor: F,
        progress_reporter: Option<P>,
    ) -> Result<Vec<WorkResult<R>>>
    where
        T: Send,
        R: Send,
        F: Fn(&T, usize) -> R + Sync,
        P: Fn(usize, usize, usize) + Sync,
    {
        match self {
            ExecutionStrategy::Sequential => Ok(SequentialExecutor::execute(
                work_items,
                processor,
                progress_reporter,
            )),
            ExecutionStrategy::Parallel {
                workers,
                buffer_multiplier,
            } => ParallelExecutor::with_buffer_multiplier(*workers, *buffer_multiplier).execute(
                work_items,
                processor,
                progress_reporter,
            ),
        }
    }

    /// Threshold decision between sequential and parallel execution
    ///
    /// The caller supplies the worker count, usually from
    /// [`ExecutionStrategy::calculate_optimal_workers`]. A single worker is
    /// never worth a thread pool.
    ///
    /// ```rust
    /// use logscan::parallel::ExecutionStrategy;
    ///
    /// let strategy = ExecutionStrategy::auto(36, 50, 4, 2);
    /// assert!(matches!(strategy, ExecutionStrategy::Sequential));
    ///
    /// let strategy = ExecutionStrategy::auto(100, 50, 4, 2);
    /// assert!(matches!(strategy, ExecutionStrategy::Parallel { workers: 4, .. }));
    /// ```
    pub fn auto(
        work_items_count: usize,
        min_items_for_parallel: usize,
        optimal_workers: usize,
        buffer_multiplier: usize,
    ) -> Self {
        if work_items_count >= min_items_for_parallel && optimal_workers > 1 {
            ExecutionStrategy::Parallel {
                workers: optimal_workers,
                buffer_multiplier,
            }
        } else {
            ExecutionStrategy::Sequential
        }
    }

    /// Maximum workers allowed by available cores and configuration
    ///
    /// ```text
    /// 1. Detect available CPU cores: num_cpus::get()
    /// 2. Apply percentage: cores * thread_percentage / 100
    /// 3. Apply config limit: min(max_threads_config, percentage_result) if max_threads_config > 0
    /// 4. Ensure minimum: max(1, final_result)
    /// ```
    pub fn calculate_optimal_workers(max_threads_config: usize, thread_percentage: u8) -> usize {
        let available_cores = num_cpus::get();

        let workers_by_percentage =
            std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);

        if max_threads_config > 0 {
            std::cmp::min(max_threads_config, workers_by_percentage)
        } else {
            workers_by_percentage
        }
    }
}
