//! Fixed-size worker pool
//!
//! This module contains the generic executor the crawler runs on:
//! - The [`Operation`] trait for a repeatable unit of work
//! - [`WorkerPool`], which runs operations on N OS threads until they stop
//! - Thread launching policy ([`Launcher`], [`OsThreads`])
//! - The counting [`Semaphore`] used for blocking handoffs
//!
//! The pool holds no business state. It keeps a shared stop flag, a count of
//! live workers, and a completion signal released once per worker exit.

mod launcher;
mod semaphore;

pub use launcher::{Launcher, OsThreads};
pub use semaphore::Semaphore;

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use thiserror::Error;

/// Errors raised by the worker pool
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to launch worker {index}: {source}")]
    Launch {
        index: usize,
        #[source]
        source: io::Error,
    },
}

/// A unit of work that a pool worker invokes repeatedly
///
/// Every `Fn() -> bool + Sync` closure is an operation.
pub trait Operation: Sync {
    /// Performs one step of work
    ///
    /// Returns `true` to be called again, `false` when this worker is done.
    /// Returning `false` stops only the calling worker; the others keep going.
    fn run(&self) -> bool;

    /// Called when the pool is shutting down early
    ///
    /// Operations that block inside [`Operation::run`] should wake themselves
    /// up here so their worker can observe the stop flag and exit.
    fn stop(&self) {}
}

impl<F> Operation for F
where
    F: Fn() -> bool + Sync,
{
    fn run(&self) -> bool {
        self()
    }
}

/// Shared bookkeeping for one `run` invocation
struct PoolState {
    running: AtomicBool,
    active: AtomicUsize,
    finished: Semaphore,
}

impl PoolState {
    fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            active: AtomicUsize::new(0),
            finished: Semaphore::new(0),
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn worker_launched(&self) {
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    // Undoes `worker_launched` for a worker whose body never ran
    fn launch_failed(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    fn worker_exited(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.finished.release();
    }

    /// Blocks until every launched worker has exited
    ///
    /// Several workers may exit between one wake-up and the next check, so
    /// the count is re-read after every acquire rather than counted down.
    fn wait_for_workers(&self) {
        while self.active.load(Ordering::SeqCst) > 0 {
            self.finished.acquire();
        }
    }
}

/// Signals worker exit on every path out of the worker body, unwinding included
struct ExitGuard<'a>(&'a PoolState);

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        self.0.worker_exited();
    }
}

/// Runs operations concurrently on a fixed number of OS threads
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use sitewalk::pool::WorkerPool;
///
/// let calls = AtomicUsize::new(0);
/// let work = || calls.fetch_add(1, Ordering::SeqCst) + 1 < 100;
///
/// WorkerPool::new().run(&work, 4).unwrap();
/// assert!(calls.load(Ordering::SeqCst) >= 100);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WorkerPool<L = OsThreads> {
    launcher: L,
}

impl WorkerPool {
    /// Creates a pool that launches named OS threads
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: Launcher> WorkerPool<L> {
    /// Creates a pool that starts workers through `launcher`
    pub fn with_launcher(launcher: L) -> Self {
        Self { launcher }
    }

    /// Returns the launcher used by this pool
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Runs one shared operation on `concurrency` workers
    ///
    /// Each worker calls `operation.run()` until it returns `false` or the
    /// pool's stop flag is set. Blocks until every worker has exited.
    ///
    /// # Arguments
    ///
    /// * `operation` - The operation every worker invokes
    /// * `concurrency` - The number of workers to launch
    ///
    /// # Returns
    ///
    /// * `Ok(())` - All workers ran and exited
    /// * `Err(PoolError)` - A worker could not be launched. The workers that
    ///   did start were stopped and have exited before this returns.
    pub fn run<O: Operation>(&self, operation: &O, concurrency: usize) -> Result<(), PoolError> {
        let operations = vec![operation as &dyn Operation; concurrency];
        self.drive(&operations)
    }

    /// Runs each operation on its own worker
    ///
    /// Same contract as [`WorkerPool::run`], with one worker per element.
    pub fn run_each<O: Operation>(&self, operations: &[O]) -> Result<(), PoolError> {
        let operations: Vec<&dyn Operation> = operations
            .iter()
            .map(|operation| operation as &dyn Operation)
            .collect();
        self.drive(&operations)
    }

    fn drive(&self, operations: &[&dyn Operation]) -> Result<(), PoolError> {
        let state = PoolState::new();
        tracing::debug!("Starting worker pool with {} workers", operations.len());

        thread::scope(|scope| {
            for (index, &operation) in operations.iter().enumerate() {
                state.worker_launched();

                let state = &state;
                let work = move || {
                    let _exit = ExitGuard(state);
                    tracing::trace!("Worker {} running", index);
                    while state.is_running() && operation.run() {}
                    tracing::trace!("Worker {} exiting", index);
                };

                if let Err(source) = self.launcher.launch(scope, index, work) {
                    state.launch_failed();
                    tracing::error!(
                        "Failed to launch worker {} of {}: {}; stopping pool",
                        index,
                        operations.len(),
                        source
                    );

                    state.stop();
                    for operation in operations {
                        operation.stop();
                    }
                    state.wait_for_workers();

                    return Err(PoolError::Launch { index, source });
                }
            }

            state.wait_for_workers();
            tracing::debug!("All {} workers exited", operations.len());
            Ok(())
        })
    }
}
