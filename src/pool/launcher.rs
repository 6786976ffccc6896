//! Thread launching for the worker pool
//!
//! The pool never spawns threads directly; it asks a [`Launcher`] to start
//! each worker inside the pool's thread scope. This keeps the OS thread
//! configuration in one place and lets callers substitute their own policy.

use std::io;
use std::thread::{self, Scope};

/// Starts one worker body inside a thread scope
pub trait Launcher: Sync {
    /// Launches `work` as worker number `index`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The worker is running and will be joined by the scope
    /// * `Err(io::Error)` - The worker could not be started; `work` was dropped
    ///   without running
    fn launch<'scope, 'env, F>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        index: usize,
        work: F,
    ) -> io::Result<()>
    where
        F: FnOnce() + Send + 'scope;
}

/// Launches each worker on its own named OS thread
#[derive(Debug, Clone)]
pub struct OsThreads {
    name_prefix: String,
    stack_size: Option<usize>,
}

impl OsThreads {
    /// Creates a launcher naming threads `<name_prefix>-<index>`
    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            stack_size: None,
        }
    }

    /// Sets the stack size for every launched thread
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

impl Default for OsThreads {
    fn default() -> Self {
        Self::new("worker")
    }
}

impl Launcher for OsThreads {
    fn launch<'scope, 'env, F>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        index: usize,
        work: F,
    ) -> io::Result<()>
    where
        F: FnOnce() + Send + 'scope,
    {
        let mut builder = thread::Builder::new().name(format!("{}-{}", self.name_prefix, index));
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }

        // The scope joins the thread; the handle itself is not needed
        builder.spawn_scoped(scope, work).map(|_| ())
    }
}
